//! Page Module
//!
//! A page is the unit the cache manager tracks. In this design every page is
//! bound to exactly one key for its whole lifetime.
//!
//! ## Representations
//! ```text
//!   OnDisk { locations }  ──materialize──▶  InMemory { records, deltas }
//!        (after recovery)                      (after first access)
//! ```
//! The transition happens once per page per process; the mapping table entry
//! is swapped in place under the same pid.

mod in_memory;
mod on_disk;
mod record;

pub use in_memory::InMemoryPage;
pub use on_disk::OnDiskPage;
pub use record::{Delta, DeltaOp, PageRecord, RecordKind, RecordLocation};

use crate::error::Result;
use crate::storage::StorageManager;
use crate::types::PageId;

/// A page in one of its two representations
#[derive(Debug, Clone)]
pub enum Page {
    InMemory(InMemoryPage),
    OnDisk(OnDiskPage),
}

impl Page {
    pub fn pid(&self) -> PageId {
        match self {
            Page::InMemory(page) => page.pid(),
            Page::OnDisk(page) => page.pid(),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self, Page::InMemory(_))
    }

    /// Decode the page if it only exists on disk.
    ///
    /// Returns `None` for a page that is already in memory (materialization
    /// is the identity there) and the freshly decoded page otherwise.
    pub fn materialize(&self, storage: &mut StorageManager) -> Result<Option<InMemoryPage>> {
        match self {
            Page::InMemory(_) => Ok(None),
            Page::OnDisk(page) => page.materialize(storage).map(Some),
        }
    }

    /// Persist unflushed records. On-disk pages have nothing to write.
    pub fn flush(&mut self, storage: &mut StorageManager) -> Result<usize> {
        match self {
            Page::InMemory(page) => page.flush(storage),
            Page::OnDisk(_) => Ok(0),
        }
    }

    pub fn as_in_memory(&self) -> Option<&InMemoryPage> {
        match self {
            Page::InMemory(page) => Some(page),
            Page::OnDisk(_) => None,
        }
    }

    pub fn as_in_memory_mut(&mut self) -> Option<&mut InMemoryPage> {
        match self {
            Page::InMemory(page) => Some(page),
            Page::OnDisk(_) => None,
        }
    }

    pub fn as_on_disk(&self) -> Option<&OnDiskPage> {
        match self {
            Page::OnDisk(page) => Some(page),
            Page::InMemory(_) => None,
        }
    }

    pub fn as_on_disk_mut(&mut self) -> Option<&mut OnDiskPage> {
        match self {
            Page::OnDisk(page) => Some(page),
            Page::InMemory(_) => None,
        }
    }
}
