//! Cache Manager
//!
//! Creates pages, materializes on-disk pages on demand and flushes dirty
//! in-memory pages.
//!
//! ## Responsibilities
//! - Own the mapping table and every page in it
//! - Own the storage manager (the only path to the log file)
//! - Decode a page from disk at most once per process

use crate::error::{DeltaError, Result};
use crate::index::Index;
use crate::page::{InMemoryPage, OnDiskPage, Page};
use crate::storage::{RecoveryResult, StorageManager};
use crate::types::{PageId, PageIdGenerator};

use super::MappingTable;

pub struct CacheManager {
    /// Log file access
    storage: StorageManager,

    /// pid → page
    table: MappingTable,

    /// Source of ids for new pages
    ids: PageIdGenerator,
}

impl CacheManager {
    pub fn new(storage: StorageManager, ids: PageIdGenerator) -> Self {
        Self {
            storage,
            table: MappingTable::new(),
            ids,
        }
    }

    /// Create an empty in-memory page under a fresh pid
    pub fn create_in_memory_page(&mut self) -> Result<&mut InMemoryPage> {
        let mut pid = self.ids.next_id();
        while self.table.contains(&pid) {
            pid = self.ids.next_id();
        }

        self.table.put(Page::InMemory(InMemoryPage::new(pid)));
        tracing::trace!("Created page {}", pid);

        self.get_in_memory_page(pid)
    }

    /// Create an empty on-disk page for a pid read from the log
    pub fn create_on_disk_page(&mut self, pid: PageId) -> Result<&mut OnDiskPage> {
        self.table.put(Page::OnDisk(OnDiskPage::new(pid)));
        self.table
            .get_mut(&pid)
            .and_then(Page::as_on_disk_mut)
            .ok_or(DeltaError::PageNotFound(pid))
    }

    /// Get the in-memory form of a page, decoding it from disk if needed.
    ///
    /// The pid must be known to the mapping table. A decoded page replaces
    /// the on-disk entry, so later lookups hit memory.
    pub fn get_in_memory_page(&mut self, pid: PageId) -> Result<&mut InMemoryPage> {
        let page = self.table.get(&pid).ok_or(DeltaError::PageNotFound(pid))?;

        if let Some(filled) = page.materialize(&mut self.storage)? {
            tracing::debug!("Materialized page {} from disk", pid);
            self.table.put(Page::InMemory(filled));
        }

        self.table
            .get_mut(&pid)
            .and_then(Page::as_in_memory_mut)
            .ok_or(DeltaError::PageNotFound(pid))
    }

    /// Get the on-disk form of a page.
    ///
    /// Returns `Ok(None)` when the page is already in memory and
    /// `PageNotFound` when the pid is unknown.
    pub fn get_on_disk_page(&self, pid: PageId) -> Result<Option<&OnDiskPage>> {
        self.table
            .get(&pid)
            .map(Page::as_on_disk)
            .ok_or(DeltaError::PageNotFound(pid))
    }

    /// Flush every page in the mapping table.
    ///
    /// Returns the number of records appended.
    pub fn flush(&mut self) -> Result<usize> {
        let mut written = 0;
        for page in self.table.iter_mut() {
            written += page.flush(&mut self.storage)?;
        }

        if written > 0 {
            self.storage.finish_flush()?;
            tracing::debug!(
                "Flushed {} records, log is now {} bytes",
                written,
                self.storage.len()
            );
        }

        Ok(written)
    }

    /// Run the backward recovery scan, populating the mapping table and `index`
    pub fn recover(&mut self, index: &mut dyn Index) -> Result<RecoveryResult> {
        self.storage.recover(&mut self.table, index)
    }

    /// Force the log to disk
    pub fn sync(&mut self) -> Result<()> {
        self.storage.sync()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mapping_table(&self) -> &MappingTable {
        &self.table
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    pub fn page_count(&self) -> usize {
        self.table.len()
    }

    /// Number of pages that would append records on the next flush
    pub fn dirty_page_count(&self) -> usize {
        self.table
            .iter()
            .filter_map(Page::as_in_memory)
            .filter(|page| page.is_dirty())
            .count()
    }
}
