//! On-disk page
//!
//! A page known only by the file locations of its records. Built by the
//! backward recovery scan and replaced by an `InMemoryPage` on first access.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::Result;
use crate::storage::StorageManager;
use crate::types::{ByteArray, PageId};

use super::record::{RecordKind, RecordLocation};
use super::InMemoryPage;

/// Unmaterialized page
#[derive(Debug, Clone)]
pub struct OnDiskPage {
    pid: PageId,

    /// Base-record locations (snapshot records)
    records: HashMap<ByteArray, RecordLocation>,

    /// Newest delta location per key
    deltas: HashMap<ByteArray, RecordLocation>,
}

impl OnDiskPage {
    pub fn new(pid: PageId) -> Self {
        Self {
            pid,
            records: HashMap::new(),
            deltas: HashMap::new(),
        }
    }

    pub fn pid(&self) -> PageId {
        self.pid
    }

    /// Register a record location found by the recovery scan.
    ///
    /// The scan runs newest to oldest, so the first location seen for a key
    /// wins and later (older) ones are discarded. Snapshot records and deltas
    /// are tracked in separate slots. Returns whether the location was kept.
    pub fn add(&mut self, key: ByteArray, location: RecordLocation) -> bool {
        let slots = match location.kind {
            RecordKind::Page => &mut self.records,
            _ => &mut self.deltas,
        };
        match slots.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(location);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Decode this page from the log
    pub fn materialize(&self, storage: &mut StorageManager) -> Result<InMemoryPage> {
        storage.read_page(self)
    }

    pub fn page_records(&self) -> impl Iterator<Item = (&ByteArray, &RecordLocation)> {
        self.records.iter()
    }

    pub fn deltas(&self) -> impl Iterator<Item = (&ByteArray, &RecordLocation)> {
        self.deltas.iter()
    }

    pub fn delta(&self, key: &[u8]) -> Option<&RecordLocation> {
        self.deltas.get(key)
    }

    pub fn page_record(&self, key: &[u8]) -> Option<&RecordLocation> {
        self.records.get(key)
    }
}
