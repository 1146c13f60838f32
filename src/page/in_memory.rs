//! In-memory page
//!
//! A materialized page: a base map of snapshot records and a delta map with
//! one pending operation per key. Deltas shadow base records on reads.

use std::collections::HashMap;

use crate::error::Result;
use crate::storage::{LogRecord, StorageManager};
use crate::types::{ByteArray, PageId};

use super::record::{Delta, DeltaOp, PageRecord};

/// Fully decoded page
#[derive(Debug, Clone)]
pub struct InMemoryPage {
    pid: PageId,

    /// Base records (full snapshots)
    records: HashMap<ByteArray, PageRecord>,

    /// One delta slot per key
    deltas: HashMap<ByteArray, Delta>,
}

impl InMemoryPage {
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

    /// Look up the current value of a key
    ///
    /// The delta slot wins over the base record. A tombstone resolves to
    /// `None`.
    pub fn get(&self, key: &[u8]) -> Option<ByteArray> {
        if let Some(delta) = self.deltas.get(key) {
            return delta.op.value().cloned();
        }
        self.records.get(key).map(|record| record.value.clone())
    }

    /// Write a value
    ///
    /// Emits a Modify delta when the base map already holds the key and an
    /// Insert delta otherwise. Either way the key's delta slot is replaced.
    pub fn put(&mut self, key: ByteArray, value: ByteArray) {
        let op = if self.records.contains_key(&key) {
            DeltaOp::Modify(value)
        } else {
            DeltaOp::Insert(value)
        };
        self.deltas.insert(key, Delta::pending(op));
    }

    /// Delete a key
    ///
    /// No-op when the key has neither a base record nor a delta. An existing
    /// tombstone counts as a delta and is replaced by a fresh unflushed one.
    pub fn delete(&mut self, key: &[u8]) {
        if !self.deltas.contains_key(key) && !self.records.contains_key(key) {
            return;
        }
        self.deltas
            .insert(ByteArray::copy_from_slice(key), Delta::pending(DeltaOp::Delete));
    }

    /// Append every unflushed record to the log, base records first.
    ///
    /// Returns the number of records written. A record is marked flushed only
    /// after its append succeeded, so a second flush with no new mutations
    /// writes nothing.
    pub fn flush(&mut self, storage: &mut StorageManager) -> Result<usize> {
        let pid = self.pid;
        let mut written = 0;

        for (key, record) in self.records.iter_mut().filter(|(_, r)| !r.flushed) {
            storage.append(&LogRecord::page(pid, key, &record.value))?;
            record.flushed = true;
            written += 1;
        }

        for (key, delta) in self.deltas.iter_mut().filter(|(_, d)| !d.flushed) {
            storage.append(&LogRecord::delta(pid, key, &delta.op))?;
            delta.flushed = true;
            written += 1;
        }

        if written > 0 {
            tracing::trace!("Flushed {} records for page {}", written, pid);
        }

        Ok(written)
    }

    // =========================================================================
    // Materialization
    // =========================================================================

    /// Install a base record (used when decoding a page from disk)
    pub fn install_record(&mut self, key: ByteArray, record: PageRecord) {
        self.records.insert(key, record);
    }

    /// Install a delta (used when decoding a page from disk)
    pub fn install_delta(&mut self, key: ByteArray, delta: Delta) {
        self.deltas.insert(key, delta);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn record(&self, key: &[u8]) -> Option<&PageRecord> {
        self.records.get(key)
    }

    pub fn delta(&self, key: &[u8]) -> Option<&Delta> {
        self.deltas.get(key)
    }

    /// Number of records a flush would append
    pub fn unflushed_count(&self) -> usize {
        self.records.values().filter(|r| !r.flushed).count()
            + self.deltas.values().filter(|d| !d.flushed).count()
    }

    pub fn is_dirty(&self) -> bool {
        self.unflushed_count() > 0
    }
}
