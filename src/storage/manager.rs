//! Storage Manager
//!
//! Owns the single database file.
//!
//! ## Responsibilities
//! - Append encoded records at the end of the log
//! - Rebuild mapping table, index and record locations on open by scanning
//!   the log backward
//! - Decode on-disk pages into in-memory pages

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::cache::MappingTable;
use crate::config::SyncStrategy;
use crate::error::{DeltaError, Result};
use crate::index::Index;
use crate::page::{
    Delta, DeltaOp, InMemoryPage, OnDiskPage, Page, PageRecord, RecordKind, RecordLocation,
};
use crate::types::ByteArray;

use super::cursor::BackwardCursor;
use super::format::LogRecord;

/// Statistics of a recovery scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of records scanned
    pub records_recovered: u64,

    /// Snapshot records
    pub page_records: u64,

    pub inserts: u64,

    pub modifies: u64,

    pub deletes: u64,

    /// Distinct pages found
    pub pages: u64,

    /// Bytes of log scanned (the whole file on success)
    pub bytes_scanned: u64,
}

impl RecoveryResult {
    fn count(&mut self, kind: RecordKind, bytes: u64) {
        self.records_recovered += 1;
        self.bytes_scanned += bytes;
        match kind {
            RecordKind::Page => self.page_records += 1,
            RecordKind::Insert => self.inserts += 1,
            RecordKind::Modify => self.modifies += 1,
            RecordKind::Delete => self.deletes += 1,
        }
    }
}

/// Manages the log file
pub struct StorageManager {
    /// Path of the database file
    path: PathBuf,

    /// Read/write handle, released when the manager is dropped
    file: File,

    /// Current end of the log
    len: u64,

    sync_strategy: SyncStrategy,

    /// Bytes appended since the last sync
    unsynced: u64,
}

impl StorageManager {
    /// Open the log file, creating it if missing. Existing contents are kept.
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
            sync_strategy,
            unsynced: 0,
        })
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Append a record at the end of the log
    ///
    /// Returns the offset at which the record starts.
    pub fn append(&mut self, record: &LogRecord<'_>) -> Result<u64> {
        let buf = record.encode()?;
        let offset = self.len;

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&buf)?;

        self.len += buf.len() as u64;
        self.unsynced += buf.len() as u64;

        tracing::trace!(
            "Appended {:?} record for page {} at offset {} ({} bytes)",
            record.kind,
            record.pid,
            offset,
            buf.len()
        );

        Ok(offset)
    }

    /// Called at the end of a flush; syncs if the strategy asks for it
    pub fn finish_flush(&mut self) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryFlush {
            self.sync()?;
        }
        Ok(())
    }

    /// Force appended bytes to disk
    pub fn sync(&mut self) -> Result<()> {
        if self.unsynced > 0 {
            self.file.sync_data()?;
            self.unsynced = 0;
        }
        Ok(())
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Rebuild state from the log, reading from the last byte toward the first.
    ///
    /// For every record: read the tag, the page id and the key; bind the key
    /// to the page in `index`; register the record location on the page;
    /// step over the value. The newest record of each key is seen first and
    /// wins its slot on the on-disk page.
    pub fn recover(
        &mut self,
        pages: &mut MappingTable,
        index: &mut dyn Index,
    ) -> Result<RecoveryResult> {
        let mut result = RecoveryResult::default();
        let mut cursor = BackwardCursor::new(&mut self.file, self.len);

        while cursor.position() > 0 {
            let record_end = cursor.position();

            let tag = cursor.read_u8_backward()?;
            let kind = RecordKind::from_tag(tag).ok_or_else(|| {
                DeltaError::Format(format!(
                    "unknown record tag {:#04x} at offset {}",
                    tag,
                    cursor.position()
                ))
            })?;

            let pid = cursor.read_pid_backward()?;
            if !matches!(pages.get(&pid), Some(Page::OnDisk(_))) {
                pages.put(Page::OnDisk(OnDiskPage::new(pid)));
            }
            let page = pages
                .get_mut(&pid)
                .and_then(Page::as_on_disk_mut)
                .ok_or(DeltaError::PageNotFound(pid))?;

            let key = ByteArray::from(cursor.read_length_prefixed_backward()?);
            index.add(key.clone(), page);

            let location = RecordLocation {
                kind,
                position: cursor.position(),
            };
            if kind.has_value() {
                cursor.skip_length_prefixed_backward()?;
            }
            page.add(key, location);

            tracing::trace!(
                "Recovered {:?} record for page {} at offset {}",
                kind,
                pid,
                cursor.position()
            );
            result.count(kind, record_end - cursor.position());
        }

        result.pages = pages.len() as u64;
        Ok(result)
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Decode an on-disk page.
    ///
    /// Records read back are already durable and come out marked flushed. A
    /// delta older than the key's snapshot record is dropped.
    pub fn read_page(&mut self, page: &OnDiskPage) -> Result<InMemoryPage> {
        let mut in_memory = InMemoryPage::new(page.pid());

        for (key, location) in page.page_records() {
            let value = self.read_value_at(location.position)?;
            in_memory.install_record(
                key.clone(),
                PageRecord {
                    value,
                    flushed: true,
                },
            );
        }

        for (key, location) in page.deltas() {
            let superseded = page
                .page_record(key)
                .is_some_and(|snapshot| snapshot.position > location.position);
            if superseded {
                continue;
            }

            let op = match location.kind {
                RecordKind::Insert => DeltaOp::Insert(self.read_value_at(location.position)?),
                RecordKind::Modify => DeltaOp::Modify(self.read_value_at(location.position)?),
                RecordKind::Delete => DeltaOp::Delete,
                RecordKind::Page => {
                    return Err(DeltaError::Format(format!(
                        "snapshot record in delta slot of page {}",
                        page.pid()
                    )))
                }
            };
            in_memory.install_delta(key.clone(), Delta::durable(op));
        }

        Ok(in_memory)
    }

    /// Read the value field ending at `position`
    pub fn read_value_at(&mut self, position: u64) -> Result<ByteArray> {
        if position > self.len {
            return Err(DeltaError::Format(format!(
                "value offset {} is past the end of the log ({} bytes)",
                position, self.len
            )));
        }
        let mut cursor = BackwardCursor::new(&mut self.file, position);
        Ok(ByteArray::from(cursor.read_length_prefixed_backward()?))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current length of the log in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sync_strategy(&self) -> SyncStrategy {
        self.sync_strategy
    }
}
