//! Engine Module
//!
//! The public facade that opens the database file and forwards calls to the
//! index and cache manager.
//!
//! ## Responsibilities
//! - Open or create the database file and run recovery
//! - Serialize access to index, cache manager and storage
//! - Flush on close

use std::fs;
use std::io;
use std::path::Path;

use parking_lot::Mutex;

use crate::cache::CacheManager;
use crate::config::Config;
use crate::error::{DeltaError, Result};
use crate::index::{HashMapIndex, Index};
use crate::storage::{RecoveryResult, StorageManager};
use crate::types::{ByteArray, PageIdGenerator};

/// The main storage engine
///
/// ## Concurrency Model
///
/// All state sits behind one coarse lock. Every call runs to completion
/// before the next one starts, so a single caller observes exactly the
/// sequential behavior; multiple threads may share an `Engine` but are
/// serialized.
///
/// ## Durability
///
/// Writes live in memory until `flush` or `close`. Dropping an engine without
/// closing it loses unflushed writes; everything flushed survives.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Index + cache manager (which owns the mapping table and log file)
    state: Mutex<EngineState>,

    /// Statistics of the recovery scan run at open
    recovery: RecoveryResult,
}

struct EngineState {
    index: Box<dyn Index>,
    cache: CacheManager,
}

impl Engine {
    /// Open an existing database file (or start a new one if it is missing)
    ///
    /// On startup:
    /// 1. Open the file read/write
    /// 2. Scan the log backward to rebuild index and page locations
    /// 3. Ready to serve requests
    ///
    /// If recovery fails the file handle is released before returning.
    pub fn open(config: Config) -> Result<Self> {
        if config.path.as_os_str().is_empty() {
            return Err(DeltaError::InvalidArgument(
                "database path must not be empty".to_string(),
            ));
        }

        let storage = StorageManager::open(&config.path, config.sync_strategy)?;
        let mut cache = CacheManager::new(storage, PageIdGenerator::new(config.page_ids));
        let mut index: Box<dyn Index> = Box::new(HashMapIndex::new());

        let recovery = match cache.recover(index.as_mut()) {
            Ok(recovery) => recovery,
            Err(e) => {
                tracing::warn!("Recovery of {} failed: {}", config.path.display(), e);
                return Err(e);
            }
        };

        tracing::info!(
            "Opened {}: {} records recovered ({} inserts, {} modifies, {} deletes, {} snapshots) across {} pages",
            config.path.display(),
            recovery.records_recovered,
            recovery.inserts,
            recovery.modifies,
            recovery.deletes,
            recovery.page_records,
            recovery.pages
        );

        Ok(Self {
            config,
            state: Mutex::new(EngineState { index, cache }),
            recovery,
        })
    }

    /// Create a fresh database, deleting an existing file at the same path
    ///
    /// Fails if the path exists but is not a regular file.
    pub fn create(config: Config) -> Result<Self> {
        if config.path.as_os_str().is_empty() {
            return Err(DeltaError::InvalidArgument(
                "database path must not be empty".to_string(),
            ));
        }

        match fs::metadata(&config.path) {
            Ok(meta) if meta.is_file() => {
                tracing::debug!("Removing existing database {}", config.path.display());
                fs::remove_file(&config.path)?;
            }
            Ok(_) => {
                return Err(DeltaError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a file", config.path.display()),
                )));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Self::open(config)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// Create with a path (convenience method)
    pub fn create_path(path: &Path) -> Result<Self> {
        Self::create(Config::builder().path(path).build())
    }

    /// Get a value by key
    pub fn get(&self, key: &[u8]) -> Result<Option<ByteArray>> {
        let mut guard = self.state.lock();
        let EngineState { index, cache } = &mut *guard;
        index.get(key, cache)
    }

    /// Put a key-value pair
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut guard = self.state.lock();
        let EngineState { index, cache } = &mut *guard;
        index.put(
            ByteArray::copy_from_slice(key),
            ByteArray::copy_from_slice(value),
            cache,
        )
    }

    /// Delete a key (no-op for unknown keys)
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let mut guard = self.state.lock();
        let EngineState { index, cache } = &mut *guard;
        index.delete(key, cache)
    }

    /// Append every unflushed record to the log
    ///
    /// Returns the number of records written; zero when nothing changed
    /// since the last flush.
    pub fn flush(&self) -> Result<usize> {
        self.state.lock().cache.flush()
    }

    /// Close the engine gracefully
    ///
    /// Flushes pending writes, syncs the log and releases the file handle.
    pub fn close(self) -> Result<()> {
        let mut state = self.state.into_inner();
        state.cache.flush()?;
        state.cache.sync()?;

        tracing::info!(
            "Closed {} ({} bytes)",
            self.config.path.display(),
            state.cache.storage().len()
        );

        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Statistics of the recovery scan run at open
    pub fn recovery(&self) -> &RecoveryResult {
        &self.recovery
    }

    /// Number of keys known to the index (deleted keys included)
    pub fn key_count(&self) -> usize {
        self.state.lock().index.len()
    }

    /// Number of pages in the mapping table
    pub fn page_count(&self) -> usize {
        self.state.lock().cache.page_count()
    }

    /// Number of pages with unflushed records
    pub fn dirty_page_count(&self) -> usize {
        self.state.lock().cache.dirty_page_count()
    }

    /// Current length of the log in bytes
    pub fn file_len(&self) -> u64 {
        self.state.lock().cache.storage().len()
    }
}
