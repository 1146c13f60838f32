//! Configuration for DeltaKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a DeltaKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// The single database file. There is no directory structure: the file
    /// is the whole log.
    pub path: PathBuf,

    /// When to fsync the log file
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Page Configuration
    // -------------------------------------------------------------------------
    /// Where new page ids come from
    pub page_ids: PageIdSource,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync at the end of every flush that appended bytes
    EveryFlush,

    /// fsync only when the engine is closed
    OnClose,
}

/// Source of identifiers for freshly created pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIdSource {
    /// Random 128-bit ids (UUID v4)
    Random,

    /// Monotonically increasing ids starting at `start`. Deterministic, meant
    /// for tests that need reproducible page ids.
    Sequential { start: u128 },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./deltakv.db"),
            sync_strategy: SyncStrategy::EveryFlush,
            page_ids: PageIdSource::Random,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the log sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the page id source
    pub fn page_ids(mut self, source: PageIdSource) -> Self {
        self.config.page_ids = source;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
