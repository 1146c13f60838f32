//! # DeltaKV
//!
//! An embedded, single-file key-value store with:
//! - Pages holding a base record plus one pending delta per key
//! - An append-only log with no header, WAL or checkpoint
//! - Recovery by scanning the log backward from its last byte
//! - Lazy page materialization (decode from disk on first access)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Engine                               │
//! │            (open/create, get/put/delete/flush)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Index                                │
//! │                     (key → pid)                             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Cache Manager                            │
//! │         Mapping Table (pid → InMemory | OnDisk page)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │   Storage     │
//!               │ (append-only  │
//!               │  log file)    │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod types;
pub mod page;
pub mod cache;
pub mod index;
pub mod storage;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DeltaError, Result};
pub use config::Config;
pub use engine::Engine;
pub use types::{ByteArray, PageId};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of DeltaKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
