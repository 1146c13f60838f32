//! Storage Module
//!
//! The database is one append-only log file. There is no header, magic number
//! or checkpoint; an empty file is a valid empty database.
//!
//! ## Responsibilities
//! - Encode records so they can be parsed from the end of the file
//! - Append records, never rewrite them
//! - Backward recovery scan at open
//! - Point reads of record values for page materialization
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Record 1 (oldest)                                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │ ...                                                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Record N (newest)                                            │
//! │ ┌───────┬──────────┬─────┬────────┬────────┬────────┬──────┐ │
//! │ │ Value │ ValLen(4)│ Key │KeyLen(4)│PidHi(8)│PidLo(8)│Tag(1)│ │
//! │ └───────┴──────────┴─────┴────────┴────────┴────────┴──────┘ │
//! └──────────────────────────────────────────────────────────────┘
//!                          recovery reads ◀──────────── from here
//! ```
//! Tags: 1 = page snapshot, 2 = insert, 3 = modify, 4 = delete. Delete
//! records have no value field.

mod cursor;
mod format;
mod manager;

pub use cursor::BackwardCursor;
pub use format::{LogRecord, LENGTH_SIZE, PID_SIZE, TAG_SIZE};
pub use manager::{RecoveryResult, StorageManager};
