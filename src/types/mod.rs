//! Core Value Types
//!
//! The two leaf types every other module is built on:
//! - `ByteArray`: immutable byte string used for keys and values
//! - `PageId`: 128-bit handle naming one logical page

mod byte_array;
mod page_id;

pub use byte_array::ByteArray;
pub use page_id::{PageId, PageIdGenerator};
