//! Record types
//!
//! In-memory pages hold decoded records; on-disk pages hold record locations.

use crate::types::ByteArray;

/// Record kinds as they appear in the log (the tag byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordKind {
    /// Full snapshot of a key's value
    Page = 1,
    /// First write of a key
    Insert = 2,
    /// Overwrite of a key that has a durable base record
    Modify = 3,
    /// Tombstone
    Delete = 4,
}

impl RecordKind {
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Parse a tag byte, `None` for anything unknown
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(RecordKind::Page),
            2 => Some(RecordKind::Insert),
            3 => Some(RecordKind::Modify),
            4 => Some(RecordKind::Delete),
            _ => None,
        }
    }

    /// Whether records of this kind carry a value field
    pub fn has_value(self) -> bool {
        !matches!(self, RecordKind::Delete)
    }
}

/// Base-map entry of an in-memory page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub value: ByteArray,
    pub flushed: bool,
}

/// The pending operation held in a key's delta slot
#[derive(Debug, Clone, PartialEq)]
pub enum DeltaOp {
    Insert(ByteArray),
    Modify(ByteArray),
    Delete,
}

impl DeltaOp {
    pub fn kind(&self) -> RecordKind {
        match self {
            DeltaOp::Insert(_) => RecordKind::Insert,
            DeltaOp::Modify(_) => RecordKind::Modify,
            DeltaOp::Delete => RecordKind::Delete,
        }
    }

    /// The value this delta resolves to, `None` for a tombstone
    pub fn value(&self) -> Option<&ByteArray> {
        match self {
            DeltaOp::Insert(value) | DeltaOp::Modify(value) => Some(value),
            DeltaOp::Delete => None,
        }
    }
}

/// Delta-map entry of an in-memory page.
///
/// A key has at most one delta: a second mutation before flush replaces the
/// slot instead of chaining behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    pub op: DeltaOp,
    pub flushed: bool,
}

impl Delta {
    pub fn pending(op: DeltaOp) -> Self {
        Self { op, flushed: false }
    }

    pub fn durable(op: DeltaOp) -> Self {
        Self { op, flushed: true }
    }
}

/// Location of a record in the log file.
///
/// `position` is the offset just past the record's value length field, so a
/// backward read starting there yields the value. For tombstones it is the
/// offset of the key's end and is never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLocation {
    pub kind: RecordKind,
    pub position: u64,
}
