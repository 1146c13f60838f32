//! Log record encoding
//!
//! Every field is written payload-first with its size after it, so the file
//! can be parsed starting from its last byte.
//!
//! ```text
//! Page/Insert/Modify: [value][value_len: u32][key][key_len: u32][pid_hi: u64][pid_lo: u64][tag: u8]
//! Delete:                                    [key][key_len: u32][pid_hi: u64][pid_lo: u64][tag: u8]
//! ```
//! All integers are big-endian.

use bytes::{BufMut, BytesMut};

use crate::error::{DeltaError, Result};
use crate::page::{DeltaOp, RecordKind};
use crate::types::PageId;

/// Size of a length field
pub const LENGTH_SIZE: u64 = 4;

/// Size of an encoded page id
pub const PID_SIZE: u64 = 16;

/// Size of the tag byte
pub const TAG_SIZE: u64 = 1;

/// A record about to be appended to the log
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub pid: PageId,
    pub key: &'a [u8],
    pub kind: RecordKind,
    /// Present for every kind except Delete
    pub value: Option<&'a [u8]>,
}

impl<'a> LogRecord<'a> {
    /// Full snapshot record
    pub fn page(pid: PageId, key: &'a [u8], value: &'a [u8]) -> Self {
        Self {
            pid,
            key,
            kind: RecordKind::Page,
            value: Some(value),
        }
    }

    /// Record for a pending delta
    pub fn delta(pid: PageId, key: &'a [u8], op: &'a DeltaOp) -> Self {
        Self {
            pid,
            key,
            kind: op.kind(),
            value: op.value().map(|v| v.as_bytes()),
        }
    }

    /// Total encoded size in bytes
    pub fn encoded_len(&self) -> u64 {
        let value_len = self
            .value
            .map(|v| v.len() as u64 + LENGTH_SIZE)
            .unwrap_or(0);
        value_len + self.key.len() as u64 + LENGTH_SIZE + PID_SIZE + TAG_SIZE
    }

    /// Encode into a fresh buffer
    pub fn encode(&self) -> Result<BytesMut> {
        if self.kind.has_value() != self.value.is_some() {
            return Err(DeltaError::InvalidArgument(format!(
                "{:?} record {} a value",
                self.kind,
                if self.kind.has_value() { "requires" } else { "cannot carry" }
            )));
        }

        let mut buf = BytesMut::with_capacity(self.encoded_len() as usize);
        if let Some(value) = self.value {
            put_length_prefixed(&mut buf, value)?;
        }
        put_length_prefixed(&mut buf, self.key)?;
        buf.put_u64(self.pid.high());
        buf.put_u64(self.pid.low());
        buf.put_u8(self.kind.tag());

        Ok(buf)
    }
}

/// Payload followed by its u32 length
fn put_length_prefixed(buf: &mut BytesMut, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| {
        DeltaError::InvalidArgument(format!(
            "field of {} bytes exceeds the {} byte limit",
            bytes.len(),
            u32::MAX
        ))
    })?;
    buf.put_slice(bytes);
    buf.put_u32(len);
    Ok(())
}
