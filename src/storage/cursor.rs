//! Backward cursor
//!
//! Reads fields right-to-left from a seekable source. Each read moves the
//! cursor to the start of the field it consumed.

use std::io::{Read, Seek, SeekFrom};

use crate::error::{DeltaError, Result};
use crate::types::PageId;

pub struct BackwardCursor<'a, R> {
    reader: &'a mut R,
    position: u64,
}

impl<'a, R: Read + Seek> BackwardCursor<'a, R> {
    /// Create a cursor that will read the bytes before `position`
    pub fn new(reader: &'a mut R, position: u64) -> Self {
        Self { reader, position }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the `N` bytes ending at the cursor
    pub fn read_fixed_backward<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.step_back(N as u64)?;
        let mut buf = [0u8; N];
        self.reader.seek(SeekFrom::Start(self.position))?;
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8_backward(&mut self) -> Result<u8> {
        let [byte] = self.read_fixed_backward::<1>()?;
        Ok(byte)
    }

    pub fn read_u32_backward(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_fixed_backward::<4>()?))
    }

    pub fn read_u64_backward(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_fixed_backward::<8>()?))
    }

    /// Page ids are written high half first, so the low half comes off first
    pub fn read_pid_backward(&mut self) -> Result<PageId> {
        let low = self.read_u64_backward()?;
        let high = self.read_u64_backward()?;
        Ok(PageId::from_parts(high, low))
    }

    /// Read a `[payload][len: u32]` field ending at the cursor
    pub fn read_length_prefixed_backward(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32_backward()? as u64;
        self.step_back(len)?;
        let mut buf = vec![0u8; len as usize];
        self.reader.seek(SeekFrom::Start(self.position))?;
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Step over a `[payload][len: u32]` field without reading the payload
    pub fn skip_length_prefixed_backward(&mut self) -> Result<()> {
        let len = self.read_u32_backward()? as u64;
        self.step_back(len)
    }

    fn step_back(&mut self, count: u64) -> Result<()> {
        if count > self.position {
            return Err(DeltaError::Format(format!(
                "truncated record: need {} bytes before offset {}",
                count, self.position
            )));
        }
        self.position -= count;
        Ok(())
    }
}
