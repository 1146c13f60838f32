//! Page identifiers
//!
//! A page id is an opaque 128-bit handle. New pages get a fresh id from a
//! `PageIdGenerator`; recovered pages keep the id stored in the log.

use std::fmt;

use uuid::Uuid;

use crate::config::PageIdSource;

/// 128-bit page identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(Uuid);

impl PageId {
    /// Generate a random id (UUID v4)
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an id from its high and low 64-bit halves
    pub fn from_parts(high: u64, low: u64) -> Self {
        Self::from_u128(((high as u128) << 64) | low as u128)
    }

    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    /// Most significant 64 bits (written first in the log)
    pub fn high(&self) -> u64 {
        (self.as_u128() >> 64) as u64
    }

    /// Least significant 64 bits
    pub fn low(&self) -> u64 {
        self.as_u128() as u64
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageId({})", self.0.hyphenated())
    }
}

/// Hands out ids for newly created pages
#[derive(Debug, Clone)]
pub struct PageIdGenerator {
    source: PageIdSource,
    next: u128,
}

impl PageIdGenerator {
    pub fn new(source: PageIdSource) -> Self {
        let next = match source {
            PageIdSource::Random => 0,
            PageIdSource::Sequential { start } => start,
        };
        Self { source, next }
    }

    /// Produce the next id
    pub fn next_id(&mut self) -> PageId {
        match self.source {
            PageIdSource::Random => PageId::random(),
            PageIdSource::Sequential { .. } => {
                let id = PageId::from_u128(self.next);
                self.next = self.next.wrapping_add(1);
                id
            }
        }
    }
}
