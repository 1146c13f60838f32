//! Index Module
//!
//! Resolves a user key to the page that holds it.
//!
//! ## Responsibilities
//! - Map key → pid (one key per page in this design)
//! - Route get/put/delete to the page through the cache manager
//! - Accept bindings from the recovery scan
//!
//! The trait is the seam for alternative indexes (ordered keys, pages with
//! many keys); `HashMapIndex` is the only implementation today.

mod hash_map;

pub use hash_map::HashMapIndex;

use crate::cache::CacheManager;
use crate::error::Result;
use crate::page::OnDiskPage;
use crate::types::{ByteArray, PageId};

/// Key → page directory
pub trait Index: Send {
    /// Current value of `key`, `None` if never written or deleted
    fn get(&self, key: &[u8], cache: &mut CacheManager) -> Result<Option<ByteArray>>;

    /// Write `value` under `key`, creating the key's page on first write
    fn put(&mut self, key: ByteArray, value: ByteArray, cache: &mut CacheManager) -> Result<()>;

    /// Delete `key`; unknown keys are ignored
    fn delete(&mut self, key: &[u8], cache: &mut CacheManager) -> Result<()>;

    /// Bind `key` to a page found by the recovery scan
    fn add(&mut self, key: ByteArray, page: &OnDiskPage);

    /// Page bound to `key`, if any
    fn page_of(&self, key: &[u8]) -> Option<PageId>;

    /// Number of keys bound (deleted keys included)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
