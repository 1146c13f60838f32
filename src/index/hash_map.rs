//! HashMap index
//!
//! One-to-one key → pid mapping. Bindings are never removed: a deleted key
//! keeps its page, so later writes land on the same page and its history.

use std::collections::HashMap;

use crate::cache::CacheManager;
use crate::error::Result;
use crate::page::OnDiskPage;
use crate::types::{ByteArray, PageId};

use super::Index;

#[derive(Debug, Default)]
pub struct HashMapIndex {
    map: HashMap<ByteArray, PageId>,
}

impl HashMapIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Index for HashMapIndex {
    fn get(&self, key: &[u8], cache: &mut CacheManager) -> Result<Option<ByteArray>> {
        match self.map.get(key) {
            Some(&pid) => Ok(cache.get_in_memory_page(pid)?.get(key)),
            None => Ok(None),
        }
    }

    fn put(&mut self, key: ByteArray, value: ByteArray, cache: &mut CacheManager) -> Result<()> {
        let page = match self.map.get(key.as_bytes()).copied() {
            Some(pid) => cache.get_in_memory_page(pid)?,
            None => {
                let page = cache.create_in_memory_page()?;
                self.map.insert(key.clone(), page.pid());
                page
            }
        };
        page.put(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8], cache: &mut CacheManager) -> Result<()> {
        if let Some(&pid) = self.map.get(key) {
            cache.get_in_memory_page(pid)?.delete(key);
        }
        Ok(())
    }

    fn add(&mut self, key: ByteArray, page: &OnDiskPage) {
        self.map.insert(key, page.pid());
    }

    fn page_of(&self, key: &[u8]) -> Option<PageId> {
        self.map.get(key).copied()
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
