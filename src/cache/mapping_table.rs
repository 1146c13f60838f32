//! Mapping Table
//!
//! Directory from page id to the page object currently representing it.
//! Entries are never removed; materialization overwrites the on-disk entry
//! with its in-memory counterpart under the same pid.

use std::collections::HashMap;

use crate::page::Page;
use crate::types::PageId;

#[derive(Debug, Default)]
pub struct MappingTable {
    pages: HashMap<PageId, Page>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pid: &PageId) -> Option<&Page> {
        self.pages.get(pid)
    }

    pub fn get_mut(&mut self, pid: &PageId) -> Option<&mut Page> {
        self.pages.get_mut(pid)
    }

    /// Register a page under its own pid, replacing any previous entry.
    /// Returns the replaced page.
    pub fn put(&mut self, page: Page) -> Option<Page> {
        self.pages.insert(page.pid(), page)
    }

    pub fn contains(&self, pid: &PageId) -> bool {
        self.pages.contains_key(pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.pages.values_mut()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
