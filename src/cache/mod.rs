//! Cache Module
//!
//! Page directory and the manager that moves pages between their on-disk
//! and in-memory forms.

mod manager;
mod mapping_table;

pub use manager::CacheManager;
pub use mapping_table::MappingTable;
