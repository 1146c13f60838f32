//! Tests for pages
//!
//! These tests verify:
//! - InMemoryPage reads (delta over base, tombstones)
//! - Insert vs Modify classification by base-map membership
//! - One delta slot per key (later writes replace earlier ones)
//! - Flush ordering and idempotency
//! - OnDiskPage newest-first slot rules
//! - Page variant materialization and flush dispatch

use std::fs;
use std::path::PathBuf;

use deltakv::config::SyncStrategy;
use deltakv::page::{
    Delta, DeltaOp, InMemoryPage, OnDiskPage, Page, PageRecord, RecordKind, RecordLocation,
};
use deltakv::storage::{LogRecord, StorageManager};
use deltakv::types::{ByteArray, PageId};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn pid() -> PageId {
    PageId::from_u128(42)
}

fn setup_temp_storage() -> (TempDir, PathBuf, StorageManager) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pages.db");
    let storage = StorageManager::open(&path, SyncStrategy::EveryFlush).unwrap();
    (temp_dir, path, storage)
}

fn durable_record(value: &str) -> PageRecord {
    PageRecord {
        value: ByteArray::from(value),
        flushed: true,
    }
}

// =============================================================================
// InMemoryPage Read/Write Tests
// =============================================================================

#[test]
fn test_get_missing_key() {
    let page = InMemoryPage::new(pid());

    assert_eq!(page.get(b"key"), None);
}

#[test]
fn test_put_then_get() {
    let mut page = InMemoryPage::new(pid());

    page.put(ByteArray::from("key"), ByteArray::from("value"));

    assert_eq!(page.get(b"key"), Some(ByteArray::from("value")));
}

#[test]
fn test_put_without_base_record_is_insert() {
    let mut page = InMemoryPage::new(pid());

    page.put(ByteArray::from("key"), ByteArray::from("value"));

    let delta = page.delta(b"key").unwrap();
    assert_eq!(delta.op, DeltaOp::Insert(ByteArray::from("value")));
    assert!(!delta.flushed);
}

#[test]
fn test_put_with_base_record_is_modify() {
    let mut page = InMemoryPage::new(pid());
    page.install_record(ByteArray::from("key"), durable_record("old"));

    page.put(ByteArray::from("key"), ByteArray::from("new"));

    assert_eq!(
        page.delta(b"key").unwrap().op,
        DeltaOp::Modify(ByteArray::from("new"))
    );
    assert_eq!(page.get(b"key"), Some(ByteArray::from("new")));
}

#[test]
fn test_classification_ignores_pending_delta() {
    let mut page = InMemoryPage::new(pid());

    page.put(ByteArray::from("key"), ByteArray::from("v1"));
    page.put(ByteArray::from("key"), ByteArray::from("v2"));

    // Still an insert: the first write never reached the base map
    assert_eq!(
        page.delta(b"key").unwrap().op,
        DeltaOp::Insert(ByteArray::from("v2"))
    );
}

#[test]
fn test_second_put_replaces_delta() {
    let mut page = InMemoryPage::new(pid());

    page.put(ByteArray::from("key"), ByteArray::from("v1"));
    page.put(ByteArray::from("key"), ByteArray::from("v2"));

    assert_eq!(page.get(b"key"), Some(ByteArray::from("v2")));
    assert_eq!(page.unflushed_count(), 1);
}

#[test]
fn test_delta_shadows_base_record() {
    let mut page = InMemoryPage::new(pid());
    page.install_record(ByteArray::from("key"), durable_record("base"));
    page.install_delta(
        ByteArray::from("key"),
        Delta::durable(DeltaOp::Modify(ByteArray::from("delta"))),
    );

    assert_eq!(page.get(b"key"), Some(ByteArray::from("delta")));
}

#[test]
fn test_base_record_read_when_no_delta() {
    let mut page = InMemoryPage::new(pid());
    page.install_record(ByteArray::from("key"), durable_record("base"));

    assert_eq!(page.get(b"key"), Some(ByteArray::from("base")));
}

#[test]
fn test_delete_after_put() {
    let mut page = InMemoryPage::new(pid());
    page.put(ByteArray::from("key"), ByteArray::from("value"));

    page.delete(b"key");

    assert_eq!(page.get(b"key"), None);
    assert_eq!(page.delta(b"key").unwrap().op, DeltaOp::Delete);
}

#[test]
fn test_delete_hides_base_record() {
    let mut page = InMemoryPage::new(pid());
    page.install_record(ByteArray::from("key"), durable_record("base"));

    page.delete(b"key");

    assert_eq!(page.get(b"key"), None);
    assert!(page.record(b"key").is_some());
}

#[test]
fn test_delete_unknown_key_is_noop() {
    let mut page = InMemoryPage::new(pid());

    page.delete(b"ghost");

    assert!(page.delta(b"ghost").is_none());
    assert!(!page.is_dirty());
}

#[test]
fn test_delete_of_durable_tombstone_writes_fresh_tombstone() {
    let mut page = InMemoryPage::new(pid());
    page.install_delta(ByteArray::from("key"), Delta::durable(DeltaOp::Delete));

    page.delete(b"key");

    let delta = page.delta(b"key").unwrap();
    assert_eq!(delta.op, DeltaOp::Delete);
    assert!(!delta.flushed);
    assert_eq!(page.get(b"key"), None);
    assert_eq!(page.unflushed_count(), 1);
}

#[test]
fn test_delete_of_pending_tombstone_stays_single_slot() {
    let (_temp, path, mut storage) = setup_temp_storage();
    let mut page = InMemoryPage::new(pid());
    page.put(ByteArray::from("key"), ByteArray::from("value"));
    page.delete(b"key");

    page.delete(b"key");

    assert_eq!(page.flush(&mut storage).unwrap(), 1);
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes[bytes.len() - 1], RecordKind::Delete.tag());
}

#[test]
fn test_put_after_delete() {
    let mut page = InMemoryPage::new(pid());
    page.put(ByteArray::from("key"), ByteArray::from("v1"));
    page.delete(b"key");

    page.put(ByteArray::from("key"), ByteArray::from("v2"));

    assert_eq!(page.get(b"key"), Some(ByteArray::from("v2")));
}

// =============================================================================
// InMemoryPage Flush Tests
// =============================================================================

#[test]
fn test_flush_writes_pending_delta() {
    let (_temp, path, mut storage) = setup_temp_storage();
    let mut page = InMemoryPage::new(pid());
    page.put(ByteArray::from("key"), ByteArray::from("value"));

    let written = page.flush(&mut storage).unwrap();

    assert_eq!(written, 1);
    assert!(page.delta(b"key").unwrap().flushed);
    assert!(!page.is_dirty());
    // value(5) + len(4) + key(3) + len(4) + pid(16) + tag(1)
    assert_eq!(fs::metadata(&path).unwrap().len(), 33);
}

#[test]
fn test_flush_twice_writes_nothing_new() {
    let (_temp, path, mut storage) = setup_temp_storage();
    let mut page = InMemoryPage::new(pid());
    page.put(ByteArray::from("key"), ByteArray::from("value"));

    page.flush(&mut storage).unwrap();
    let len_after_first = fs::metadata(&path).unwrap().len();

    let written = page.flush(&mut storage).unwrap();

    assert_eq!(written, 0);
    assert_eq!(fs::metadata(&path).unwrap().len(), len_after_first);
}

#[test]
fn test_flush_skips_durable_records() {
    let (_temp, _path, mut storage) = setup_temp_storage();
    let mut page = InMemoryPage::new(pid());
    page.install_record(ByteArray::from("key"), durable_record("base"));
    page.install_delta(
        ByteArray::from("key"),
        Delta::durable(DeltaOp::Insert(ByteArray::from("v"))),
    );

    assert_eq!(page.flush(&mut storage).unwrap(), 0);
    assert_eq!(storage.len(), 0);
}

#[test]
fn test_flush_writes_base_records_before_deltas() {
    let (_temp, path, mut storage) = setup_temp_storage();
    let mut page = InMemoryPage::new(pid());
    page.install_record(
        ByteArray::from("key"),
        PageRecord {
            value: ByteArray::from("base"),
            flushed: false,
        },
    );
    page.put(ByteArray::from("key"), ByteArray::from("new"));

    assert_eq!(page.flush(&mut storage).unwrap(), 2);

    let bytes = fs::read(&path).unwrap();
    let snapshot_len = LogRecord::page(pid(), b"key", b"base").encoded_len() as usize;
    assert_eq!(bytes[snapshot_len - 1], RecordKind::Page.tag());
    assert_eq!(bytes[bytes.len() - 1], RecordKind::Modify.tag());
}

#[test]
fn test_flush_collapsed_writes_only_latest_value() {
    let (_temp, path, mut storage) = setup_temp_storage();
    let mut page = InMemoryPage::new(pid());
    page.put(ByteArray::from("key"), ByteArray::from("v1"));
    page.put(ByteArray::from("key"), ByteArray::from("v2"));

    assert_eq!(page.flush(&mut storage).unwrap(), 1);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[0..2], b"v2");
    assert_eq!(
        bytes.len() as u64,
        LogRecord::page(pid(), b"key", b"v2").encoded_len()
    );
}

#[test]
fn test_flush_tombstone_has_no_value() {
    let (_temp, path, mut storage) = setup_temp_storage();
    let mut page = InMemoryPage::new(pid());
    page.install_record(ByteArray::from("key"), durable_record("base"));
    page.delete(b"key");

    assert_eq!(page.flush(&mut storage).unwrap(), 1);

    // key(3) + len(4) + pid(16) + tag(1)
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 24);
    assert_eq!(bytes[23], RecordKind::Delete.tag());
}

// =============================================================================
// OnDiskPage Tests
// =============================================================================

fn location(kind: RecordKind, position: u64) -> RecordLocation {
    RecordLocation { kind, position }
}

#[test]
fn test_on_disk_first_delta_wins() {
    let mut page = OnDiskPage::new(pid());

    assert!(page.add(ByteArray::from("key"), location(RecordKind::Delete, 100)));
    assert!(!page.add(ByteArray::from("key"), location(RecordKind::Insert, 50)));

    assert_eq!(page.delta(b"key"), Some(&location(RecordKind::Delete, 100)));
    assert_eq!(page.deltas().count(), 1);
}

#[test]
fn test_on_disk_first_snapshot_wins() {
    let mut page = OnDiskPage::new(pid());

    assert!(page.add(ByteArray::from("key"), location(RecordKind::Page, 90)));
    assert!(!page.add(ByteArray::from("key"), location(RecordKind::Page, 10)));

    assert_eq!(page.page_record(b"key"), Some(&location(RecordKind::Page, 90)));
}

#[test]
fn test_on_disk_snapshot_and_delta_use_separate_slots() {
    let mut page = OnDiskPage::new(pid());

    assert!(page.add(ByteArray::from("key"), location(RecordKind::Modify, 200)));
    assert!(page.add(ByteArray::from("key"), location(RecordKind::Page, 100)));

    assert_eq!(page.page_records().count(), 1);
    assert_eq!(page.deltas().count(), 1);
}

// =============================================================================
// Page Variant Tests
// =============================================================================

#[test]
fn test_page_pid_for_both_variants() {
    let in_memory = Page::InMemory(InMemoryPage::new(pid()));
    let on_disk = Page::OnDisk(OnDiskPage::new(pid()));

    assert_eq!(in_memory.pid(), pid());
    assert_eq!(on_disk.pid(), pid());
    assert!(in_memory.is_in_memory());
    assert!(!on_disk.is_in_memory());
}

#[test]
fn test_materialize_in_memory_is_identity() {
    let (_temp, _path, mut storage) = setup_temp_storage();
    let page = Page::InMemory(InMemoryPage::new(pid()));

    assert!(page.materialize(&mut storage).unwrap().is_none());
}

#[test]
fn test_materialize_on_disk_reads_records() {
    let (_temp, _path, mut storage) = setup_temp_storage();
    let record = LogRecord {
        pid: pid(),
        key: b"key",
        kind: RecordKind::Insert,
        value: Some(&b"value"[..]),
    };
    let offset = storage.append(&record).unwrap();
    // Value field ends right after value(5) + len(4)
    let mut on_disk = OnDiskPage::new(pid());
    on_disk.add(ByteArray::from("key"), location(RecordKind::Insert, offset + 9));

    let page = Page::OnDisk(on_disk).materialize(&mut storage).unwrap().unwrap();

    assert_eq!(page.pid(), pid());
    assert_eq!(page.get(b"key"), Some(ByteArray::from("value")));
    assert!(page.delta(b"key").unwrap().flushed);
}

#[test]
fn test_on_disk_flush_is_noop() {
    let (_temp, _path, mut storage) = setup_temp_storage();
    let mut on_disk = OnDiskPage::new(pid());
    on_disk.add(ByteArray::from("key"), location(RecordKind::Delete, 0));
    let mut page = Page::OnDisk(on_disk);

    assert_eq!(page.flush(&mut storage).unwrap(), 0);
    assert!(storage.is_empty());
}

#[test]
fn test_page_variant_accessors() {
    let mut page = Page::InMemory(InMemoryPage::new(pid()));

    assert!(page.as_in_memory().is_some());
    assert!(page.as_on_disk().is_none());
    page.as_in_memory_mut()
        .unwrap()
        .put(ByteArray::from("k"), ByteArray::from("v"));
    assert_eq!(
        page.as_in_memory().unwrap().get(b"k"),
        Some(ByteArray::from("v"))
    );
}
