//! File store error-message and atomic-write-safety tests.

use std::fs;

use orchid_core::{FavoriteRecord, FavoriteSnapshot, ItemId};
use orchid_store::{favorites, store_path_at, FileStore, KeyValueStore, StoreError};

fn record(id: &str) -> FavoriteRecord {
    FavoriteRecord::new(
        ItemId::from(id),
        FavoriteSnapshot {
            name: "Phal".into(),
            image: "https://example.com/p.png".into(),
            weight: Some(120.0),
            rating: Some(4.0),
        },
    )
}

// ---------------------------------------------------------------------------
// 1. Load errors
// ---------------------------------------------------------------------------

#[test]
fn corrupt_store_returns_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = store_path_at(home.path());
    fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
    fs::write(&path, b"[1, 2, 3]").expect("write");

    let err = FileStore::at_home(home.path()).all_keys().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "got: {err}");
    assert!(err.to_string().contains("store.json"));
}

#[test]
fn empty_file_is_an_empty_store() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = store_path_at(home.path());
    fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
    fs::write(&path, b"\n").expect("write");

    assert!(FileStore::at_home(home.path()).all_keys().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// 2. Atomic write safety
// ---------------------------------------------------------------------------

#[test]
fn stale_tmp_does_not_shadow_document() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let store = FileStore::at_home(home.path());
    favorites::put(&store, &record("7")).expect("put");
    let original = fs::read(store.path()).expect("read original");

    // Simulate crash: .tmp written but process died before rename
    let tmp = store.path().with_extension("json.tmp");
    fs::write(&tmp, b"CRASH - INCOMPLETE WRITE").expect("write crash tmp");

    assert_eq!(fs::read(store.path()).expect("read"), original);
    let loaded = favorites::get(&store, &ItemId::from("7")).expect("get");
    assert_eq!(loaded, Some(record("7")));
}

#[test]
fn multi_remove_keeps_unrelated_keys() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let store = FileStore::at_home(home.path());
    favorites::put(&store, &record("1")).unwrap();
    favorites::put(&store, &record("2")).unwrap();
    store.set("userToken", "tok").unwrap();

    let keys = favorites::keys(&store).unwrap();
    store.multi_remove(&keys).unwrap();

    let reopened = FileStore::at_home(home.path());
    assert_eq!(reopened.all_keys().unwrap(), vec!["userToken"]);
}

#[test]
fn document_is_plain_json_object() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let store = FileStore::at_home(home.path());
    favorites::put(&store, &record("7")).unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let inner: serde_json::Value =
        serde_json::from_str(doc["orchid_7"].as_str().expect("string value")).unwrap();
    assert_eq!(inner["id"], "7");
    assert_eq!(inner["status"], true);
}
