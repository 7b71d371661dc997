use std::collections::BTreeSet;

use orchid_core::{CreateForm, EditForm, FavoriteSnapshot, Item, ItemId, ItemPatch, LoginForm};
use orchid_remote::{CatalogCall, MemoryAuth, MemoryCatalog};
use orchid_store::{favorites, session, FileStore, KeyValueStore};
use orchid_sync::{
    clear_favorites, create_item, delete_item, load_favorites, login, reconcile,
    toggle_favorite, toggle_favorite_by_id, update_item, SyncError,
};
use rstest::rstest;
use tempfile::TempDir;

fn item(id: &str, name: &str, status: bool) -> Item {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "image": format!("https://example.com/{id}.png"),
        "weight": 20,
        "rating": 4,
        "status": status,
    }))
    .expect("item fixture")
}

fn file_store(home: &TempDir) -> FileStore {
    FileStore::at_home(home.path())
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[test]
fn toggling_phal_marks_remote_and_writes_record() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let phal = item("7", "Phal", false);
    let catalog = MemoryCatalog::with_items([phal.clone()]);

    let outcome = toggle_favorite(
        &catalog,
        &store,
        &phal.id,
        phal.status,
        FavoriteSnapshot::from(&phal),
    )
    .expect("toggle");

    assert!(outcome.status);
    assert_eq!(outcome.notification.title, "Notification");
    assert_eq!(outcome.notification.message, "Phal added to favorites!");
    assert!(catalog.item(&phal.id).expect("remote item").status);
    assert_eq!(
        catalog.calls(),
        vec![CatalogCall::Update(ItemId::from("7"), ItemPatch::status(true))]
    );

    // Reopen the store from disk.
    let raw = file_store(&home).get("orchid_7").expect("get").expect("record");
    let record = favorites::decode("orchid_7", &raw).expect("decode");
    assert_eq!(record.id, ItemId::from("7"));
    assert!(record.status);
    assert_eq!(record.name, "Phal");
}

#[test]
fn toggling_off_removes_record() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let catalog = MemoryCatalog::with_items([item("3", "Vanda", false)]);
    let id = ItemId::from("3");

    toggle_favorite_by_id(&catalog, &store, &id).expect("on");
    assert!(favorites::get(&store, &id).expect("get").is_some());

    let outcome = toggle_favorite_by_id(&catalog, &store, &id).expect("off");
    assert!(!outcome.status);
    assert!(favorites::get(&store, &id).expect("get").is_none());
    assert!(!catalog.item(&id).expect("remote item").status);
}

#[rstest]
#[case(false)]
#[case(true)]
fn remote_failure_leaves_local_untouched(#[case] current: bool) {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let existing = item("5", "Dendrobium", current);
    if current {
        favorites::put(&store, &orchid_core::FavoriteRecord::from_item(&existing))
            .expect("seed record");
    }
    let before = store.all_keys().expect("keys");

    let catalog = MemoryCatalog::with_items([existing.clone()]);
    catalog.fail_on(&existing.id);

    let err = toggle_favorite(
        &catalog,
        &store,
        &existing.id,
        current,
        FavoriteSnapshot::from(&existing),
    )
    .unwrap_err();
    assert!(matches!(err, SyncError::Remote(_)), "got: {err}");
    assert_eq!(store.all_keys().expect("keys"), before);
    assert_eq!(
        catalog.item(&existing.id).expect("remote item").status,
        current
    );
}

// ---------------------------------------------------------------------------
// Loader and bulk clear
// ---------------------------------------------------------------------------

#[test]
fn loader_is_idempotent() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let catalog = MemoryCatalog::with_items([
        item("12", "Cattleya", false),
        item("2", "Oncidium", false),
        item("30", "Miltonia", false),
    ]);
    for id in ["30", "2", "12"] {
        toggle_favorite_by_id(&catalog, &store, &ItemId::from(id)).expect("toggle");
    }

    let first = load_favorites(&store).expect("first load");
    let second = load_favorites(&store).expect("second load");
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn clear_sends_one_status_false_per_record() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let items: Vec<Item> = (1..=4)
        .map(|n| item(&n.to_string(), &format!("orchid {n}"), false))
        .collect();
    let catalog = MemoryCatalog::with_items(items.clone());
    for it in &items {
        toggle_favorite_by_id(&catalog, &store, &it.id).expect("toggle");
    }
    let calls_before = catalog.calls().len();

    let report = clear_favorites(&catalog, &store).expect("clear");

    assert!(report.is_complete());
    assert!(load_favorites(&store).expect("load").is_empty());

    let updates: Vec<_> = catalog.calls()[calls_before..]
        .iter()
        .map(|call| match call {
            CatalogCall::Update(id, patch) => {
                assert_eq!(patch, &ItemPatch::status(false));
                id.clone()
            }
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(updates.len(), 4);
    let distinct: BTreeSet<_> = updates.into_iter().collect();
    assert_eq!(distinct.len(), 4);
}

#[test]
fn clear_reports_failed_ids_and_keeps_going() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let catalog = MemoryCatalog::with_items([
        item("1", "a", false),
        item("2", "b", false),
        item("3", "c", false),
    ]);
    for id in ["1", "2", "3"] {
        toggle_favorite_by_id(&catalog, &store, &ItemId::from(id)).expect("toggle");
    }
    catalog.fail_on(&ItemId::from("2"));

    let report = clear_favorites(&catalog, &store).expect("clear");

    assert_eq!(report.cleared, vec![ItemId::from("1"), ItemId::from("3")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, ItemId::from("2"));
    assert!(report.notification().message.contains("1 of 3"));
    assert!(favorites::keys(&store).expect("keys").is_empty());
}

// ---------------------------------------------------------------------------
// Edit and delete over unreadable records
// ---------------------------------------------------------------------------

#[test]
fn edit_succeeds_and_repairs_unreadable_record() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let catalog = MemoryCatalog::with_items([item("4", "Dendrobium", true)]);
    let id = ItemId::from("4");
    store.set(&id.favorite_key(), "not json").expect("seed");

    let edit = EditForm {
        weight: Some("35".into()),
        ..EditForm::default()
    };
    let updated = update_item(&catalog, &store, &id, &edit).expect("update");
    assert_eq!(updated.weight, 35.0);

    let record = favorites::get(&store, &id).expect("get").expect("record");
    assert_eq!(record.name, "Dendrobium");
    assert_eq!(record.weight, Some(35.0));
    assert!(matches!(
        catalog.calls().last(),
        Some(CatalogCall::Update(called, _)) if *called == id
    ));
}

#[test]
fn delete_succeeds_and_drops_unreadable_record() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let catalog = MemoryCatalog::with_items([item("4", "Dendrobium", true)]);
    let id = ItemId::from("4");
    store.set(&id.favorite_key(), "not json").expect("seed");

    let deleted = delete_item(&catalog, &store, &id).expect("delete");
    assert_eq!(deleted.name, "Dendrobium");
    assert_eq!(store.get(&id.favorite_key()).expect("get"), None);
    assert!(catalog.item(&id).is_none());
}

// ---------------------------------------------------------------------------
// Create, login, reconcile
// ---------------------------------------------------------------------------

#[test]
fn negative_weight_is_rejected_before_any_call() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let catalog = MemoryCatalog::new();
    let form = CreateForm {
        name: "Phal".into(),
        weight: "-1".into(),
        rating: "4".into(),
        price: "10".into(),
        image: "https://example.com/p.png".into(),
        color: "pink".into(),
        bonus: "none".into(),
        origin: "Taiwan".into(),
        category: "Moth".into(),
        ..CreateForm::default()
    };

    let err = create_item(&catalog, &store, &form).unwrap_err();
    let SyncError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert_eq!(
        validation.message_for("weight"),
        Some("Weight must be positive")
    );
    assert!(!catalog.calls().iter().any(CatalogCall::is_mutation));
    assert!(!store.path().exists());
}

#[test]
fn unknown_email_stores_no_token() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let auth = MemoryAuth::with_account("known@example.com", "secret1");

    let err = login(
        &auth,
        &store,
        &LoginForm {
            email: "ghost@example.com".into(),
            password: "secret1".into(),
        },
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "EMAIL_NOT_FOUND");
    assert_eq!(store.get(session::USER_TOKEN_KEY).expect("get"), None);
}

#[test]
fn reconcile_repairs_both_directions() {
    let home = TempDir::new().expect("home");
    let store = file_store(&home);
    let catalog = MemoryCatalog::with_items([
        item("1", "remote only", true),
        item("2", "local only", false),
        item("3", "both", true),
    ]);
    favorites::put(
        &store,
        &orchid_core::FavoriteRecord::from_item(&item("2", "local only", true)),
    )
    .expect("seed 2");
    favorites::put(
        &store,
        &orchid_core::FavoriteRecord::from_item(&item("3", "both", true)),
    )
    .expect("seed 3");
    favorites::put(
        &store,
        &orchid_core::FavoriteRecord::from_item(&item("9", "deleted", true)),
    )
    .expect("seed 9");

    let report = reconcile(&catalog, &store).expect("reconcile");

    assert_eq!(report.added, vec![ItemId::from("1")]);
    assert_eq!(report.removed, vec![ItemId::from("2"), ItemId::from("9")]);
    assert_eq!(report.unchanged, 1);
    assert_eq!(
        favorites::keys(&store).expect("keys"),
        vec!["orchid_1", "orchid_3"]
    );

    let again = reconcile(&catalog, &store).expect("second pass");
    assert!(again.is_clean());
}
