//! Favorite sync between the remote `status` flag and local favorite records.
//!
//! ## Toggle protocol
//!
//! 1. `new_status = !current_status`.
//! 2. `PUT /orchids/{id}` with `{"status": new_status}`.
//! 3. Remote failure → abandon; the local store is not touched.
//! 4. `new_status` → write `orchid_<id>`; otherwise remove it.
//!
//! Step 4 failing after step 2 succeeded leaves the stores disagreeing;
//! [`crate::reconcile`] repairs that.

use orchid_core::{FavoriteRecord, FavoriteSnapshot, ItemId, ItemPatch};
use orchid_remote::CatalogApi;
use orchid_store::{favorites, KeyValueStore};

use crate::error::SyncError;

/// User-visible message produced by a favorites action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub message: String,
}

impl Notification {
    fn new(message: String) -> Self {
        Self {
            title: "Notification",
            message,
        }
    }
}

/// Outcome of a completed toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub id: ItemId,
    /// The status now held by both stores.
    pub status: bool,
    pub notification: Notification,
}

/// Flip the favorite state of `id`, remote first.
pub fn toggle_favorite(
    catalog: &dyn CatalogApi,
    store: &dyn KeyValueStore,
    id: &ItemId,
    current_status: bool,
    snapshot: FavoriteSnapshot,
) -> Result<ToggleOutcome, SyncError> {
    let new_status = !current_status;

    if let Err(err) = catalog.update(id, &ItemPatch::status(new_status)) {
        tracing::error!(%id, error = %err, "favorite toggle abandoned: remote update failed");
        return Err(err.into());
    }

    let name = snapshot.name.clone();
    let local = if new_status {
        favorites::put(store, &FavoriteRecord::new(id.clone(), snapshot))
    } else {
        favorites::remove(store, id)
    };
    if let Err(err) = local {
        tracing::error!(
            %id,
            status = new_status,
            error = %err,
            "remote status updated but local favorite write failed; run reconcile"
        );
        return Err(err.into());
    }

    tracing::info!(%id, status = new_status, "favorite toggled");
    let message = if new_status {
        format!("{name} added to favorites!")
    } else {
        format!("{name} removed from favorites!")
    };
    Ok(ToggleOutcome {
        id: id.clone(),
        status: new_status,
        notification: Notification::new(message),
    })
}

/// Fetch `id` and toggle it from its current remote status.
pub fn toggle_favorite_by_id(
    catalog: &dyn CatalogApi,
    store: &dyn KeyValueStore,
    id: &ItemId,
) -> Result<ToggleOutcome, SyncError> {
    let item = catalog.fetch_one(id)?;
    toggle_favorite(catalog, store, id, item.status, FavoriteSnapshot::from(&item))
}

// ---------------------------------------------------------------------------
// Favorites list
// ---------------------------------------------------------------------------

/// Rebuild the favorites list from the local store.
///
/// Values that fail to decode are logged and skipped. The result is ordered
/// by store key, so repeated loads without mutation are identical.
pub fn load_favorites(store: &dyn KeyValueStore) -> Result<Vec<FavoriteRecord>, SyncError> {
    let keys = favorites::keys(store)?;
    let mut records = Vec::with_capacity(keys.len());
    for (key, value) in store.multi_get(&keys)? {
        let Some(value) = value else {
            continue;
        };
        match favorites::decode(&key, &value) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(key = %key, error = %err, "skipping malformed favorite"),
        }
    }
    Ok(records)
}

/// Outcome of removing one favorite from the favorites list.
#[derive(Debug)]
pub struct RemoveOutcome {
    pub id: ItemId,
    /// Set when the local record was removed but the remote update failed.
    pub remote_error: Option<String>,
    pub notification: Notification,
}

/// Remove `id` locally, then clear its remote status.
///
/// The local removal stands even when the remote update fails.
pub fn remove_favorite(
    catalog: &dyn CatalogApi,
    store: &dyn KeyValueStore,
    id: &ItemId,
) -> Result<RemoveOutcome, SyncError> {
    favorites::remove(store, id)?;
    let remote_error = match catalog.update(id, &ItemPatch::status(false)) {
        Ok(_) => None,
        Err(err) => {
            tracing::error!(%id, error = %err, "favorite removed locally but remote update failed");
            Some(err.to_string())
        }
    };
    Ok(RemoveOutcome {
        id: id.clone(),
        remote_error,
        notification: Notification::new("Orchid Removed Successfully".to_string()),
    })
}

/// Per-id result of a bulk clear.
#[derive(Debug, Default)]
pub struct ClearReport {
    /// Ids whose remote status was cleared.
    pub cleared: Vec<ItemId>,
    /// Ids removed locally whose remote update failed, with the reason.
    pub failed: Vec<(ItemId, String)>,
}

impl ClearReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn notification(&self) -> Notification {
        if self.is_complete() {
            Notification::new("All Orchids Cleared Successfully".to_string())
        } else {
            Notification::new(format!(
                "Favorites cleared locally; {} of {} remote updates failed",
                self.failed.len(),
                self.failed.len() + self.cleared.len()
            ))
        }
    }
}

/// Remove every favorite record, then clear each remote status in turn.
///
/// Every id is attempted; failures are reported, not rolled back.
pub fn clear_favorites(
    catalog: &dyn CatalogApi,
    store: &dyn KeyValueStore,
) -> Result<ClearReport, SyncError> {
    let keys = favorites::keys(store)?;
    let ids: Vec<ItemId> = keys
        .iter()
        .filter_map(|key| ItemId::from_favorite_key(key))
        .collect();
    store.multi_remove(&keys)?;
    tracing::info!(count = ids.len(), "favorites cleared locally");

    let mut report = ClearReport::default();
    for id in ids {
        match catalog.update(&id, &ItemPatch::status(false)) {
            Ok(_) => report.cleared.push(id),
            Err(err) => {
                tracing::error!(%id, error = %err, "remote status reset failed");
                report.failed.push((id, err.to_string()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchid_core::Item;
    use orchid_remote::MemoryCatalog;
    use orchid_store::MemoryStore;

    fn item(id: &str, status: bool) -> Item {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": format!("orchid {id}"), "image": "https://x/o.png",
            "weight": 10, "rating": 4, "status": status,
        }))
        .unwrap()
    }

    #[test]
    fn notification_names_the_item() {
        let catalog = MemoryCatalog::with_items([item("1", false)]);
        let store = MemoryStore::new();
        let out = toggle_favorite_by_id(&catalog, &store, &ItemId::from("1")).unwrap();
        assert_eq!(out.notification.message, "orchid 1 added to favorites!");
        let out = toggle_favorite_by_id(&catalog, &store, &ItemId::from("1")).unwrap();
        assert_eq!(out.notification.message, "orchid 1 removed from favorites!");
        assert!(!out.status);
    }

    #[test]
    fn load_skips_malformed_and_missing() {
        let store = MemoryStore::new();
        store.set("orchid_1", r#"{"id":"1","status":true,"image":"","name":"A"}"#).unwrap();
        store.set("orchid_2", "{broken").unwrap();
        store.set("user", "{}").unwrap();
        let list = load_favorites(&store).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, ItemId::from("1"));
    }

    #[test]
    fn remove_keeps_local_removal_when_remote_fails() {
        let catalog = MemoryCatalog::with_items([item("4", true)]);
        catalog.fail_on(&ItemId::from("4"));
        let store = MemoryStore::new();
        favorites::put(&store, &FavoriteRecord::from_item(&item("4", true))).unwrap();

        let out = remove_favorite(&catalog, &store, &ItemId::from("4")).unwrap();
        assert!(out.remote_error.is_some());
        assert!(favorites::keys(&store).unwrap().is_empty());
    }
}
