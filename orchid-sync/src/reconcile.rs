//! Repair drift between remote `status` flags and local favorite records.
//!
//! The remote catalog is the store of record:
//!
//! | remote            | local record | action                     |
//! |-------------------|--------------|----------------------------|
//! | `status = true`   | missing      | write record from the item |
//! | `status = true`   | malformed    | rewrite record             |
//! | `status = false`  | present      | remove record              |
//! | item missing      | present      | remove record              |

use std::collections::BTreeMap;

use orchid_core::{FavoriteRecord, ItemId};
use orchid_remote::CatalogApi;
use orchid_store::{favorites, KeyValueStore};

use crate::error::SyncError;

/// What a reconcile pass changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records written for remote favorites that had none.
    pub added: Vec<ItemId>,
    /// Records dropped because the remote no longer marks them.
    pub removed: Vec<ItemId>,
    /// Malformed records rewritten from the remote item.
    pub repaired: Vec<ItemId>,
    pub unchanged: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.repaired.is_empty()
    }
}

pub fn reconcile(
    catalog: &dyn CatalogApi,
    store: &dyn KeyValueStore,
) -> Result<ReconcileReport, SyncError> {
    let items = catalog.fetch_all()?;
    let remote: BTreeMap<ItemId, _> = items.iter().map(|i| (i.id.clone(), i)).collect();

    let keys = favorites::keys(store)?;
    let mut local: BTreeMap<ItemId, bool> = BTreeMap::new();
    for (key, value) in store.multi_get(&keys)? {
        let Some(id) = ItemId::from_favorite_key(&key) else {
            continue;
        };
        let valid = value
            .as_deref()
            .is_some_and(|v| favorites::decode(&key, v).is_ok());
        local.insert(id, valid);
    }

    let mut report = ReconcileReport::default();

    for (id, valid) in &local {
        match remote.get(id) {
            Some(item) if item.status => {
                if *valid {
                    report.unchanged += 1;
                } else {
                    favorites::put(store, &FavoriteRecord::from_item(item))?;
                    report.repaired.push(id.clone());
                }
            }
            _ => {
                favorites::remove(store, id)?;
                report.removed.push(id.clone());
            }
        }
    }

    for (id, item) in &remote {
        if item.status && !local.contains_key(id) {
            favorites::put(store, &FavoriteRecord::from_item(item))?;
            report.added.push(id.clone());
        }
    }

    tracing::info!(
        added = report.added.len(),
        removed = report.removed.len(),
        repaired = report.repaired.len(),
        unchanged = report.unchanged,
        "reconcile complete"
    );
    Ok(report)
}
