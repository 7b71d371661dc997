//! Catalog reads and mutations, keeping favorite records in step.

use orchid_core::{CreateForm, EditForm, FavoriteRecord, Item, ItemId};
use orchid_remote::CatalogApi;
use orchid_store::{favorites, KeyValueStore};

use crate::error::SyncError;

pub fn fetch_all(catalog: &dyn CatalogApi) -> Result<Vec<Item>, SyncError> {
    let items = catalog.fetch_all()?;
    tracing::debug!(count = items.len(), "catalog fetched");
    Ok(items)
}

pub fn fetch_one(catalog: &dyn CatalogApi, id: &ItemId) -> Result<Item, SyncError> {
    Ok(catalog.fetch_one(id)?)
}

/// Validate `form` and create the item remotely.
///
/// Nothing is sent when validation fails. A created item with
/// `status = true` gets a favorite record under its server-assigned id.
pub fn create_item(
    catalog: &dyn CatalogApi,
    store: &dyn KeyValueStore,
    form: &CreateForm,
) -> Result<Item, SyncError> {
    let new_item = form.validate()?;
    let created = catalog.create(&new_item)?;
    if created.status {
        favorites::put(store, &FavoriteRecord::from_item(&created))?;
    }
    tracing::info!(id = %created.id, favorite = created.status, "item created");
    Ok(created)
}

/// Validate the supplied subset of `form` and send only those fields.
///
/// An existing favorite record has its display fields refreshed. A record
/// that no longer decodes is rewritten from the updated item while the
/// remote still marks it, and otherwise left for [`crate::reconcile`].
pub fn update_item(
    catalog: &dyn CatalogApi,
    store: &dyn KeyValueStore,
    id: &ItemId,
    form: &EditForm,
) -> Result<Item, SyncError> {
    let patch = form.validate()?;
    let updated = catalog.update(id, &patch)?;
    tracing::info!(%id, "item updated");

    let key = id.favorite_key();
    let Some(raw) = store.get(&key)? else {
        return Ok(updated);
    };
    match favorites::decode(&key, &raw) {
        Ok(mut record) => {
            record.name = updated.name.clone();
            record.weight = Some(updated.weight);
            record.rating = Some(updated.rating);
            favorites::put(store, &record)?;
            tracing::debug!(%id, "favorite record refreshed");
        }
        Err(err) if updated.status => {
            tracing::warn!(%id, error = %err, "rewriting malformed favorite record");
            favorites::put(store, &FavoriteRecord::from_item(&updated))?;
        }
        Err(err) => {
            tracing::warn!(%id, error = %err, "malformed favorite record left for reconcile");
        }
    }
    Ok(updated)
}

/// Delete `id` remotely, then drop its favorite record.
pub fn delete_item(
    catalog: &dyn CatalogApi,
    store: &dyn KeyValueStore,
    id: &ItemId,
) -> Result<Item, SyncError> {
    let deleted = catalog.delete(id)?;
    favorites::remove(store, id)?;
    tracing::info!(%id, "item deleted");
    Ok(deleted)
}
