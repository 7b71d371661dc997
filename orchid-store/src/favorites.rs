//! Typed access to favorite records stored under `orchid_<id>`.

use orchid_core::{FavoriteRecord, ItemId, FAVORITE_KEY_PREFIX};

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Write (or overwrite) the record under its `orchid_<id>` key.
pub fn put(store: &dyn KeyValueStore, record: &FavoriteRecord) -> Result<(), StoreError> {
    let json = serde_json::to_string(record)?;
    store.set(&record.storage_key(), &json)
}

/// Read the record for `id`, if one is stored.
pub fn get(store: &dyn KeyValueStore, id: &ItemId) -> Result<Option<FavoriteRecord>, StoreError> {
    let key = id.favorite_key();
    match store.get(&key)? {
        Some(value) => decode(&key, &value).map(Some),
        None => Ok(None),
    }
}

pub fn remove(store: &dyn KeyValueStore, id: &ItemId) -> Result<(), StoreError> {
    store.remove(&id.favorite_key())
}

/// Every key with the favorite prefix, sorted.
pub fn keys(store: &dyn KeyValueStore) -> Result<Vec<String>, StoreError> {
    Ok(store
        .all_keys()?
        .into_iter()
        .filter(|k| k.starts_with(FAVORITE_KEY_PREFIX))
        .collect())
}

/// Decode one stored value.
pub fn decode(key: &str, value: &str) -> Result<FavoriteRecord, StoreError> {
    serde_json::from_str(value).map_err(|e| StoreError::Record {
        key: key.to_string(),
        source: e,
    })
}
