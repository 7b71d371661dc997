//! # orchid-store
//!
//! Device-local key-value persistence.
//!
//! [`KeyValueStore`] is the storage seam; [`FileStore`] writes
//! `~/.orchid/store.json` atomically and [`MemoryStore`] backs tests.
//! [`favorites`] and [`session`] layer typed records over it.

pub mod error;
pub mod favorites;
pub mod kv;
pub mod session;

pub use error::StoreError;
pub use kv::{store_path_at, FileStore, KeyValueStore, MemoryStore, StoreMap};
