pub mod account;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod reconcile;

pub use account::{current_session, login, logout, register, require_session};
pub use catalog::{create_item, delete_item, fetch_all, fetch_one, update_item};
pub use error::SyncError;
pub use favorites::{
    clear_favorites, load_favorites, remove_favorite, toggle_favorite, toggle_favorite_by_id,
    ClearReport, Notification, RemoveOutcome, ToggleOutcome,
};
pub use reconcile::{reconcile, ReconcileReport};
