//! Error types for orchid-sync.

use thiserror::Error;

use orchid_core::ValidationError;
use orchid_remote::RemoteError;
use orchid_store::StoreError;

/// All errors that can arise from sync, catalog and account operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A remote catalog or transport failure.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// A local store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Form input rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The identity provider's message, verbatim.
    #[error("{0}")]
    Auth(String),

    /// No session token is stored.
    #[error("not logged in; run `orchid login` first")]
    NotLoggedIn,
}
