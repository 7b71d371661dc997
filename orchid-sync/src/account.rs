//! Sign-in, sign-up and the locally cached session.

use orchid_core::{LoginForm, RegisterForm, Session, User};
use orchid_remote::{AuthGateway, RemoteError};
use orchid_store::{session, KeyValueStore};

use crate::error::SyncError;

fn auth_error(err: RemoteError) -> SyncError {
    match err {
        RemoteError::Auth(message) => SyncError::Auth(message),
        other => SyncError::Remote(other),
    }
}

/// Validate credentials, sign in, and persist the session.
///
/// On failure the provider's message is returned and nothing is written.
pub fn login(
    auth: &dyn AuthGateway,
    store: &dyn KeyValueStore,
    form: &LoginForm,
) -> Result<Session, SyncError> {
    let email = form.validate()?;
    let session = auth.sign_in(&email, &form.password).map_err(|err| {
        tracing::warn!(email = %email, error = %err, "sign-in rejected");
        auth_error(err)
    })?;
    session::save(store, &session)?;
    tracing::info!(uid = %session.user.uid, "signed in");
    Ok(session)
}

/// Create an account. No session is stored; the user signs in afterwards.
pub fn register(auth: &dyn AuthGateway, form: &RegisterForm) -> Result<User, SyncError> {
    let email = form.validate()?;
    let session = auth.sign_up(&email, &form.password).map_err(auth_error)?;
    tracing::info!(uid = %session.user.uid, "account created");
    Ok(session.user)
}

pub fn logout(store: &dyn KeyValueStore) -> Result<(), SyncError> {
    session::clear(store)?;
    tracing::info!("signed out");
    Ok(())
}

pub fn current_session(store: &dyn KeyValueStore) -> Result<Option<Session>, SyncError> {
    Ok(session::load(store)?)
}

/// The stored session, or [`SyncError::NotLoggedIn`].
pub fn require_session(store: &dyn KeyValueStore) -> Result<Session, SyncError> {
    current_session(store)?.ok_or(SyncError::NotLoggedIn)
}
