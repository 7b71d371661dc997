//! Session persistence: the access token under `userToken` and the user
//! profile (JSON) under `user`.

use orchid_core::{Session, User};

use crate::error::StoreError;
use crate::kv::KeyValueStore;

pub const USER_TOKEN_KEY: &str = "userToken";
pub const USER_KEY: &str = "user";

pub fn save(store: &dyn KeyValueStore, session: &Session) -> Result<(), StoreError> {
    let user = serde_json::to_string(&session.user)?;
    store.set(USER_KEY, &user)?;
    store.set(USER_TOKEN_KEY, &session.token)
}

/// The stored session, or `None` when no token is present.
///
/// A token without a user profile is treated as signed out.
pub fn load(store: &dyn KeyValueStore) -> Result<Option<Session>, StoreError> {
    let Some(token) = store.get(USER_TOKEN_KEY)? else {
        return Ok(None);
    };
    let Some(raw_user) = store.get(USER_KEY)? else {
        tracing::warn!("session token present without user profile");
        return Ok(None);
    };
    let user: User = serde_json::from_str(&raw_user).map_err(|e| StoreError::Record {
        key: USER_KEY.to_string(),
        source: e,
    })?;
    Ok(Some(Session { token, user }))
}

pub fn clear(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.multi_remove(&[USER_TOKEN_KEY.to_string(), USER_KEY.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user: User {
                uid: "u1".into(),
                email: "a@b.co".into(),
                refresh_token: None,
                expires_in: Some("3600".into()),
                signed_in_at: None,
            },
        }
    }

    #[test]
    fn save_load_clear() {
        let store = MemoryStore::new();
        assert_eq!(load(&store).unwrap(), None);
        save(&store, &session()).unwrap();
        assert_eq!(load(&store).unwrap(), Some(session()));
        assert_eq!(store.get(USER_TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        clear(&store).unwrap();
        assert_eq!(load(&store).unwrap(), None);
        assert!(store.all_keys().unwrap().is_empty());
    }

    #[test]
    fn token_without_user_is_signed_out() {
        let store = MemoryStore::new();
        store.set(USER_TOKEN_KEY, "tok").unwrap();
        assert_eq!(load(&store).unwrap(), None);
    }
}
