//! In-process catalog and identity provider fakes.
//!
//! Both record every call so callers can assert on exactly what would have
//! crossed the network.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use orchid_core::{Item, ItemId, ItemPatch, NewItem, Session, User};

use crate::auth::AuthGateway;
use crate::catalog::CatalogApi;
use crate::error::RemoteError;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One recorded catalog call.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    FetchAll,
    FetchOne(ItemId),
    Create(NewItem),
    Update(ItemId, ItemPatch),
    Delete(ItemId),
}

impl CatalogCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, CatalogCall::FetchAll | CatalogCall::FetchOne(_))
    }
}

/// Catalog held in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    items: Mutex<BTreeMap<ItemId, Item>>,
    calls: Mutex<Vec<CatalogCall>>,
    failing: Mutex<HashSet<ItemId>>,
    offline: Mutex<bool>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let catalog = Self::new();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    pub fn insert(&self, item: Item) {
        lock(&self.items).insert(item.id.clone(), item);
    }

    /// Current server-side copy of `id`.
    pub fn item(&self, id: &ItemId) -> Option<Item> {
        lock(&self.items).get(id).cloned()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<CatalogCall> {
        lock(&self.calls).clone()
    }

    /// Make every call touching `id` fail with a transport error.
    pub fn fail_on(&self, id: &ItemId) {
        lock(&self.failing).insert(id.clone());
    }

    /// Make every call fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        *lock(&self.offline) = offline;
    }

    fn record(&self, call: CatalogCall) {
        lock(&self.calls).push(call);
    }

    fn check(&self, id: Option<&ItemId>) -> Result<(), RemoteError> {
        let blocked = *lock(&self.offline)
            || id.is_some_and(|id| lock(&self.failing).contains(id));
        if blocked {
            return Err(RemoteError::Transport {
                url: format!("memory://orchids/{}", id.map(ItemId::as_str).unwrap_or("")),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(id: &ItemId) -> RemoteError {
        RemoteError::NotFound {
            url: format!("memory://orchids/{id}"),
        }
    }

    fn next_id(items: &BTreeMap<ItemId, Item>) -> ItemId {
        let max = items
            .keys()
            .filter_map(|id| id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        ItemId::from((max + 1).to_string())
    }
}

impl CatalogApi for MemoryCatalog {
    fn fetch_all(&self) -> Result<Vec<Item>, RemoteError> {
        self.record(CatalogCall::FetchAll);
        self.check(None)?;
        Ok(lock(&self.items).values().cloned().collect())
    }

    fn fetch_one(&self, id: &ItemId) -> Result<Item, RemoteError> {
        self.record(CatalogCall::FetchOne(id.clone()));
        self.check(Some(id))?;
        self.item(id).ok_or_else(|| Self::not_found(id))
    }

    fn create(&self, item: &NewItem) -> Result<Item, RemoteError> {
        self.record(CatalogCall::Create(item.clone()));
        self.check(None)?;
        let mut items = lock(&self.items);
        let id = Self::next_id(&items);
        let created = Item {
            id: id.clone(),
            name: item.name.clone(),
            weight: item.weight,
            rating: item.rating,
            price: item.price,
            image: item.image.clone(),
            color: item.color.clone(),
            bonus: item.bonus.clone(),
            origin: item.origin.clone(),
            category: item.category.clone(),
            is_top_of_the_week: item.is_top_of_the_week,
            status: item.status,
            description: None,
        };
        items.insert(id, created.clone());
        Ok(created)
    }

    fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<Item, RemoteError> {
        self.record(CatalogCall::Update(id.clone(), patch.clone()));
        self.check(Some(id))?;
        let mut items = lock(&self.items);
        let item = items.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        patch.apply_to(item);
        Ok(item.clone())
    }

    fn delete(&self, id: &ItemId) -> Result<Item, RemoteError> {
        self.record(CatalogCall::Delete(id.clone()));
        self.check(Some(id))?;
        lock(&self.items)
            .remove(id)
            .ok_or_else(|| Self::not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Identity provider
// ---------------------------------------------------------------------------

/// Identity provider holding accounts in memory.
///
/// Error messages mirror the REST provider's codes.
#[derive(Debug, Default)]
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, (String, String)>>,
    calls: Mutex<usize>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(email: &str, password: &str) -> Self {
        let auth = Self::new();
        auth.add_account(email, password);
        auth
    }

    /// Register an account directly; returns its uid.
    pub fn add_account(&self, email: &str, password: &str) -> String {
        let mut accounts = lock(&self.accounts);
        let uid = format!("uid-{}", accounts.len() + 1);
        accounts.insert(email.to_string(), (password.to_string(), uid.clone()));
        uid
    }

    /// Number of sign-in/sign-up calls received.
    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }

    fn session(email: &str, uid: &str) -> Session {
        Session {
            token: format!("token-{uid}"),
            user: User {
                uid: uid.to_string(),
                email: email.to_string(),
                refresh_token: Some(format!("refresh-{uid}")),
                expires_in: Some("3600".to_string()),
                signed_in_at: Some(Utc::now()),
            },
        }
    }
}

impl AuthGateway for MemoryAuth {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        *lock(&self.calls) += 1;
        let accounts = lock(&self.accounts);
        match accounts.get(email) {
            None => Err(RemoteError::Auth("EMAIL_NOT_FOUND".to_string())),
            Some((stored, _)) if stored != password => {
                Err(RemoteError::Auth("INVALID_PASSWORD".to_string()))
            }
            Some((_, uid)) => Ok(Self::session(email, uid)),
        }
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        *lock(&self.calls) += 1;
        if lock(&self.accounts).contains_key(email) {
            return Err(RemoteError::Auth("EMAIL_EXISTS".to_string()));
        }
        let uid = self.add_account(email, password);
        Ok(Self::session(email, &uid))
    }
}
