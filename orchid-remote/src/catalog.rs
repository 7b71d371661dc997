//! Remote catalog service client.
//!
//! ```text
//! GET    /orchids        → [Item]
//! GET    /orchids/{id}   → Item
//! POST   /orchids        → Item      (body: NewItem)
//! PUT    /orchids/{id}   → Item      (body: ItemPatch)
//! DELETE /orchids/{id}   → Item
//! ```

use serde::de::DeserializeOwned;

use orchid_core::{Config, Item, ItemId, ItemPatch, NewItem};

use crate::error::RemoteError;
use crate::retry::RetryPolicy;

/// The catalog API of record.
pub trait CatalogApi {
    fn fetch_all(&self) -> Result<Vec<Item>, RemoteError>;

    fn fetch_one(&self, id: &ItemId) -> Result<Item, RemoteError>;

    /// Create an item; the service assigns its id.
    fn create(&self, item: &NewItem) -> Result<Item, RemoteError>;

    fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<Item, RemoteError>;

    /// Delete an item, returning the deleted record.
    fn delete(&self, id: &ItemId) -> Result<Item, RemoteError>;
}

/// HTTP/JSON implementation over `ureq`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    agent: ureq::Agent,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpCatalog {
    pub fn new(base_url: &str, agent: ureq::Agent, retry: RetryPolicy) -> Self {
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    /// Client with the timeout and retry policy from `config`.
    pub fn from_config(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self::new(&config.catalog_url, agent, RetryPolicy::from_config(config))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/orchids", self.base_url)
    }

    fn item_url(&self, id: &ItemId) -> String {
        format!("{}/orchids/{}", self.base_url, id)
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, RemoteError> {
        tracing::debug!(method, url, "catalog request");
        let response = self.retry.run(url, || {
            let request = self
                .agent
                .request(method, url)
                .set("Accept", "application/json");
            match body {
                Some(body) => request.send_json(body),
                None => request.call(),
            }
        })?;
        response.into_json::<T>().map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

fn to_body<T: serde::Serialize>(url: &str, value: &T) -> Result<serde_json::Value, RemoteError> {
    serde_json::to_value(value).map_err(|e| RemoteError::Decode {
        url: url.to_string(),
        source: e.into(),
    })
}

impl CatalogApi for HttpCatalog {
    fn fetch_all(&self) -> Result<Vec<Item>, RemoteError> {
        self.send("GET", &self.collection_url(), None)
    }

    fn fetch_one(&self, id: &ItemId) -> Result<Item, RemoteError> {
        self.send("GET", &self.item_url(id), None)
    }

    fn create(&self, item: &NewItem) -> Result<Item, RemoteError> {
        let url = self.collection_url();
        let body = to_body(&url, item)?;
        let created: Item = self.send("POST", &url, Some(&body))?;
        tracing::info!(id = %created.id, "item created");
        Ok(created)
    }

    fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<Item, RemoteError> {
        let url = self.item_url(id);
        let body = to_body(&url, patch)?;
        self.send("PUT", &url, Some(&body))
    }

    fn delete(&self, id: &ItemId) -> Result<Item, RemoteError> {
        self.send("DELETE", &self.item_url(id), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_strip_trailing_slash() {
        let catalog = HttpCatalog::new(
            "http://localhost:1/api/",
            ureq::agent(),
            RetryPolicy::none(),
        );
        assert_eq!(catalog.base_url(), "http://localhost:1/api");
        assert_eq!(catalog.collection_url(), "http://localhost:1/api/orchids");
        assert_eq!(
            catalog.item_url(&ItemId::from("7")),
            "http://localhost:1/api/orchids/7"
        );
    }
}
