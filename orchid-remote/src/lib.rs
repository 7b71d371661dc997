//! # orchid-remote
//!
//! Clients for the two remote collaborators: the catalog REST service
//! ([`CatalogApi`], [`HttpCatalog`]) and the identity provider
//! ([`AuthGateway`], [`IdentityToolkitGateway`]). Every HTTP call carries a
//! timeout and a bounded [`RetryPolicy`]. [`MemoryCatalog`] and
//! [`MemoryAuth`] are in-process fakes that record their calls.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod memory;
pub mod retry;

pub use auth::{AuthGateway, IdentityToolkitGateway};
pub use catalog::{CatalogApi, HttpCatalog};
pub use error::RemoteError;
pub use memory::{CatalogCall, MemoryAuth, MemoryCatalog};
pub use retry::RetryPolicy;
