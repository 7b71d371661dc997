//! Orchid core library: domain types, client configuration and form validation.
//!
//! - [`types`]: catalog items, favorite records, sessions
//! - [`config`]: `~/.orchid/config.yaml` loading
//! - [`validation`]: create/edit/login/register form rules
//! - [`error`]: [`ConfigError`], [`ValidationError`]

pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use config::Config;
pub use error::{ConfigError, FieldError, ValidationError};
pub use types::{
    FavoriteRecord, FavoriteSnapshot, Item, ItemId, ItemPatch, NewItem, Session, User,
    FAVORITE_KEY_PREFIX,
};
pub use validation::{CreateForm, EditForm, LoginForm, RegisterForm};
