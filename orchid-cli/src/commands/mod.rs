pub mod account;
pub mod catalog;
pub mod favorite;
pub mod reconcile;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use orchid_core::{config, Config, Session};
use orchid_remote::{HttpCatalog, IdentityToolkitGateway};
use orchid_store::FileStore;

/// Resolved per-invocation state shared by every command.
pub struct App {
    pub config: Config,
    pub store: FileStore,
}

impl App {
    pub fn open(catalog_url: Option<String>) -> Result<Self> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
        let mut config = config::load_at(&home).with_context(|| {
            format!(
                "failed to load {}",
                config::config_path_at(&home).display()
            )
        })?;
        if let Some(url) = catalog_url {
            config.catalog_url = url;
        }
        tracing::debug!(catalog_url = %config.catalog_url, "configuration loaded");

        let store = FileStore::at_home(&home);
        Ok(Self { config, store })
    }

    pub fn catalog(&self) -> HttpCatalog {
        HttpCatalog::from_config(&self.config)
    }

    pub fn auth(&self) -> IdentityToolkitGateway {
        IdentityToolkitGateway::from_config(&self.config)
    }

    pub fn require_session(&self) -> Result<Session> {
        Ok(orchid_sync::require_session(&self.store)?)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize JSON output")?
    );
    Ok(())
}

/// `12.0` → `12`, `4.5` → `4.5`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
