//! Config loading from a real home directory.

use assert_fs::prelude::*;
use orchid_core::{config, ConfigError};

#[test]
fn config_file_overrides_defaults() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".orchid/config.yaml")
        .write_str("catalog_url: http://catalog.test/api/\napi_key: web-key\nretry_backoff_ms: 50\n")
        .expect("write config");

    let cfg = config::load_at(home.path()).expect("load");
    assert_eq!(cfg.catalog_url, "http://catalog.test/api/");
    assert_eq!(cfg.api_key.as_deref(), Some("web-key"));
    assert_eq!(cfg.retry_backoff().as_millis(), 50);
    assert_eq!(cfg.max_retries, 2);
}

#[test]
fn empty_catalog_url_is_rejected() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".orchid/config.yaml")
        .write_str("catalog_url: \"  \"\n")
        .expect("write config");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(
        matches!(err, ConfigError::Invalid { field: "catalog_url", .. }),
        "got: {err}"
    );
}
