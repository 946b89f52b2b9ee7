//! Catalog loading tests.

use triage_core::config::CatalogConfig;

fn data_dir() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../data")
}

/// The shipped data files describe exactly the builtin catalog.
#[test]
fn shipped_data_matches_builtin() {
    let loaded = CatalogConfig::load(data_dir()).unwrap();
    assert_eq!(loaded, CatalogConfig::builtin());
}

#[test]
fn missing_data_dir_is_an_error() {
    let err = CatalogConfig::load("/nonexistent/triage-data").unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "{err}");
}
