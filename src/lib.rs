//! Product catalog search: a remote full-text engine with a deterministic local
//! fallback, ranked through one shared scoring model.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod routes;
pub mod scoring;
pub mod search;
pub mod service;

pub use catalog::SeedCatalog;
pub use config::{AppConfig, SearchSettings};
pub use error::CatalogError;
pub use models::{ProductDocument, ProductResult, QueryIntent, SearchOutcome, ServiceMode, SortPreference};
pub use service::CatalogService;

/// Installs the `tracing` subscriber used by both binaries.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
