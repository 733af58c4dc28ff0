//! Top-level dispatch between the remote engine and the local fallback.
//!
//! The mode is decided once by [`CatalogService::initialize`]. After that the
//! service is read-only and can be shared across concurrent requests.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::SeedCatalog;
use crate::config::SearchSettings;
use crate::error::{CatalogError, Result};
use crate::models::{QueryIntent, SearchOutcome, ServiceMode};
use crate::search::{
    connect_with_retry, Connection, FallbackSearch, IndexManager, OpenSearchBackend, RemoteSearch,
    SearchBackend,
};

pub const FALLBACK_MODE_WARNING: &str =
    "Results are from fallback data, not the remote search engine.";
pub const UNREACHABLE_WARNING: &str =
    "Remote search engine is unavailable; using local fallback catalog.";
pub const NOT_CONFIGURED_WARNING: &str =
    "SEARCH_URL is not configured; using local fallback catalog.";

pub struct CatalogService {
    mode: ServiceMode,
    settings: SearchSettings,
    fallback: FallbackSearch,
    remote: Option<RemoteSearch>,
    startup_warning: Option<String>,
}

impl CatalogService {
    pub fn new(catalog: SeedCatalog, settings: SearchSettings) -> Self {
        Self {
            mode: ServiceMode::Uninitialized,
            settings,
            fallback: FallbackSearch::new(catalog),
            remote: None,
            startup_warning: None,
        }
    }

    pub fn mode(&self) -> ServiceMode {
        self.mode
    }

    pub fn startup_warning(&self) -> Option<&str> {
        self.startup_warning.as_deref()
    }

    /// Connects to the configured OpenSearch/Elasticsearch endpoint, provisions the
    /// index and picks the mode. Returns a warning when running in fallback mode.
    pub async fn initialize(&mut self) -> Result<Option<String>> {
        let Some(url) = self.settings.url.clone() else {
            self.ensure_uninitialized()?;
            return Ok(self.enter_fallback(NOT_CONFIGURED_WARNING));
        };
        let settings = self.settings.clone();
        self.initialize_with(move || {
            let backend = OpenSearchBackend::new(&url, &settings);
            async move { backend }
        })
        .await
    }

    /// Same as [`initialize`](Self::initialize) with a caller-supplied client factory.
    pub async fn initialize_with<B, F, Fut>(&mut self, connect: F) -> Result<Option<String>>
    where
        B: SearchBackend + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<B>>,
    {
        self.ensure_uninitialized()?;

        let backend: Arc<dyn SearchBackend> =
            match connect_with_retry(self.settings.connect_policy(), connect).await {
                Connection::Live(backend) => Arc::new(backend),
                Connection::Unavailable { .. } => return Ok(self.enter_fallback(UNREACHABLE_WARNING)),
            };

        let index = self.settings.index.clone();
        let manager = IndexManager::new(backend.as_ref(), &index);
        manager.ensure_index().await?;
        manager.seed_if_empty(self.fallback.catalog()).await?;

        self.remote = Some(RemoteSearch::new(backend, index));
        self.mode = ServiceMode::Remote;
        info!(mode = %self.mode, index = %self.settings.index, "catalog service ready");
        Ok(None)
    }

    fn ensure_uninitialized(&self) -> Result<()> {
        match self.mode {
            ServiceMode::Uninitialized => Ok(()),
            _ => Err(CatalogError::AlreadyInitialized),
        }
    }

    fn enter_fallback(&mut self, warning: &str) -> Option<String> {
        self.mode = ServiceMode::Fallback;
        self.startup_warning = Some(warning.to_string());
        info!(mode = %self.mode, "catalog service ready");
        self.startup_warning.clone()
    }

    /// Never fails: degraded operation is reported through `warning`.
    pub async fn search(&self, intent: &QueryIntent) -> SearchOutcome {
        if let Err(err) = intent.validate() {
            return SearchOutcome { results: Vec::new(), warning: Some(err.to_string()) };
        }

        let Some(remote) = self.remote.as_ref().filter(|_| self.mode == ServiceMode::Remote) else {
            return SearchOutcome {
                results: self.fallback.search(intent),
                warning: Some(FALLBACK_MODE_WARNING.to_string()),
            };
        };

        let failure = match tokio::time::timeout(self.settings.request_timeout, remote.search(intent)).await {
            Ok(Ok(results)) => return SearchOutcome { results, warning: None },
            Ok(Err(err)) => format!("{err:#}"),
            Err(_) => format!("timed out after {:?}", self.settings.request_timeout),
        };

        warn!(error = %failure, keywords = %intent.keywords, "remote search failed, serving fallback results");
        SearchOutcome {
            results: self.fallback.search(intent),
            warning: Some(format!("Remote search failed ({failure}); using fallback data.")),
        }
    }
}
