use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{IndexedProduct, ProductDocument};

pub mod connect;
pub mod fallback;
pub mod lifecycle;
pub mod opensearch_engine;
pub mod query;
pub mod remote;

pub use connect::{connect_with_retry, Connection};
pub use fallback::FallbackSearch;
pub use lifecycle::{IndexManager, IndexStatus, SeedOutcome};
pub use opensearch_engine::OpenSearchBackend;
pub use remote::RemoteSearch;

/// One remote hit, already decoded into the shared document shape.
#[derive(Debug, Clone)]
pub struct RemoteHit {
    pub score: Option<f64>,
    pub product: ProductDocument,
}

/// Client-side view of the remote full-text engine.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Lightweight reachability probe.
    async fn ping(&self) -> Result<()>;
    async fn index_exists(&self, index: &str) -> Result<bool>;
    /// Returns `false` when another client created the index first.
    async fn create_index(&self, index: &str, body: &Value) -> Result<bool>;
    async fn delete_index(&self, index: &str) -> Result<()>;
    async fn count(&self, index: &str) -> Result<u64>;
    /// Writes every document keyed by its id. Any per-item failure is an error.
    async fn bulk_index(&self, index: &str, docs: &[IndexedProduct<'_>]) -> Result<usize>;
    async fn refresh(&self, index: &str) -> Result<()>;
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<RemoteHit>>;
}
