use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::models::{ProductResult, QueryIntent};
use crate::scoring::{build_reason, keyword_coverage, recommendation_score};
use super::query::build_search_body;
use super::{RemoteHit, SearchBackend};

/// Remote search path: engine retrieval, then composite re-ranking.
#[derive(Clone)]
pub struct RemoteSearch {
    backend: Arc<dyn SearchBackend>,
    index: String,
}

impl RemoteSearch {
    pub fn new(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self { backend, index: index.into() }
    }

    pub async fn search(&self, intent: &QueryIntent) -> Result<Vec<ProductResult>> {
        let body = build_search_body(intent);
        let hits = self.backend.search(&self.index, &body).await?;
        debug!(hits = hits.len(), "remote search returned");
        Ok(rank_hits(&intent.keywords, hits))
    }
}

/// Normalizes engine scores against the best hit and orders by composite score.
pub fn rank_hits(keywords: &str, hits: Vec<RemoteHit>) -> Vec<ProductResult> {
    if hits.is_empty() {
        return Vec::new();
    }
    let top = hits
        .iter()
        .map(|h| h.score.unwrap_or(1.0))
        .fold(f64::NEG_INFINITY, f64::max);

    let mut results: Vec<ProductResult> = hits
        .iter()
        .map(|hit| {
            let doc = &hit.product;
            let coverage = keyword_coverage(keywords, doc);
            let score = recommendation_score(hit.score.unwrap_or(0.0), top, doc, coverage);
            ProductResult::from_document(doc, score, build_reason(doc, score, coverage))
        })
        .collect();

    results.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
    results
}
