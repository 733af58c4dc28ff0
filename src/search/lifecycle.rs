use serde_json::{json, Value};
use tracing::info;

use crate::catalog::SeedCatalog;
use crate::error::{CatalogError, Result};
use crate::models::IndexedProduct;
use super::SearchBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Created,
    Existing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(usize),
    AlreadyPopulated(u64),
}

/// Field mapping for the product index.
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "manufacturer": { "type": "text", "fields": { "keyword": { "type": "keyword" } } },
                "manufacturer_part_number": { "type": "keyword" },
                "name": { "type": "text" },
                "description": { "type": "text" },
                "category": { "type": "text", "fields": { "keyword": { "type": "keyword" } } },
                "unit_price": { "type": "float" },
                "quantity_available": { "type": "integer" },
                "tags": { "type": "text" },
                "use_cases": { "type": "text" },
                "spec_blob": { "type": "text" },
                "product_url": { "type": "keyword", "index": false },
                "datasheet_url": { "type": "keyword", "index": false }
            }
        }
    })
}

/// Provisions one index. Failures are not retried here.
pub struct IndexManager<'a> {
    backend: &'a dyn SearchBackend,
    index: &'a str,
}

impl<'a> IndexManager<'a> {
    pub fn new(backend: &'a dyn SearchBackend, index: &'a str) -> Self {
        Self { backend, index }
    }

    fn fail(&self, stage: &'static str) -> impl FnOnce(anyhow::Error) -> CatalogError + '_ {
        move |source| CatalogError::Provisioning { index: self.index.to_string(), stage, source }
    }

    pub async fn ensure_index(&self) -> Result<IndexStatus> {
        let exists = self.backend
            .index_exists(self.index)
            .await
            .map_err(self.fail("existence check"))?;
        if exists {
            return Ok(IndexStatus::Existing);
        }
        let created = self.backend
            .create_index(self.index, &index_mapping())
            .await
            .map_err(self.fail("create"))?;
        if !created {
            info!(index = self.index, "search index created concurrently, using it");
            return Ok(IndexStatus::Existing);
        }
        info!(index = self.index, "created search index");
        Ok(IndexStatus::Created)
    }

    pub async fn seed_if_empty(&self, catalog: &SeedCatalog) -> Result<SeedOutcome> {
        let existing = self.backend
            .count(self.index)
            .await
            .map_err(self.fail("count"))?;
        if existing > 0 {
            info!(index = self.index, existing, "index already populated, skipping seed");
            return Ok(SeedOutcome::AlreadyPopulated(existing));
        }

        let docs: Vec<IndexedProduct<'_>> = catalog.entries().iter().map(|e| e.indexed()).collect();
        let written = self.backend
            .bulk_index(self.index, &docs)
            .await
            .map_err(self.fail("bulk seed"))?;
        info!(index = self.index, written, "seeded search index");
        Ok(SeedOutcome::Seeded(written))
    }

    /// Drops the index if present. Used by the seeder's recreate mode.
    pub async fn drop_if_exists(&self) -> Result<bool> {
        let exists = self.backend
            .index_exists(self.index)
            .await
            .map_err(self.fail("existence check"))?;
        if exists {
            self.backend.delete_index(self.index).await.map_err(self.fail("delete"))?;
            info!(index = self.index, "deleted search index");
        }
        Ok(exists)
    }

    pub async fn refresh(&self) -> Result<()> {
        self.backend.refresh(self.index).await.map_err(self.fail("refresh"))
    }

    pub async fn document_count(&self) -> Result<u64> {
        self.backend.count(self.index).await.map_err(self.fail("count"))
    }
}
