//! Seed catalog: the static product list loaded once at startup.
//!
//! Used as the fallback corpus and as the payload for seeding an empty remote index.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::{CatalogError, Result};
use crate::models::{IndexedProduct, ProductDocument};

/// A seed document with its derived text computed once.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub product: ProductDocument,
    pub spec_blob: String,
    /// Lowercased manufacturer, part number, name, description, tags and use-cases.
    pub haystack: String,
}

impl CatalogEntry {
    pub fn new(product: ProductDocument) -> Self {
        let spec_blob = product.spec_blob();
        let haystack = match_haystack(&product);
        Self { product, spec_blob, haystack }
    }

    pub fn indexed(&self) -> IndexedProduct<'_> {
        IndexedProduct { product: &self.product, spec_blob: &self.spec_blob }
    }
}

/// Text a query token must appear in to count as a match.
pub fn match_haystack(doc: &ProductDocument) -> String {
    let tags = doc.tags.join(" ");
    let use_cases = doc.use_cases.join(" ");
    [
        doc.manufacturer.as_str(),
        doc.manufacturer_part_number.as_str(),
        doc.name.as_str(),
        doc.description.as_str(),
        tags.as_str(),
        use_cases.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Immutable, cheaply clonable seed catalog.
#[derive(Debug, Clone, Default)]
pub struct SeedCatalog {
    entries: Arc<[CatalogEntry]>,
}

impl SeedCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::SeedLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let docs: Vec<ProductDocument> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::SeedParse {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_documents(docs)?;
        info!(path = %path.display(), documents = catalog.len(), "loaded seed catalog");
        Ok(catalog)
    }

    pub fn from_documents(docs: Vec<ProductDocument>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(docs.len());
        for doc in &docs {
            validate_document(doc)?;
            if !seen.insert(doc.id.as_str()) {
                return Err(CatalogError::InvalidDocument {
                    id: doc.id.clone(),
                    reason: "duplicate id".into(),
                });
            }
        }
        let entries: Vec<CatalogEntry> = docs.into_iter().map(CatalogEntry::new).collect();
        Ok(Self { entries: entries.into() })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_document(doc: &ProductDocument) -> Result<()> {
    let invalid = |reason: &str| CatalogError::InvalidDocument {
        id: doc.id.clone(),
        reason: reason.to_string(),
    };
    if doc.id.trim().is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if !doc.unit_price.is_finite() || doc.unit_price < 0.0 {
        return Err(invalid("unit_price must be a non-negative number"));
    }
    Ok(())
}
