use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const MAX_RESULT_LIMIT: usize = 20;
pub const DEFAULT_RESULT_LIMIT: usize = 8;

/// Ordering hint for the remote engine. Final presentation order is always by
/// recommendation score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPreference {
    #[default]
    Relevance,
    PriceLow,
    StockHigh,
}

/// Structured query produced upstream by the intent extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub keywords: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_in_stock_only")]
    pub in_stock_only: bool,
    #[serde(default)]
    pub min_quantity: Option<u32>,
    #[serde(default)]
    pub max_unit_price: Option<f64>,
    #[serde(default)]
    pub sort_preference: SortPreference,
}

fn default_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}

fn default_in_stock_only() -> bool {
    true
}

impl QueryIntent {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            limit: DEFAULT_RESULT_LIMIT,
            in_stock_only: true,
            min_quantity: None,
            max_unit_price: None,
            sort_preference: SortPreference::Relevance,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn in_stock_only(mut self, flag: bool) -> Self {
        self.in_stock_only = flag;
        self
    }

    pub fn with_min_quantity(mut self, qty: u32) -> Self {
        self.min_quantity = Some(qty);
        self
    }

    pub fn with_max_unit_price(mut self, price: f64) -> Self {
        self.max_unit_price = Some(price);
        self
    }

    pub fn sorted_by(mut self, pref: SortPreference) -> Self {
        self.sort_preference = pref;
        self
    }

    /// Rejects intents the search engines cannot honor.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.keywords.trim().is_empty() {
            return Err(CatalogError::InvalidIntent("keywords must not be empty".into()));
        }
        if self.limit == 0 || self.limit > MAX_RESULT_LIMIT {
            return Err(CatalogError::InvalidIntent(format!(
                "limit must be between 1 and {MAX_RESULT_LIMIT}, got {}",
                self.limit
            )));
        }
        if let Some(price) = self.max_unit_price {
            if !price.is_finite() || price <= 0.0 {
                return Err(CatalogError::InvalidIntent(format!(
                    "max_unit_price must be positive, got {price}"
                )));
            }
        }
        Ok(())
    }
}

/// One catalog record as produced by the offline generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    pub id: String,
    pub manufacturer: String,
    pub manufacturer_part_number: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity_available: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub key_specs: BTreeMap<String, String>,
    pub product_url: String,
    pub datasheet_url: String,
}

impl ProductDocument {
    pub fn spec_blob(&self) -> String {
        spec_blob(&self.key_specs)
    }
}

/// Flattens a specification map into free text: `"key value key value ..."`.
/// Keys come out in sorted order; matching is token-based so order is irrelevant.
pub fn spec_blob(specs: &BTreeMap<String, String>) -> String {
    specs
        .iter()
        .map(|(key, value)| format!("{key} {value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Document shape written to the remote index.
#[derive(Debug, Serialize)]
pub struct IndexedProduct<'a> {
    #[serde(flatten)]
    pub product: &'a ProductDocument,
    pub spec_blob: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResult {
    pub id: String,
    pub manufacturer: String,
    pub manufacturer_part_number: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity_available: u32,
    pub tags: Vec<String>,
    pub use_cases: Vec<String>,
    pub product_url: String,
    pub datasheet_url: String,
    pub recommendation_score: f64,
    pub fit_reason: String,
}

impl ProductResult {
    pub fn from_document(doc: &ProductDocument, recommendation_score: f64, fit_reason: String) -> Self {
        Self {
            id: doc.id.clone(),
            manufacturer: doc.manufacturer.clone(),
            manufacturer_part_number: doc.manufacturer_part_number.clone(),
            name: doc.name.clone(),
            description: doc.description.clone(),
            category: doc.category.clone(),
            unit_price: doc.unit_price,
            quantity_available: doc.quantity_available,
            tags: doc.tags.clone(),
            use_cases: doc.use_cases.clone(),
            product_url: doc.product_url.clone(),
            datasheet_url: doc.datasheet_url.clone(),
            recommendation_score,
            fit_reason,
        }
    }
}

/// Startup-determined operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceMode {
    Uninitialized,
    Fallback,
    Remote,
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceMode::Uninitialized => "uninitialized",
            ServiceMode::Fallback => "fallback",
            ServiceMode::Remote => "remote",
        };
        f.write_str(s)
    }
}

/// Ranked results plus an advisory warning when running degraded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<ProductResult>,
    pub warning: Option<String>,
}
