//! Local matcher over the seed catalog. Strict substring presence, no fuzziness
//! and no field weighting, so results are fully reproducible.

use crate::catalog::{CatalogEntry, SeedCatalog};
use crate::models::{ProductResult, QueryIntent};
use crate::scoring::{build_reason, coverage_of, matched_tokens, recommendation_score, significant_tokens};

#[derive(Debug, Clone)]
pub struct FallbackSearch {
    catalog: SeedCatalog,
}

fn passes_constraints(entry: &CatalogEntry, intent: &QueryIntent) -> bool {
    let doc = &entry.product;
    if intent.in_stock_only && doc.quantity_available == 0 {
        return false;
    }
    if intent.min_quantity.is_some_and(|min| doc.quantity_available < min) {
        return false;
    }
    if intent.max_unit_price.is_some_and(|max| doc.unit_price > max) {
        return false;
    }
    true
}

impl FallbackSearch {
    pub fn new(catalog: SeedCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SeedCatalog {
        &self.catalog
    }

    pub fn search(&self, intent: &QueryIntent) -> Vec<ProductResult> {
        let tokens = significant_tokens(&intent.keywords);

        let mut results: Vec<ProductResult> = self.catalog
            .entries()
            .iter()
            .filter(|entry| tokens.is_empty() || matched_tokens(&tokens, &entry.haystack) > 0)
            .filter(|entry| passes_constraints(entry, intent))
            .map(|entry| {
                let doc = &entry.product;
                let coverage = coverage_of(&tokens, &entry.haystack);
                let score = recommendation_score(1.0, 1.0, doc, coverage);
                ProductResult::from_document(doc, score, build_reason(doc, score, coverage))
            })
            .collect();

        results.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
        results.truncate(intent.limit);
        results
    }
}
