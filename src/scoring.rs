//! Scoring model shared by the remote and fallback search paths.

use std::collections::BTreeSet;

use crate::catalog::match_haystack;
use crate::models::ProductDocument;

const STOP_WORDS: &[&str] = &[
    "find", "need", "with", "that", "this", "for", "the", "and", "top", "best", "under",
    "cheapest", "in", "stock", "in-stock",
];

const TRIM_CHARS: &[char] = &[',', '.', '?', '!'];

const RELEVANCE_WEIGHT: f64 = 0.78;
const COVERAGE_WEIGHT: f64 = 0.15;
const STOCK_WEIGHT: f64 = 0.05;
const PRICE_WEIGHT: f64 = 0.02;
const STOCK_SATURATION: f64 = 10_000.0;
const MIN_TOP_RELEVANCE: f64 = 0.0001;

/// Significant query tokens: lowercased, punctuation-trimmed, longer than two
/// characters and not a stop word. Duplicates collapse.
pub fn significant_tokens(query: &str) -> BTreeSet<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(TRIM_CHARS))
        .filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Number of tokens present as substrings of `haystack`.
pub fn matched_tokens(tokens: &BTreeSet<String>, haystack: &str) -> usize {
    tokens.iter().filter(|token| haystack.contains(token.as_str())).count()
}

/// Fraction of tokens found in `haystack`; 0.0 when there are no tokens.
pub fn coverage_of(tokens: &BTreeSet<String>, haystack: &str) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    matched_tokens(tokens, haystack) as f64 / tokens.len() as f64
}

pub fn keyword_coverage(query: &str, doc: &ProductDocument) -> f64 {
    coverage_of(&significant_tokens(query), &match_haystack(doc))
}

/// Composite score in roughly `[0, 1]`, rounded to four decimals.
pub fn recommendation_score(
    raw_relevance: f64,
    top_relevance: f64,
    doc: &ProductDocument,
    coverage: f64,
) -> f64 {
    let relevance = raw_relevance / top_relevance.max(MIN_TOP_RELEVANCE);
    let stock = (f64::from(doc.quantity_available) / STOCK_SATURATION).min(1.0);
    let price = 1.0 / (1.0 + doc.unit_price.max(0.0));
    let score = RELEVANCE_WEIGHT * relevance
        + COVERAGE_WEIGHT * coverage
        + STOCK_WEIGHT * stock
        + PRICE_WEIGHT * price;
    round4(score)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn build_reason(doc: &ProductDocument, score: f64, coverage: f64) -> String {
    format!(
        "Score {score:.2} with keyword coverage {coverage:.2}, stock ({} pcs), and price (${:.2}).",
        doc.quantity_available, doc.unit_price
    )
}
