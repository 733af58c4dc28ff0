//! Query DSL for the remote engine.

use serde_json::{json, Value};

use crate::models::{QueryIntent, SortPreference};

/// Name weighted highest, spec blob lowest.
pub const WEIGHTED_FIELDS: &[&str] = &[
    "name^4",
    "description^3",
    "category^2",
    "manufacturer^2",
    "tags^2",
    "use_cases^2",
    "spec_blob",
];

pub fn filter_clauses(intent: &QueryIntent) -> Vec<Value> {
    let mut filters = Vec::new();
    if intent.in_stock_only {
        filters.push(json!({ "range": { "quantity_available": { "gt": 0 } } }));
    }
    if let Some(min) = intent.min_quantity {
        filters.push(json!({ "range": { "quantity_available": { "gte": min } } }));
    }
    if let Some(max) = intent.max_unit_price {
        filters.push(json!({ "range": { "unit_price": { "lte": max } } }));
    }
    filters
}

pub fn sort_clause(pref: SortPreference) -> Value {
    match pref {
        SortPreference::Relevance => json!(["_score"]),
        SortPreference::PriceLow => json!([{ "unit_price": "asc" }, "_score"]),
        SortPreference::StockHigh => json!([{ "quantity_available": "desc" }, "_score"]),
    }
}

/// Full search body. `size` is the intent's limit, passed through as is.
pub fn build_search_body(intent: &QueryIntent) -> Value {
    json!({
        "query": {
            "bool": {
                "must": [{
                    "multi_match": {
                        "query": intent.keywords,
                        "fields": WEIGHTED_FIELDS,
                        "fuzziness": "AUTO"
                    }
                }],
                "filter": filter_clauses(intent)
            }
        },
        "size": intent.limit,
        "sort": sort_clause(intent.sort_preference),
        "track_scores": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevance_query_without_filters() {
        let body = build_search_body(&QueryIntent::new("op amp").in_stock_only(false).with_limit(3));
        assert_eq!(body["size"], 3);
        assert_eq!(body["sort"], json!(["_score"]));
        assert_eq!(body["query"]["bool"]["filter"], json!([]));
        let mm = &body["query"]["bool"]["must"][0]["multi_match"];
        assert_eq!(mm["query"], "op amp");
        assert_eq!(mm["fuzziness"], "AUTO");
        assert_eq!(mm["fields"][0], "name^4");
        assert_eq!(mm["fields"][6], "spec_blob");
    }

    #[test]
    fn every_constraint_becomes_a_filter() {
        let intent = QueryIntent::new("usb cable")
            .with_min_quantity(100)
            .with_max_unit_price(4.5)
            .sorted_by(SortPreference::PriceLow);
        let body = build_search_body(&intent);
        assert_eq!(
            body["query"]["bool"]["filter"],
            json!([
                { "range": { "quantity_available": { "gt": 0 } } },
                { "range": { "quantity_available": { "gte": 100 } } },
                { "range": { "unit_price": { "lte": 4.5 } } }
            ])
        );
        assert_eq!(body["sort"], json!([{ "unit_price": "asc" }, "_score"]));
    }

    #[test]
    fn stock_high_sorts_quantity_descending() {
        assert_eq!(
            sort_clause(SortPreference::StockHigh),
            json!([{ "quantity_available": "desc" }, "_score"])
        );
    }
}
