use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Route, State};
use serde::{Deserialize, Serialize};

use crate::models::{ProductResult, QueryIntent, ServiceMode, SortPreference, MAX_RESULT_LIMIT};
use crate::service::CatalogService;

/* ===== Views ===== */

#[derive(Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub mode: ServiceMode,
}

#[derive(Serialize)]
pub struct SearchView {
    pub mode: ServiceMode,
    pub intent: QueryIntent,
    pub products: Vec<ProductResult>,
    pub warning: Option<String>,
}

#[derive(Deserialize)]
pub struct DirectSearchRequest {
    pub query: String,
    #[serde(default = "default_direct_limit")]
    pub limit: usize,
}

fn default_direct_limit() -> usize {
    12
}

#[derive(Serialize)]
pub struct DirectSearchView {
    pub mode: ServiceMode,
    pub query: String,
    pub products: Vec<ProductResult>,
    pub warning: Option<String>,
}

/// Startup warning first, then whatever this call reported.
fn merge_warnings(startup: Option<&str>, call: Option<String>) -> Option<String> {
    let parts: Vec<String> = startup.map(str::to_string).into_iter().chain(call).collect();
    if parts.is_empty() { None } else { Some(parts.join(" ")) }
}

/* ===== Handlers ===== */

// GET /api/health
#[get("/health")]
pub fn health(service: &State<CatalogService>) -> Json<HealthView> {
    Json(HealthView { status: "ok", mode: service.mode() })
}

// POST /api/search
#[post("/search", format = "json", data = "<intent>")]
pub async fn search(
    intent: Json<QueryIntent>,
    service: &State<CatalogService>,
) -> Result<Json<SearchView>, (Status, String)> {
    let intent = intent.into_inner();
    intent.validate().map_err(|e| (Status::BadRequest, e.to_string()))?;

    let outcome = service.search(&intent).await;
    Ok(Json(SearchView {
        mode: service.mode(),
        intent,
        products: outcome.results,
        warning: merge_warnings(service.startup_warning(), outcome.warning),
    }))
}

// POST /api/direct-search
#[post("/direct-search", format = "json", data = "<req>")]
pub async fn direct_search(
    req: Json<DirectSearchRequest>,
    service: &State<CatalogService>,
) -> Result<Json<DirectSearchView>, (Status, String)> {
    let req = req.into_inner();
    let query = req.query.trim();
    if query.chars().count() < 2 || query.chars().count() > 250 {
        return Err((Status::BadRequest, "query must be between 2 and 250 characters".into()));
    }
    if req.limit == 0 || req.limit > MAX_RESULT_LIMIT {
        return Err((Status::BadRequest, format!("limit must be between 1 and {MAX_RESULT_LIMIT}")));
    }

    let intent = QueryIntent::new(query)
        .with_limit(req.limit)
        .in_stock_only(false)
        .sorted_by(SortPreference::Relevance);
    let outcome = service.search(&intent).await;
    Ok(Json(DirectSearchView {
        mode: service.mode(),
        query: req.query,
        products: outcome.results,
        warning: outcome.warning,
    }))
}

pub fn routes() -> Vec<Route> {
    routes![health, search, direct_search]
}
