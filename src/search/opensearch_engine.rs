use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use opensearch::auth::Credentials;
use opensearch::http::response::Response;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::http::Url;
use opensearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesRefreshParts,
};
use opensearch::{BulkOperation, BulkParts, CountParts, OpenSearch, SearchParts};
use serde::Deserialize;
use serde_json::Value;

use crate::config::SearchSettings;
use crate::models::{IndexedProduct, ProductDocument};
use super::{RemoteHit, SearchBackend};

pub struct OpenSearchBackend {
    client: OpenSearch,
}

impl OpenSearchBackend {
    /// Builds a client; no network traffic happens until the first call.
    pub fn new(url: &str, settings: &SearchSettings) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("invalid search url {url}"))?;
        let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(settings.request_timeout);
        if let Some((user, password)) = settings.basic_auth() {
            builder = builder.auth(Credentials::Basic(user.to_string(), password.to_string()));
        }
        let transport = builder.build()?;
        Ok(Self { client: OpenSearch::new(transport) })
    }
}

async fn expect_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(anyhow!("{what} returned {status}: {body}"))
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: ProductDocument,
}

impl SearchResponse {
    fn into_hits(self) -> Vec<RemoteHit> {
        self.hits
            .hits
            .into_iter()
            .map(|h| RemoteHit { score: h.score, product: h.source })
            .collect()
    }
}

/// A concurrent create by another process surfaces as a 400 with this error type.
fn index_already_exists(status: u16, body: &str) -> bool {
    status == 400 && body.contains("resource_already_exists_exception")
}

/// Scans a bulk response for per-item failures.
fn bulk_failure(index: &str, body: &Value, total: usize) -> Option<anyhow::Error> {
    if !body["errors"].as_bool().unwrap_or(false) {
        return None;
    }
    let items = body["items"].as_array().map(Vec::as_slice).unwrap_or_default();
    let failed: Vec<&Value> = items
        .iter()
        .filter_map(|item| item["index"].get("error"))
        .collect();
    let first = failed.first().map(|e| e.to_string()).unwrap_or_default();
    Some(anyhow!(
        "bulk insert into {index}: {} of {total} documents failed; first error: {first}",
        failed.len()
    ))
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn ping(&self) -> Result<()> {
        let res = self.client.ping().send().await?;
        expect_success(res, "ping").await?;
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let res = self.client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await?;
        match res.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            other => bail!("index exists check for {index} returned {other}"),
        }
    }

    async fn create_index(&self, index: &str, body: &Value) -> Result<bool> {
        let res = self.client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body.clone())
            .send()
            .await?;
        let status = res.status_code();
        if status.is_success() {
            return Ok(true);
        }
        let text = res.text().await.unwrap_or_default();
        if index_already_exists(status.as_u16(), &text) {
            return Ok(false);
        }
        bail!("create index returned {status}: {text}")
    }

    async fn delete_index(&self, index: &str) -> Result<()> {
        let res = self.client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await?;
        expect_success(res, "delete index").await?;
        Ok(())
    }

    async fn count(&self, index: &str) -> Result<u64> {
        let res = self.client.count(CountParts::Index(&[index])).send().await?;
        let res = expect_success(res, "count").await?;
        let body: CountResponse = res.json().await?;
        Ok(body.count)
    }

    async fn bulk_index(&self, index: &str, docs: &[IndexedProduct<'_>]) -> Result<usize> {
        if docs.is_empty() {
            return Ok(0);
        }
        let mut ops: Vec<BulkOperation<Value>> = Vec::with_capacity(docs.len());
        for doc in docs {
            let source = serde_json::to_value(doc)?;
            ops.push(BulkOperation::index(source).id(doc.product.id.as_str()).into());
        }

        let res = self.client
            .bulk(BulkParts::Index(index))
            .body(ops)
            .send()
            .await?;
        let res = expect_success(res, "bulk").await?;
        let body: Value = res.json().await?;
        match bulk_failure(index, &body, docs.len()) {
            Some(err) => Err(err),
            None => Ok(docs.len()),
        }
    }

    async fn refresh(&self, index: &str) -> Result<()> {
        let res = self.client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await?;
        expect_success(res, "refresh").await?;
        Ok(())
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Vec<RemoteHit>> {
        let res = self.client
            .search(SearchParts::Index(&[index]))
            .body(body.clone())
            .send()
            .await?;
        let res = expect_success(res, "search").await?;
        let parsed: SearchResponse = res.json().await?;
        Ok(parsed.into_hits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_bulk_failure_is_reported() {
        let body = json!({
            "took": 4,
            "errors": true,
            "items": [
                { "index": { "_id": "rpi-featured-001", "status": 201, "result": "created" } },
                { "index": { "_id": "mock-01-0002", "status": 400, "error": {
                    "type": "mapper_parsing_exception",
                    "reason": "failed to parse field [unit_price]"
                } } }
            ]
        });
        let err = bulk_failure("catalog_products", &body, 2).unwrap().to_string();
        assert!(err.contains("1 of 2 documents failed"), "{err}");
        assert!(err.contains("mapper_parsing_exception"));
    }

    #[test]
    fn clean_bulk_response_passes() {
        let body = json!({ "errors": false, "items": [{ "index": { "status": 201 } }] });
        assert!(bulk_failure("catalog_products", &body, 1).is_none());
    }

    #[test]
    fn concurrent_create_is_recognized() {
        let body = r#"{"error":{"type":"resource_already_exists_exception","reason":"index [catalog_products/abc] already exists"},"status":400}"#;
        assert!(index_already_exists(400, body));
        assert!(!index_already_exists(400, r#"{"error":{"type":"mapper_parsing_exception"}}"#));
        assert!(!index_already_exists(500, body));
    }

    #[test]
    fn hits_decode_with_null_score_and_indexed_fields() {
        let raw = json!({
            "took": 2,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "max_score": null,
                "hits": [{
                    "_index": "catalog_products",
                    "_id": "rpi-featured-008",
                    "_score": null,
                    "_source": {
                        "id": "rpi-featured-008",
                        "manufacturer": "Raspberry Pi",
                        "manufacturer_part_number": "RPI-PSU-27W",
                        "name": "Raspberry Pi 27W USB-C PSU",
                        "description": "power supply",
                        "category": "Raspberry Pi Accessories",
                        "unit_price": 12.0,
                        "quantity_available": 500,
                        "key_specs": { "interface": "USB-C" },
                        "spec_blob": "interface USB-C",
                        "product_url": "https://example.com/p",
                        "datasheet_url": "https://example.com/d.pdf"
                    }
                }]
            }
        });
        let hits = serde_json::from_value::<SearchResponse>(raw).unwrap().into_hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, None);
        assert_eq!(hits[0].product.id, "rpi-featured-008");
        assert!(hits[0].product.tags.is_empty());
        assert_eq!(hits[0].product.key_specs["interface"], "USB-C");
    }
}
