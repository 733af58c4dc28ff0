#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use catalog_search::models::IndexedProduct;
use catalog_search::search::{RemoteHit, SearchBackend};
use catalog_search::{ProductDocument, SearchSettings, SeedCatalog};

#[derive(Default)]
pub struct MockState {
    pub pings_to_fail: u32,
    pub pings: u32,
    pub index_exists: bool,
    pub creates: u32,
    pub mapping: Option<Value>,
    pub stored: Vec<Value>,
    pub fail_create: bool,
    pub create_races: bool,
    pub fail_bulk: bool,
    pub search_hits: Vec<RemoteHit>,
    pub search_error: Option<String>,
    pub search_delay: Option<Duration>,
    pub last_query: Option<Value>,
    pub searches: u32,
}

/// In-memory stand-in for the remote engine. Clones share state.
#[derive(Clone, Default)]
pub struct MockBackend {
    pub state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F: FnOnce(&mut MockState)>(self, f: F) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn set<F: FnOnce(&mut MockState)>(&self, f: F) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn read<T>(&self, f: impl FnOnce(&MockState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn ping(&self) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        s.pings += 1;
        if s.pings <= s.pings_to_fail {
            bail!("connection refused");
        }
        Ok(())
    }

    async fn index_exists(&self, _index: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().index_exists)
    }

    async fn create_index(&self, _index: &str, body: &Value) -> Result<bool> {
        let mut s = self.state.lock().unwrap();
        if s.fail_create {
            bail!("mapper_parsing_exception");
        }
        if s.create_races {
            // another process won between the existence check and the create
            s.index_exists = true;
            return Ok(false);
        }
        s.creates += 1;
        s.index_exists = true;
        s.mapping = Some(body.clone());
        Ok(true)
    }

    async fn delete_index(&self, _index: &str) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        s.index_exists = false;
        s.stored.clear();
        Ok(())
    }

    async fn count(&self, _index: &str) -> Result<u64> {
        let s = self.state.lock().unwrap();
        if !s.index_exists {
            return Err(anyhow!("index_not_found_exception"));
        }
        Ok(s.stored.len() as u64)
    }

    async fn bulk_index(&self, _index: &str, docs: &[IndexedProduct<'_>]) -> Result<usize> {
        let mut s = self.state.lock().unwrap();
        if s.fail_bulk {
            bail!("bulk insert: 1 of {} documents failed", docs.len());
        }
        for doc in docs {
            s.stored.push(serde_json::to_value(doc)?);
        }
        Ok(docs.len())
    }

    async fn refresh(&self, _index: &str) -> Result<()> {
        Ok(())
    }

    async fn search(&self, _index: &str, body: &Value) -> Result<Vec<RemoteHit>> {
        let (delay, error, hits) = {
            let mut s = self.state.lock().unwrap();
            s.searches += 1;
            s.last_query = Some(body.clone());
            (s.search_delay, s.search_error.clone(), s.search_hits.clone())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = error {
            bail!(err);
        }
        Ok(hits)
    }
}

pub fn product(id: &str, name: &str, description: &str, qty: u32, price: f64) -> ProductDocument {
    ProductDocument {
        id: id.into(),
        manufacturer: "Vishay Dale".into(),
        manufacturer_part_number: format!("MPN-{}", id.to_uppercase()),
        name: name.into(),
        description: description.into(),
        category: "Resistors".into(),
        unit_price: price,
        quantity_available: qty,
        tags: vec!["passive".into()],
        use_cases: vec!["signal conditioning".into()],
        key_specs: [("tolerance".to_string(), "1%".to_string())].into_iter().collect(),
        product_url: format!("https://example.com/p/{id}"),
        datasheet_url: format!("https://example.com/d/{id}.pdf"),
    }
}

pub fn pi_psu() -> ProductDocument {
    ProductDocument {
        id: "rpi-featured-008".into(),
        manufacturer: "Raspberry Pi".into(),
        manufacturer_part_number: "RPI-RPI-PSU-27W-41".into(),
        name: "Raspberry Pi Official USB-C 27W PSU".into(),
        description: "high current power supply for Raspberry Pi 5".into(),
        category: "Raspberry Pi Accessories".into(),
        unit_price: 12.0,
        quantity_available: 500,
        tags: vec!["raspberry pi".into(), "accessory".into()],
        use_cases: vec!["maker".into()],
        key_specs: [("interface".to_string(), "USB-C".to_string())].into_iter().collect(),
        product_url: "https://example.com/p/rpi-psu".into(),
        datasheet_url: "https://example.com/d/rpi-psu.pdf".into(),
    }
}

/// The PSU plus three out-of-stock resistors.
pub fn sample_catalog() -> SeedCatalog {
    SeedCatalog::from_documents(vec![
        product("res-1", "Thick Film Resistor 10k", "chip resistor for power rails", 0, 0.02),
        product("res-2", "Metal Film Resistor 1k", "precision resistor supply filtering", 0, 0.05),
        product("res-3", "Wirewound Resistor 5W", "high power resistor", 0, 0.90),
        pi_psu(),
    ])
    .unwrap()
}

pub fn fast_settings() -> SearchSettings {
    SearchSettings {
        url: Some("http://mock:9200".into()),
        index: "test_products".into(),
        connect_attempts: 3,
        connect_delay: Duration::from_millis(1),
        request_timeout: Duration::from_millis(200),
        ..SearchSettings::default()
    }
}

pub fn hit(doc: ProductDocument, score: f64) -> RemoteHit {
    RemoteHit { score: Some(score), product: doc }
}
