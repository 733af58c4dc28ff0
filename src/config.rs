use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::retry::RetryPolicy;

/// Everything needed to reach and use the remote search engine.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub url: Option<String>,
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_attempts: u32,
    pub connect_delay: Duration,
    pub request_timeout: Duration,
}

impl SearchSettings {
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }

    pub fn connect_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.connect_attempts, self.connect_delay)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            url: None,
            index: "catalog_products".into(),
            username: None,
            password: None,
            connect_attempts: 5,
            connect_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(15),
        }
    }
}

pub struct AppConfig {
    pub search: SearchSettings,
    pub catalog_path: PathBuf,
    pub seed_recreate: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = SearchSettings::default();
        let get = |k: &str, d: &str| lookup(k).unwrap_or_else(|| d.to_string());
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        let search = SearchSettings {
            url: non_empty("SEARCH_URL"),
            index: get("SEARCH_INDEX", &defaults.index),
            username: non_empty("SEARCH_USERNAME"),
            password: non_empty("SEARCH_PASSWORD"),
            connect_attempts: parse_or(&lookup, "SEARCH_CONNECT_ATTEMPTS", defaults.connect_attempts).max(1),
            connect_delay: Duration::from_millis(parse_or(&lookup, "SEARCH_CONNECT_DELAY_MS", 1000u64)),
            request_timeout: Duration::from_secs(parse_or(&lookup, "SEARCH_REQUEST_TIMEOUT_SECS", 15u64)),
        };

        Self {
            search,
            catalog_path: PathBuf::from(get("CATALOG_PATH", "data/catalog.json")),
            seed_recreate: get("SEED_RECREATE", "false").eq_ignore_ascii_case("true"),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparseable setting, using default");
            default
        }),
    }
}
