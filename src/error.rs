use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read seed catalog {path}: {source}")]
    SeedLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed catalog {path}: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog document {id:?}: {reason}")]
    InvalidDocument { id: String, reason: String },

    #[error("invalid query intent: {0}")]
    InvalidIntent(String),

    /// Index creation or seeding failed; startup must abort.
    #[error("index {index} provisioning failed during {stage}: {source}")]
    Provisioning {
        index: String,
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("catalog service already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, CatalogError>;
