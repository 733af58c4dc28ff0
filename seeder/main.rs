use anyhow::{bail, Context, Result};
use tracing::info;

use catalog_search::search::{connect_with_retry, Connection, IndexManager, OpenSearchBackend, SeedOutcome};
use catalog_search::{init_tracing, AppConfig, SeedCatalog};

/// Out-of-process index bring-up: wait for the engine, (re)create the index,
/// seed it when empty and report the final document count.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = AppConfig::from_env();
    let settings = cfg.search;
    let Some(url) = settings.url.clone() else {
        bail!("SEARCH_URL not set");
    };

    let catalog = SeedCatalog::load(&cfg.catalog_path)
        .with_context(|| format!("loading seed catalog from {}", cfg.catalog_path.display()))?;

    let backend = match connect_with_retry(settings.connect_policy(), || {
        let backend = OpenSearchBackend::new(&url, &settings);
        async move { backend }
    })
    .await
    {
        Connection::Live(backend) => backend,
        Connection::Unavailable { attempts } => {
            bail!("search engine at {url} did not become available after {attempts} attempts")
        }
    };

    let manager = IndexManager::new(&backend, &settings.index);
    if cfg.seed_recreate && manager.drop_if_exists().await? {
        info!(index = %settings.index, "recreating index");
    }
    manager.ensure_index().await?;

    match manager.seed_if_empty(&catalog).await? {
        SeedOutcome::AlreadyPopulated(existing) => {
            println!("Index {} already has {existing} docs. Skipping seed.", settings.index);
            return Ok(());
        }
        SeedOutcome::Seeded(written) => info!(written, "bulk seed finished"),
    }

    manager.refresh().await?;
    let total = manager.document_count().await?;
    println!("Seed complete. Indexed {total} documents into {}.", settings.index);
    Ok(())
}
