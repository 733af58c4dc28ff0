use anyhow::Context;
use tracing::{info, warn};

use catalog_search::{init_tracing, routes, AppConfig, CatalogService, SeedCatalog};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // 1) Config and seed data; a broken catalog aborts startup.
    let cfg = AppConfig::from_env();
    let catalog = SeedCatalog::load(&cfg.catalog_path)
        .with_context(|| format!("loading seed catalog from {}", cfg.catalog_path.display()))?;

    // 2) Decide the mode once, before accepting traffic.
    let mut service = CatalogService::new(catalog, cfg.search);
    if let Some(warning) = service.initialize().await? {
        warn!("{warning}");
    }
    info!(mode = %service.mode(), "starting catalog search api");

    // 3) Serve.
    let _ = routes::build(service)?.launch().await?;
    Ok(())
}
