//! Wiring & DI. Entry point: bootstrap adapters, load the catalog, run the UI.
//! No business logic here; filtering lives in the use cases.

use dotenv::dotenv;
use market_sift::adapters::api::{FixtureGateway, HttpMarketplaceGateway};
use market_sift::adapters::persistence::FilterStateJson;
use market_sift::adapters::ui::{progress, tui::TuiInputPort};
use market_sift::ports::{FilterStatePort, InputPort, MarketplaceGateway};
use market_sift::shared::config::AppConfig;
use market_sift::usecases::{BrowseSession, CatalogService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    market_sift::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration; using defaults");
        AppConfig::default()
    });

    // --- Gateway: fixtures when configured, live backend otherwise ---
    let gateway: Arc<dyn MarketplaceGateway> = match cfg.fixtures_dir.as_deref() {
        Some(dir) if cfg.uses_fixtures() => {
            info!(dir, "using fixture gateway");
            Arc::new(FixtureGateway::new(dir))
        }
        _ => {
            let base_url = cfg.api_base_url_or_default();
            info!(url = %base_url, "using marketplace API");
            Arc::new(
                HttpMarketplaceGateway::new(
                    base_url,
                    Duration::from_secs(cfg.request_timeout_secs_or_default()),
                )
                .map_err(|e| anyhow::anyhow!("{}", e))?,
            )
        }
    };

    // --- Catalog snapshot (categories, locations, ads) ---
    let spinner = progress::spinner("Fetching categories, locations and ads…");
    let loaded = CatalogService::new(gateway).load().await;
    spinner.finish_and_clear();
    let catalog = match loaded {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => anyhow::bail!("Could not load the marketplace catalog: {}", e),
    };

    // --- Session, restoring last filters ---
    let state_path = cfg.state_path_or_default();
    let state: Arc<dyn FilterStatePort> = Arc::new(FilterStateJson::new(&state_path));
    let mut session = BrowseSession::new(catalog, cfg.page_size_or_default());
    match state.load().await {
        Ok(Some(saved)) => {
            info!(path = %state_path, "restoring last filters");
            session.restore(saved);
        }
        Ok(None) => session.set_sort(cfg.default_sort_or_default()),
        Err(e) => warn!(error = %e, "could not load saved filters"),
    }

    // --- Run ---
    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(session, state));
    input_port
        .run_browse()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
