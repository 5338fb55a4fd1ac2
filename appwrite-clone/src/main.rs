//! Appwrite clone entry point.
//!
//! Fetches the source catalog, applies the configured selection and clones
//! it into the target.

use std::env;

use anyhow::Result;
use appwrite_clone::{Config, Dependencies, RunLog};
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "appwrite_clone=info,appwrite_client=info,clone_log=info";

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "appwrite-clone",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    let deps = Dependencies::new(&config)?;

    let mut log = RunLog::new();
    let mut catalog = match deps.engine.fetch_catalog(&mut log).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "Failed to read the source project");
            return Err(e.into());
        }
    };

    let unknown = catalog
        .tree
        .apply_selectors(config.selectors.iter().map(String::as_str));
    for selector in &unknown {
        warn!(selector = %selector, "Selector matched nothing");
    }

    if catalog.tree.checked_roots().next().is_none() {
        warn!("Nothing selected; set CLONE_SELECT to choose what to clone");
    }

    deps.engine.run(&catalog, &mut log).await;
    info!(lines = log.lines().len(), "Clone run complete");

    Ok(())
}
