//! Graph Mirror Main Entry Point
//!
//! Reads committed transactions as newline-delimited JSON from stdin and
//! mirrors them into OpenSearch.

use dotenv::dotenv;
use graph_mirror::replay::replay;
use graph_mirror::{Dependencies, MirrorError};
use std::env;
use tokio::io::{stdin, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("graph_mirror=info,graph_mirror_repository=info"));

    let json = env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "graph-mirror",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), MirrorError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting graph mirror");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(MirrorError::Disabled(reason)) => {
            info!(reason = %reason, "Nothing to mirror, exiting");
            return Ok(());
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let reader = BufReader::new(stdin());
    match replay(reader, &deps.mirror, deps.config.dispatch_mode).await {
        Ok(summary) => {
            info!(?summary, "Graph mirror completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Graph mirror failed");
            Err(e)
        }
    }
}
