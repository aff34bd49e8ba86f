//! Substation router (least-loaded).
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │               SUBSTATION ROUTER              │
//!                     │                                              │
//!   POST /route       │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ──────────────────┼─▶│  http   │──▶│   pool   │──▶│ forwarder │──┼──▶ substation /charge
//!                     │  │ handler │   │ (select) │   └───────────┘  │
//!                     │  └─────────┘   └────▲─────┘                  │
//!                     │                     │ snapshot               │
//!                     │               ┌─────┴──────┐                 │
//!                     │               │ load table │                 │
//!                     │               └─────▲──────┘                 │
//!                     │                     │ one write per cycle    │
//!                     │               ┌─────┴──────┐                 │
//!                     │               │  sampler   │─────────────────┼──▶ substation /metrics
//!                     │               └────────────┘                 │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use substation_router::config::{load_config, RouterConfig};
use substation_router::lifecycle::{wait_for_signal, Shutdown};
use substation_router::observability::{logging, metrics};
use substation_router::HttpServer;

#[derive(Parser)]
#[command(name = "substation-router")]
#[command(about = "Routes work requests to the least-loaded substation", long_about = None)]
struct Args {
    /// Path to a TOML configuration file (defaults are used when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("substation-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        substations = config.substations.len(),
        sample_interval_secs = config.sampler.interval_secs,
        forward_timeout_secs = config.forward.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    HttpServer::new(config).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
