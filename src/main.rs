//! Current-song overlay server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                SONG OVERLAY                   │
//!   Overlay page /       │  ┌────────┐    ┌──────────────┐               │
//!   ─────────────────────┼─▶│  http  │───▶│   routing    │──▶ views      │
//!                        │  │ server │    │ (route table)│               │
//!                        │  └───┬────┘    └──────────────┘               │
//!   /api/ws/... feed     │      │         ┌──────────────┐               │
//!   ◀────────────────────┼──────┴────────▶│   playback   │               │
//!                        │                │ poller + feed│               │
//!                        │                └──────┬───────┘               │
//!                        │                       ▼                       │
//!                        │                ┌──────────────┐               │     Spotify
//!                        │                │   spotify    │◀──────────────┼──── Web API
//!                        │                │ auth + client│               │
//!                        │                └──────────────┘               │
//!                        │  config · observability · lifecycle           │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use song_overlay::config::{load_config, load_from_env};
use song_overlay::lifecycle::{signals, startup};
use song_overlay::observability::{logging, metrics};
use song_overlay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "song-overlay")]
#[command(about = "Serves a current-song overlay backed by Spotify", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults plus environment when omitted.
    #[arg(short, long, env = "OVERLAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };

    logging::init_logging(&config.observability);

    tracing::info!("song-overlay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.app.base_url,
        history = ?config.app.history,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config.clone(), shutdown)?;
    let listener = startup::bind(&config).await?;

    tracing::info!(
        address = %listener.local_addr()?,
        "Open /api/login to connect Spotify"
    );

    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
