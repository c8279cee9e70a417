//! drop-relay binary entry point.
//!
//! Usage:
//! ```bash
//! drop-relay 0.0.0.0:8080
//! drop-relay --config relay.toml
//! drop-relay --tls-cert cert.pem --tls-key key.pem
//! drop-relay --help
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use drop_relay::cleanup::spawn_limiter_sweeper;
use drop_relay::{load_tls, serve_tls, serve_with_shutdown, Config, DropRelay};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Rendezvous relay for relaydrop file transfers.
#[derive(Parser, Debug)]
#[command(name = "drop-relay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to listen on (overrides `server.bind_address`)
    listen: Option<String>,

    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// PEM certificate chain; serves HTTPS together with --tls-key
    #[arg(long, requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    /// PEM private key for --tls-cert
    #[arg(long, requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.bind_address = listen;
    }
    if args.tls_cert.is_some() {
        config.server.tls_cert = args.tls_cert;
        config.server.tls_key = args.tls_key;
    }
    config.validate().context("Invalid configuration")?;

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    let local_addr = listener.local_addr().context("Failed to read local address")?;

    let tls = match config.server.tls() {
        Some((cert, key)) => Some(load_tls(cert, key).await.with_context(|| {
            format!("Failed to load TLS files {} and {}", cert.display(), key.display())
        })?),
        None => None,
    };

    let sweep_every = Duration::from_secs(config.limits.sweep_interval_secs);
    let relay = Arc::new(DropRelay::new(config));
    let sweeper = spawn_limiter_sweeper(relay.rate_limits().clone(), sweep_every);

    let served = match tls {
        Some(tls) => {
            tracing::info!(
                "drop-relay v{} listening on https://{}",
                env!("CARGO_PKG_VERSION"),
                local_addr
            );
            serve_tls(listener, relay, tls, shutdown_signal()).await
        }
        None => {
            tracing::info!(
                "drop-relay v{} listening on http://{}",
                env!("CARGO_PKG_VERSION"),
                local_addr
            );
            tracing::warn!(
                "TLS is off: clients must use an explicit http:// relay address, \
                 or put a TLS-terminating proxy in front"
            );
            serve_with_shutdown(listener, relay, shutdown_signal()).await
        }
    };
    served.context("Server error")?;

    sweeper.abort();
    tracing::info!("drop-relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested, finishing in-flight transfers");
}
