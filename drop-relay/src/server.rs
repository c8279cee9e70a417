//! Main DropRelay server coordination.
//!
//! DropRelay owns the offer table, the rendezvous engine and the rate
//! limiters, and serves them over HTTP or HTTPS.

use crate::config::Config;
use crate::http::build_router;
use crate::limits::RateLimits;
use crate::rendezvous::Rendezvous;
use crate::secrets::{SecretSource, Secrets};
use crate::table::{OfferCounts, OfferTable};
use axum_server::tls_rustls::RustlsConfig;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

/// Operational metrics for monitoring relay activity.
///
/// All counters are monotonically increasing (reset only on restart).
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Offers registered.
    pub offers_created: AtomicU64,
    /// Offers that reached their deadline without a copy starting.
    pub offers_expired: AtomicU64,
    /// Copies the receiver read to the end.
    pub transfers_completed: AtomicU64,
    /// Copies aborted by an I/O failure or left unread by the receiver.
    pub transfers_failed: AtomicU64,
    /// Payload bytes relayed by completed copies.
    pub bytes_relayed: AtomicU64,
    /// Send or receive requests answered 404.
    pub lookups_not_found: AtomicU64,
    /// Requests rejected by a rate limiter.
    pub rate_limit_hits: AtomicU64,
}

/// Main relay server.
pub struct DropRelay {
    config: Config,
    rendezvous: Rendezvous,
    /// Per-IP limiters for offer creation and transfer attempts.
    rate_limits: RateLimits,
    metrics: Arc<RelayMetrics>,
    started: Instant,
    /// Set once shutdown begins.
    draining: AtomicBool,
}

impl std::fmt::Debug for DropRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropRelay")
            .field("config", &self.config)
            .field("rate_limits", &self.rate_limits)
            .field("metrics", &self.metrics)
            .field("offers", &self.rendezvous.table().len())
            .field("draining", &self.is_draining())
            .finish_non_exhaustive()
    }
}

impl DropRelay {
    /// Create a relay drawing secrets from operating-system entropy.
    pub fn new(config: Config) -> Self {
        Self::with_secrets(config, Arc::new(Secrets::from_entropy()))
    }

    /// Create a relay with an explicit secret source.
    pub fn with_secrets(config: Config, secrets: Arc<dyn SecretSource>) -> Self {
        let metrics = Arc::new(RelayMetrics::default());
        let table = OfferTable::new(secrets, config.offers.timeout(), Arc::clone(&metrics));
        let rendezvous = Rendezvous::new(table, config.offers.clone(), Arc::clone(&metrics));
        let rate_limits = RateLimits::new(&config.limits);
        Self {
            config,
            rendezvous,
            rate_limits,
            metrics,
            started: Instant::now(),
            draining: AtomicBool::new(false),
        }
    }

    /// Get the relay configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the rendezvous engine.
    pub fn rendezvous(&self) -> &Rendezvous {
        &self.rendezvous
    }

    /// Get access to the rate limiters.
    pub fn rate_limits(&self) -> &RateLimits {
        &self.rate_limits
    }

    /// Get access to the operational metrics.
    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    /// Number of offers currently registered.
    pub fn offers_active(&self) -> usize {
        self.rendezvous.table().len()
    }

    /// Registered offers split by lifecycle state.
    pub fn offer_counts(&self) -> OfferCounts {
        self.rendezvous.table().counts()
    }

    /// Time since the relay was created.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether shutdown has begun.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// Start shutting down.
    ///
    /// Every offer that is still pending is expired, so parked senders get
    /// 408 and parked receivers 404 instead of holding the server open until
    /// their deadlines. Copies already under way are left to finish.
    /// Returns how many offers were expired.
    pub fn begin_shutdown(&self) -> usize {
        self.draining.store(true, Ordering::Release);
        let expired = self.rendezvous.table().expire_pending();
        tracing::info!("Shutting down: expired {} pending offers", expired);
        expired
    }
}

/// Serve `relay` on `listener` until the process ends.
pub async fn serve(listener: TcpListener, relay: Arc<DropRelay>) -> std::io::Result<()> {
    serve_with_shutdown(listener, relay, std::future::pending()).await
}

/// Serve `relay` on `listener` until `shutdown` resolves.
///
/// In-flight transfers are allowed to finish before this returns.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    relay: Arc<DropRelay>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(Arc::clone(&relay));
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown.await;
        relay.begin_shutdown();
    })
    .await
}

/// Load a PEM certificate chain and private key for [`serve_tls`].
pub async fn load_tls(cert: &Path, key: &Path) -> std::io::Result<RustlsConfig> {
    // rustls needs a process-wide provider; a second install is a no-op.
    let _ = rustls::crypto::ring::default_provider().install_default();
    RustlsConfig::from_pem_file(cert, key).await
}

/// Serve `relay` over TLS on `listener` until `shutdown` resolves.
///
/// Shutdown behaves as in [`serve_with_shutdown`].
pub async fn serve_tls<F>(
    listener: TcpListener,
    relay: Arc<DropRelay>,
    tls: RustlsConfig,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(Arc::clone(&relay));
    let handle = axum_server::Handle::new();

    let stopper = handle.clone();
    tokio::spawn(async move {
        shutdown.await;
        relay.begin_shutdown();
        stopper.graceful_shutdown(None);
    });

    axum_server::from_tcp_rustls(listener.into_std()?, tls)
        .handle(handle)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
}
