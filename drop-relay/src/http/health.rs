//! Health check endpoint.
//!
//! Reports where offers are in their lifecycle: parked waiting for the other
//! party, or matched with bytes in flight, plus how finished ones ended.

use crate::server::DropRelay;
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Health status response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// `"ok"`, or `"draining"` once shutdown has begun.
    pub status: &'static str,
    /// Server version.
    pub version: &'static str,
    /// Offers waiting for a sender, a receiver, or both.
    pub offers_pending: usize,
    /// Offers with a copy under way.
    pub offers_matched: usize,
    /// Offers that expired before a copy started.
    pub offers_expired: u64,
    /// Copies the receiver read to the end.
    pub transfers_completed: u64,
    /// Copies that were aborted.
    pub transfers_failed: u64,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

impl HealthStatus {
    /// Snapshot `relay`.
    pub fn of(relay: &DropRelay) -> Self {
        let counts = relay.offer_counts();
        let metrics = relay.metrics();
        Self {
            status: if relay.is_draining() { "draining" } else { "ok" },
            version: env!("CARGO_PKG_VERSION"),
            offers_pending: counts.pending,
            offers_matched: counts.matched,
            offers_expired: metrics.offers_expired.load(Ordering::Relaxed),
            transfers_completed: metrics.transfers_completed.load(Ordering::Relaxed),
            transfers_failed: metrics.transfers_failed.load(Ordering::Relaxed),
            uptime_seconds: relay.uptime().as_secs(),
        }
    }
}

/// Health check handler.
pub async fn health_handler(Extension(relay): Extension<Arc<DropRelay>>) -> Json<HealthStatus> {
    Json(HealthStatus::of(&relay))
}
