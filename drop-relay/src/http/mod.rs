//! HTTP endpoints for drop-relay.
//!
//! Transfer routes plus health checks and metrics. Any other method on a
//! known path is answered 405 by the router before a handler runs.

pub mod health;
mod metrics;
mod transfer;

use crate::server::DropRelay;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Extension, Router};
use drop_types::protocol::{OFFER_PATH, TRANSFER_ROUTE};
use std::sync::Arc;

pub use health::HealthStatus;

/// Build the HTTP router with all endpoints.
pub fn build_router(relay: Arc<DropRelay>) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .route(OFFER_PATH, post(transfer::create_offer))
        .route(
            TRANSFER_ROUTE,
            get(transfer::receive).put(transfer::send),
        )
        // Uploads are streamed, never buffered; their size is unbounded.
        .layer(DefaultBodyLimit::disable())
        .layer(Extension(relay))
}
