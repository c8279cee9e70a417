//! Prometheus metrics endpoint.

use crate::server::DropRelay;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Prometheus metrics handler.
///
/// Returns metrics in Prometheus text format, or 404 when
/// `http.metrics_enabled` is off.
pub async fn metrics_handler(Extension(relay): Extension<Arc<DropRelay>>) -> Response {
    if !relay.config().http.metrics_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        render(&relay),
    )
        .into_response()
}

fn render(relay: &DropRelay) -> String {
    let m = relay.metrics();

    // Gauges
    let offers = relay.offer_counts();
    let offer_keys = relay.rate_limits().offer_keys_count();
    let fulfill_keys = relay.rate_limits().fulfill_keys_count();

    // Counters
    let created = m.offers_created.load(Ordering::Relaxed);
    let expired = m.offers_expired.load(Ordering::Relaxed);
    let completed = m.transfers_completed.load(Ordering::Relaxed);
    let failed = m.transfers_failed.load(Ordering::Relaxed);
    let bytes = m.bytes_relayed.load(Ordering::Relaxed);
    let not_found = m.lookups_not_found.load(Ordering::Relaxed);
    let rate_limits = m.rate_limit_hits.load(Ordering::Relaxed);

    format!(
        r#"# HELP drop_relay_offers Registered offers by state
# TYPE drop_relay_offers gauge
drop_relay_offers{{state="pending"}} {pending}
drop_relay_offers{{state="matched"}} {matched}

# HELP drop_relay_info Server information
# TYPE drop_relay_info gauge
drop_relay_info{{version="{version}"}} 1

# HELP drop_relay_rate_limit_keys Client addresses tracked by the rate limiters
# TYPE drop_relay_rate_limit_keys gauge
drop_relay_rate_limit_keys{{limiter="offer"}} {offer_keys}
drop_relay_rate_limit_keys{{limiter="transfer"}} {fulfill_keys}

# HELP drop_relay_offers_created_total Offers registered
# TYPE drop_relay_offers_created_total counter
drop_relay_offers_created_total {created}

# HELP drop_relay_offers_expired_total Offers that expired without a receiver
# TYPE drop_relay_offers_expired_total counter
drop_relay_offers_expired_total {expired}

# HELP drop_relay_transfers_completed_total Transfers the receiver read to the end
# TYPE drop_relay_transfers_completed_total counter
drop_relay_transfers_completed_total {completed}

# HELP drop_relay_transfers_failed_total Transfers aborted or left unread
# TYPE drop_relay_transfers_failed_total counter
drop_relay_transfers_failed_total {failed}

# HELP drop_relay_bytes_relayed_total Payload bytes relayed by completed transfers
# TYPE drop_relay_bytes_relayed_total counter
drop_relay_bytes_relayed_total {bytes}

# HELP drop_relay_not_found_total Send or receive requests answered 404
# TYPE drop_relay_not_found_total counter
drop_relay_not_found_total {not_found}

# HELP drop_relay_rate_limit_hits_total Total rate limit rejections
# TYPE drop_relay_rate_limit_hits_total counter
drop_relay_rate_limit_hits_total {rate_limits}
"#,
        pending = offers.pending,
        matched = offers.matched,
        version = env!("CARGO_PKG_VERSION"),
    )
}
