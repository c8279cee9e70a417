//! Transfer endpoints: `POST /file`, `PUT /file/:secret`, `GET /file/:secret`.

use crate::error::RelayError;
use crate::limits::RateLimitError;
use crate::server::DropRelay;
use axum::body::Body;
use axum::extract::{ConnectInfo, Path};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use drop_types::protocol::FILENAME_HEADER;
use drop_types::Secret;
use futures_util::TryStreamExt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::io::StreamReader;

/// Create an offer. Responds with the secret followed by a newline.
pub async fn create_offer(
    Extension(relay): Extension<Arc<DropRelay>>,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<String, RelayError> {
    let origin = client_ip(connect);
    rate_limited(&relay, relay.rate_limits().check_offer(&limit_key(origin)))?;

    let filename = match headers.get(FILENAME_HEADER) {
        Some(value) => String::from_utf8(value.as_bytes().to_vec()).map_err(|_| {
            RelayError::InvalidRequest {
                reason: format!("{FILENAME_HEADER} header is not valid UTF-8"),
            }
        })?,
        None => String::new(),
    };

    let secret = relay.rendezvous().create_offer(filename, origin)?;
    Ok(format!("{secret}\n"))
}

/// Stream the request body to the offer's receiver.
///
/// Answers once the copy is over: 200 if every byte was delivered. Counts
/// against the same per-IP quota as receiving, since naming a secret is a
/// guess either way.
pub async fn send(
    Extension(relay): Extension<Arc<DropRelay>>,
    Path(secret): Path<String>,
    connect: Option<ConnectInfo<SocketAddr>>,
    body: Body,
) -> Result<StatusCode, RelayError> {
    let origin = client_ip(connect);
    rate_limited(&relay, relay.rate_limits().check_fulfill(&limit_key(origin)))?;

    let secret = parse_secret(&relay, &secret)?;

    let reader = StreamReader::new(body.into_data_stream().map_err(io::Error::other));
    tokio::pin!(reader);

    relay.rendezvous().send(&secret, origin, &mut reader).await?;
    Ok(StatusCode::OK)
}

/// Attach as the offer's receiver and stream the payload back.
pub async fn receive(
    Extension(relay): Extension<Arc<DropRelay>>,
    Path(secret): Path<String>,
    connect: Option<ConnectInfo<SocketAddr>>,
) -> Result<Response, RelayError> {
    let origin = client_ip(connect);
    rate_limited(&relay, relay.rate_limits().check_fulfill(&limit_key(origin)))?;

    let secret = parse_secret(&relay, &secret)?;
    let download = relay.rendezvous().receive(&secret).await?;

    // A hint the header cannot carry is dropped rather than failing the transfer.
    let filename = HeaderValue::from_bytes(download.filename().as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static(""));

    Ok((
        [(FILENAME_HEADER, filename)],
        Body::from_stream(download.into_stream()),
    )
        .into_response())
}

/// A malformed secret cannot name a live offer.
fn parse_secret(relay: &DropRelay, raw: &str) -> Result<Secret, RelayError> {
    Secret::parse(raw).map_err(|e| {
        tracing::debug!("Rejected malformed secret: {}", e);
        relay
            .metrics()
            .lookups_not_found
            .fetch_add(1, Ordering::Relaxed);
        RelayError::NotFound
    })
}

fn rate_limited(relay: &DropRelay, check: Result<(), RateLimitError>) -> Result<(), RelayError> {
    check.map_err(|e| {
        relay.metrics().rate_limit_hits.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("Rate limited: {}", e);
        RelayError::from(e)
    })
}

fn client_ip(connect: Option<ConnectInfo<SocketAddr>>) -> Option<IpAddr> {
    connect.map(|ConnectInfo(addr)| addr.ip())
}

/// Clients without a known address share one limiter bucket.
fn limit_key(origin: Option<IpAddr>) -> IpAddr {
    origin.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
