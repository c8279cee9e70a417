//! Error types for drop-relay.

use crate::limits::RateLimitError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Main error type for drop-relay operations.
///
/// Each variant maps onto exactly one HTTP status; see [`RelayError::status`].
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Malformed request (bad header, oversized filename hint).
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Reason the request was rejected.
        reason: String,
    },

    /// Unknown, expired, already-claimed or foreign-origin secret.
    ///
    /// These cases are deliberately indistinguishable on the wire.
    #[error("no such offer")]
    NotFound,

    /// No receiver arrived before the offer's deadline.
    #[error("offer expired before a receiver arrived")]
    Timeout,

    /// The byte copy between sender and receiver failed.
    #[error("transfer failed: {0}")]
    UpstreamIo(#[from] CopyError),

    /// Unexpected local fault.
    #[error("internal error: {0}")]
    Internal(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded: {0}")]
    RateLimited(#[from] RateLimitError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// I/O error outside a transfer (binding the listener, serving).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one leg of the byte copy.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Reading the sender's request body failed.
    #[error("reading from sender: {0}")]
    Sender(#[source] std::io::Error),

    /// Writing into the receiver's stream failed.
    #[error("writing to receiver: {0}")]
    Receiver(#[source] std::io::Error),

    /// The receiver went away before reading every byte.
    #[error("receiver left before reading every byte")]
    Undelivered,
}

impl RelayError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::UpstreamIo(_) | Self::Internal(_) | Self::Config(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Tell the client what to fix; everything else stays opaque.
            Self::InvalidRequest { .. } | Self::RateLimited(_) => {
                (status, self.to_string()).into_response()
            }
            _ => status.into_response(),
        }
    }
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(RelayError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(RelayError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            RelayError::InvalidRequest {
                reason: "x".to_string()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::RateLimited(RateLimitError::FulfillLimitExceeded).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        let copy = CopyError::Receiver(std::io::ErrorKind::BrokenPipe.into());
        assert_eq!(
            RelayError::from(copy).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn not_found_response_has_empty_body() {
        let response = RelayError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let response = RelayError::Internal("secret-path /var/lib".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
