//! Client error types.

use drop_types::SecretError;
use reqwest::StatusCode;
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP exchange itself failed (connect, TLS, protocol).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unknown, expired or already used secret.
    #[error("no such transfer (wrong, expired or already used secret)")]
    NotFound,

    /// Nobody received the file before the offer expired.
    #[error("no receiver arrived before the offer expired")]
    NoReceiver,

    /// The transfer started but did not complete.
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// The relay is rejecting requests from this address for now.
    #[error("rate limited by relay, try again later")]
    RateLimited,

    /// A status the protocol does not define.
    #[error("unexpected status from relay: {0}")]
    UnexpectedStatus(StatusCode),

    /// The relay answered with something that is not a valid reply.
    #[error("invalid response from relay: {0}")]
    InvalidResponse(String),

    /// The relay address cannot be turned into a URL.
    #[error("invalid relay address: {0}")]
    InvalidAddress(String),

    /// The filename cannot be sent, or the suggested one cannot be used locally.
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),

    /// The secret is malformed.
    #[error("invalid secret: {0}")]
    InvalidSecret(#[from] SecretError),

    /// Local I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The error a non-success status stands for, or `None` on success.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        Some(match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::REQUEST_TIMEOUT => Self::NoReceiver,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            s if s.is_server_error() => Self::TransferFailed(format!("relay answered {s}")),
            s => Self::UnexpectedStatus(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_not_an_error() {
        assert!(ClientError::from_status(StatusCode::OK).is_none());
    }

    #[test]
    fn protocol_statuses_map_to_variants() {
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND),
            Some(ClientError::NotFound)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::REQUEST_TIMEOUT),
            Some(ClientError::NoReceiver)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::TOO_MANY_REQUESTS),
            Some(ClientError::RateLimited)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            Some(ClientError::TransferFailed(_))
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_GATEWAY),
            Some(ClientError::TransferFailed(_))
        ));
    }

    #[test]
    fn other_statuses_are_unexpected() {
        assert!(matches!(
            ClientError::from_status(StatusCode::METHOD_NOT_ALLOWED),
            Some(ClientError::UnexpectedStatus(StatusCode::METHOD_NOT_ALLOWED))
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST),
            Some(ClientError::UnexpectedStatus(_))
        ));
    }
}
