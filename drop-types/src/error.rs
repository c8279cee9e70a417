//! Error types for relaydrop wire values.

use thiserror::Error;

/// Errors produced when parsing a [`Secret`](crate::Secret) from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// Nothing left after trimming whitespace
    #[error("secret is empty")]
    Empty,

    /// Longer than any secret the relay hands out
    #[error("secret too long: {len} characters (limit: {limit})")]
    TooLong {
        /// Length of the rejected input.
        len: usize,
        /// Maximum accepted length.
        limit: usize,
    },

    /// Contains a character outside `[a-z0-9-]`
    #[error("invalid character in secret: {0:?}")]
    InvalidCharacter(char),

    /// Leading, trailing or doubled separator
    #[error("malformed secret: {0}")]
    Malformed(String),
}
