//! # drop-types
//!
//! Wire vocabulary for the relaydrop file relay.
//!
//! This crate provides the types shared by the relay server, the protocol
//! client and the command-line front ends:
//! - [`Secret`] - The human-speakable token that pairs a sender with a receiver
//! - [`protocol`] - Header names and resource paths of the HTTP protocol
//! - [`sanitize_filename`] - Turns an untrusted filename hint into a safe local name
//! - [`SecretError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod filename;
pub mod protocol;
mod secret;

pub use error::SecretError;
pub use filename::sanitize_filename;
pub use secret::Secret;
