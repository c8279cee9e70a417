//! # drop-client
//!
//! Client library for the relaydrop file relay.
//!
//! Senders and receivers never talk to each other directly; both talk HTTP
//! to a relay and are paired by a short secret:
//!
//! ```text
//! sender:   offer(filename) ──► secret ──(out of band)──► receiver
//! sender:   PendingSend::send(file)        receive(secret) ──► Incoming
//!                     └──────── bytes via the relay ────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use drop_client::RelayClient;
//!
//! let client = RelayClient::new("relay.example.com:8080", false)?;
//! let pending = client.offer("photo.jpg").await?;
//! println!("{}", pending.secret());
//! pending.send(tokio::fs::File::open("photo.jpg").await?).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;

pub use client::{Incoming, PendingSend, RelayClient};
pub use drop_types::Secret;
pub use error::ClientError;
