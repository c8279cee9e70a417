//! # drop-relay
//!
//! Rendezvous relay for relaydrop file transfers.
//!
//! This crate implements a relay server that:
//! - Registers a sender's offer and hands back a short word secret
//! - Pairs the sender with whoever presents that secret
//! - Streams the file from one HTTP body straight into the other
//! - Forgets offers nobody claims before their deadline
//!
//! ## Architecture
//!
//! ```text
//! Sender ────┐                        ┌──── Receiver
//!            │  PUT /file/<secret>    │  GET /file/<secret>
//!            ▼                        ▼
//!        ┌────────────────────────────────┐
//!        │           drop-relay           │
//!        │  OfferTable ── Rendezvous ──►  │
//!        │   (secret → Offer)  bounded    │
//!        │                     copy       │
//!        └────────────────────────────────┘
//! ```
//!
//! Nothing is stored: bytes only move while both parties are connected, and
//! memory per transfer is fixed regardless of file size.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cleanup;
pub mod config;
pub mod error;
pub mod http;
pub mod limits;
pub mod offer;
pub mod rendezvous;
pub mod secrets;
pub mod server;
pub mod table;
mod words;

pub use config::Config;
pub use error::{RelayError, Result};
pub use server::{load_tls, serve, serve_tls, serve_with_shutdown, DropRelay};
