//! The offer table.
//!
//! The only globally shared mutable state in the relay: a concurrent map from
//! secret to [`Offer`]. Check-and-insert happens under the map's exclusive
//! shard lock; no lock is ever held across I/O.

use crate::cleanup;
use crate::error::{RelayError, Result};
use crate::offer::{Offer, OfferState};
use crate::secrets::SecretSource;
use crate::server::RelayMetrics;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use drop_types::Secret;
use serde::Serialize;
use std::net::IpAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound on candidate draws for one offer.
///
/// Only reachable when the secret source keeps repeating live secrets.
const MAX_DRAWS: usize = 1024;

/// Registered offers by lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OfferCounts {
    /// Waiting for a sender, a receiver, or both.
    pub pending: usize,
    /// Bytes in flight.
    pub matched: usize,
}

/// Concurrency-safe map from secret to live offer.
#[derive(Clone)]
pub struct OfferTable {
    offers: Arc<DashMap<Secret, Arc<Offer>>>,
    secrets: Arc<dyn SecretSource>,
    timeout: Duration,
    metrics: Arc<RelayMetrics>,
}

impl std::fmt::Debug for OfferTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfferTable")
            .field("offers", &self.offers.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OfferTable {
    /// Create an empty table whose offers expire after `timeout`.
    pub fn new(
        secrets: Arc<dyn SecretSource>,
        timeout: Duration,
        metrics: Arc<RelayMetrics>,
    ) -> Self {
        Self {
            offers: Arc::new(DashMap::new()),
            secrets,
            timeout,
            metrics,
        }
    }

    /// Register a new offer under a fresh secret and start its reaper.
    ///
    /// Candidates are drawn until one is not held by a live offer.
    pub fn create(&self, filename: String, origin: Option<IpAddr>) -> Result<Arc<Offer>> {
        let deadline = Instant::now() + self.timeout;

        for _ in 0..MAX_DRAWS {
            match self.offers.entry(self.secrets.next_secret()) {
                Entry::Occupied(taken) => {
                    tracing::debug!(
                        secret = taken.key().redacted(),
                        "secret collision, drawing again"
                    );
                }
                Entry::Vacant(slot) => {
                    let offer = Arc::new(Offer::new(slot.key().clone(), filename, origin, deadline));
                    slot.insert(Arc::clone(&offer));
                    cleanup::spawn_reaper(self.clone(), Arc::clone(&offer));
                    return Ok(offer);
                }
            }
        }

        Err(RelayError::Internal(format!(
            "no free secret after {MAX_DRAWS} draws"
        )))
    }

    /// Look up a live offer.
    ///
    /// Offers that already reached a terminal state are reported as absent,
    /// exactly like secrets that never existed.
    pub fn find(&self, secret: &Secret) -> Option<Arc<Offer>> {
        self.offers
            .get(secret)
            .map(|entry| Arc::clone(entry.value()))
            .filter(|offer| !offer.state().is_terminal())
    }

    /// Remove whatever offer is registered under `secret`. Idempotent.
    pub fn delete(&self, secret: &Secret) -> bool {
        self.offers.remove(secret).is_some()
    }

    /// Remove `offer`, but only if it is still the one registered under its
    /// secret. A later offer that reused the secret is left alone.
    pub fn retire(&self, offer: &Arc<Offer>) -> bool {
        self.offers
            .remove_if(offer.secret(), |_, live| Arc::ptr_eq(live, offer))
            .is_some()
    }

    /// Number of registered offers.
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Whether no offers are registered.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Count registered offers that are pending or matched. Offers already
    /// finished but not yet removed are left out.
    pub fn counts(&self) -> OfferCounts {
        let mut counts = OfferCounts::default();
        for entry in self.offers.iter() {
            match entry.value().state() {
                OfferState::Pending => counts.pending += 1,
                OfferState::Matched => counts.matched += 1,
                OfferState::Done(_) | OfferState::Expired => {}
            }
        }
        counts
    }

    /// Expire every offer that has not started copying.
    ///
    /// Parked senders and receivers are released as if their deadline had
    /// passed; their reapers remove the entries. Returns how many expired.
    pub fn expire_pending(&self) -> usize {
        let offers: Vec<Arc<Offer>> = self
            .offers
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut expired = 0;
        for offer in offers {
            if offer.try_expire() {
                self.record_expiry();
                expired += 1;
            }
        }
        expired
    }

    pub(crate) fn record_expiry(&self) {
        self.metrics.offers_expired.fetch_add(1, Ordering::Relaxed);
    }
}
