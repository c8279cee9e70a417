//! Rate limiting for drop-relay.
//!
//! Two keyed limiters, both keyed by client IP address:
//! - **offers**: bounds how many offers one client can create per minute
//! - **fulfills**: bounds how many send or receive attempts one client can
//!   make per minute, which caps how fast anyone can guess secrets
//!
//! Both use the governor crate's keyed rate limiters backed by DashMap.

use crate::config::LimitsConfig;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Type alias for a keyed rate limiter using DashMap.
type KeyedLimiter<K> = RateLimiter<
    K,
    dashmap::DashMap<K, InMemoryState>,
    DefaultClock,
    NoOpMiddleware<governor::clock::QuantaInstant>,
>;

/// Rate limiters for the relay server.
#[derive(Clone)]
pub struct RateLimits {
    /// Limits `POST /file` per client IP.
    offer_limiter: Arc<KeyedLimiter<IpAddr>>,

    /// Limits `GET` and `PUT /file/{secret}` per client IP.
    fulfill_limiter: Arc<KeyedLimiter<IpAddr>>,
}

impl std::fmt::Debug for RateLimits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimits")
            .field("offer_limiter", &"KeyedLimiter<IpAddr>")
            .field("fulfill_limiter", &"KeyedLimiter<IpAddr>")
            .finish()
    }
}

impl RateLimits {
    /// Create rate limiters from configuration.
    ///
    /// Zero quotas are rejected by [`Config::validate`](crate::config::Config::validate);
    /// should one slip through it is treated as one per minute.
    pub fn new(config: &LimitsConfig) -> Self {
        let offers = NonZeroU32::new(config.offers_per_minute).unwrap_or(NonZeroU32::MIN);
        let fulfills = NonZeroU32::new(config.fulfills_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            offer_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(offers))),
            fulfill_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(fulfills))),
        }
    }

    /// Check if an offer creation from `ip` is allowed.
    pub fn check_offer(&self, ip: &IpAddr) -> Result<(), RateLimitError> {
        self.offer_limiter
            .check_key(ip)
            .map_err(|_| RateLimitError::OfferLimitExceeded)
    }

    /// Check if a send or receive attempt from `ip` is allowed.
    pub fn check_fulfill(&self, ip: &IpAddr) -> Result<(), RateLimitError> {
        self.fulfill_limiter
            .check_key(ip)
            .map_err(|_| RateLimitError::FulfillLimitExceeded)
    }

    /// Get the number of tracked offer keys (for metrics).
    pub fn offer_keys_count(&self) -> usize {
        self.offer_limiter.len()
    }

    /// Get the number of tracked fulfill keys (for metrics).
    pub fn fulfill_keys_count(&self) -> usize {
        self.fulfill_limiter.len()
    }

    /// Evict idle clients from the keyed limiters.
    ///
    /// `retain_recent()` drops entries whose cells have fully recharged.
    /// Called periodically by [`spawn_limiter_sweeper`](crate::cleanup::spawn_limiter_sweeper).
    pub fn shrink(&self) {
        self.offer_limiter.retain_recent();
        self.fulfill_limiter.retain_recent();
    }
}

/// Rate limit error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// Too many offers created by this client.
    OfferLimitExceeded,
    /// Too many send or receive attempts by this client.
    FulfillLimitExceeded,
}

impl std::fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OfferLimitExceeded => write!(f, "offer rate limit exceeded"),
            Self::FulfillLimitExceeded => write!(f, "transfer rate limit exceeded"),
        }
    }
}

impl std::error::Error for RateLimitError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn test_config(offers: u32, fulfills: u32) -> LimitsConfig {
        LimitsConfig {
            offers_per_minute: offers,
            fulfills_per_minute: fulfills,
            sweep_interval_secs: 300,
        }
    }

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn create_rate_limits() {
        let limits = RateLimits::new(&test_config(5, 5));
        assert_eq!(limits.offer_keys_count(), 0);
        assert_eq!(limits.fulfill_keys_count(), 0);
    }

    #[test]
    fn offer_limit_allows_within_quota() {
        let limits = RateLimits::new(&test_config(5, 100));

        for _ in 0..5 {
            assert!(limits.check_offer(&ip(1)).is_ok());
        }

        assert_eq!(
            limits.check_offer(&ip(1)),
            Err(RateLimitError::OfferLimitExceeded)
        );
    }

    #[test]
    fn fulfill_limit_allows_within_quota() {
        let limits = RateLimits::new(&test_config(100, 3));

        for _ in 0..3 {
            assert!(limits.check_fulfill(&ip(2)).is_ok());
        }

        assert_eq!(
            limits.check_fulfill(&ip(2)),
            Err(RateLimitError::FulfillLimitExceeded)
        );
    }

    #[test]
    fn different_clients_have_independent_limits() {
        let limits = RateLimits::new(&test_config(2, 2));

        assert!(limits.check_fulfill(&ip(1)).is_ok());
        assert!(limits.check_fulfill(&ip(1)).is_ok());
        assert!(limits.check_fulfill(&ip(1)).is_err());

        assert!(limits.check_fulfill(&ip(2)).is_ok());
        assert!(limits.check_fulfill(&ip(2)).is_ok());
        assert!(limits.check_fulfill(&ip(2)).is_err());
    }

    #[test]
    fn offer_and_fulfill_quotas_are_separate() {
        let limits = RateLimits::new(&test_config(1, 1));

        assert!(limits.check_offer(&ip(3)).is_ok());
        assert!(limits.check_fulfill(&ip(3)).is_ok());
    }

    #[test]
    fn rate_limit_error_display() {
        assert_eq!(
            RateLimitError::OfferLimitExceeded.to_string(),
            "offer rate limit exceeded"
        );
        assert_eq!(
            RateLimitError::FulfillLimitExceeded.to_string(),
            "transfer rate limit exceeded"
        );
    }

    #[test]
    fn shrink_does_not_panic() {
        let limits = RateLimits::new(&test_config(5, 5));
        let _ = limits.check_offer(&ip(1));
        let _ = limits.check_fulfill(&ip(2));

        assert!(limits.offer_keys_count() > 0);

        // Freshly used entries may or may not be evicted depending on timing.
        limits.shrink();
    }
}
