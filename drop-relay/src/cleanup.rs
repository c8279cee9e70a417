//! Background cleanup tasks.
//!
//! - one **reaper** per offer: expires it at its deadline unless a copy has
//!   started, then removes it from the table once it reaches a terminal state
//! - one **limiter sweeper**: periodically evicts idle clients from the rate
//!   limiters

use crate::limits::RateLimits;
use crate::offer::{wait_for_state, Offer, OfferState};
use crate::table::OfferTable;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until};

/// Spawn the reaper for a freshly registered offer.
///
/// The deadline only applies while the offer is pending; a copy that began
/// in time runs to completion and is removed afterwards.
pub fn spawn_reaper(table: OfferTable, offer: Arc<Offer>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lifecycle = offer.subscribe();

        tokio::select! {
            _ = sleep_until(offer.deadline()) => {
                if offer.try_expire() {
                    table.record_expiry();
                    tracing::info!(
                        "Offer {} expired without a receiver",
                        offer.secret().redacted()
                    );
                }
            }
            _ = wait_for_state(&mut lifecycle, OfferState::is_terminal) => {}
        }

        let state = wait_for_state(&mut lifecycle, OfferState::is_terminal).await;
        if table.retire(&offer) {
            tracing::debug!(
                "Removed offer {} ({:?}, {} remaining)",
                offer.secret().redacted(),
                state,
                table.len()
            );
        }
    })
}

/// Spawn the periodic rate-limiter sweep.
///
/// Returns a handle that can be used to abort the task.
pub fn spawn_limiter_sweeper(limits: RateLimits, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("Rate limiter sweep started (interval: {}s)", every.as_secs());

        let mut timer = interval(every);
        // The first tick completes immediately.
        timer.tick().await;

        loop {
            timer.tick().await;
            limits.shrink();
            tracing::debug!(
                "Rate limiter sweep: {} offer keys, {} transfer keys",
                limits.offer_keys_count(),
                limits.fulfill_keys_count()
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use crate::offer::Outcome;
    use crate::secrets::Secrets;
    use crate::server::RelayMetrics;
    use std::sync::atomic::Ordering;

    fn table(timeout: Duration) -> (OfferTable, Arc<RelayMetrics>) {
        let metrics = Arc::new(RelayMetrics::default());
        let table = OfferTable::new(Arc::new(Secrets::seeded(3)), timeout, Arc::clone(&metrics));
        (table, metrics)
    }

    #[tokio::test]
    async fn pending_offer_expires_and_is_removed() {
        let (table, metrics) = table(Duration::from_millis(50));
        let offer = table.create("late.txt".to_string(), None).unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(offer.state(), OfferState::Expired);
        assert!(table.is_empty());
        assert!(table.find(offer.secret()).is_none());
        assert_eq!(metrics.offers_expired.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn matched_offer_outlives_its_deadline() {
        let (table, metrics) = table(Duration::from_millis(50));
        let offer = table.create("big.iso".to_string(), None).unwrap();
        assert!(offer.try_match());

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(offer.state(), OfferState::Matched);
        assert_eq!(table.len(), 1);
        assert_eq!(metrics.offers_expired.load(Ordering::Relaxed), 0);

        assert!(offer.complete(Outcome::Delivered));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn completed_offer_is_removed_before_deadline() {
        let (table, _) = table(Duration::from_secs(60));
        let offer = table.create("quick.txt".to_string(), None).unwrap();

        assert!(offer.try_match());
        assert!(offer.complete(Outcome::Failed));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn reaper_finishes_when_offer_is_done() {
        let (table, _) = table(Duration::from_secs(60));
        let offer = table.create(String::new(), None).unwrap();
        let handle = spawn_reaper(table.clone(), Arc::clone(&offer));

        assert!(offer.try_match());
        assert!(offer.complete(Outcome::Delivered));

        tokio::time::timeout(Duration::from_millis(200), handle)
            .await
            .expect("reaper should finish once the offer is done")
            .expect("reaper should not panic");
    }

    #[tokio::test]
    async fn limiter_sweeper_runs_until_aborted() {
        let limits = RateLimits::new(&LimitsConfig::default());
        let handle = spawn_limiter_sweeper(limits, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
