mod status;

use shared::time::TimeStamp;
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;

use crate::snapshot::PriceSnapshot;
pub use status::*;

/// Single-slot store for the last successfully fetched snapshot.
#[derive(Clone, Default)]
pub struct PriceCache {
    inner: Arc<RwLock<Option<PriceSnapshot>>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> Option<PriceSnapshot> {
        self.inner.read().await.clone()
    }

    /// Replaces the slot. A snapshot acquired before the one already held is
    /// discarded and `false` is returned.
    pub async fn write(&self, snapshot: PriceSnapshot) -> bool {
        let mut slot = self.inner.write().await;
        if let Some(ref current) = *slot {
            if current.acquired_at > snapshot.acquired_at {
                return false;
            }
        }
        *slot = Some(snapshot);
        true
    }

    pub async fn reset(&self) {
        *self.inner.write().await = None;
    }

    pub fn is_fresh(snapshot: &PriceSnapshot, now: &TimeStamp, window: Duration) -> bool {
        match snapshot.acquired_at.duration_until(now).to_std() {
            Ok(age) => age < window,
            // acquired in the future, clock went backwards
            Err(_) => true,
        }
    }

    pub async fn status(&self, now: &TimeStamp, window: Duration) -> CacheStatus {
        CacheStatus::new(self.read().await.as_ref(), now, window)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::snapshot::{PriceFigures, PriceOrigin};

    fn at(minute: u32) -> TimeStamp {
        TimeStamp::from(Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap())
    }

    fn snapshot(price: rust_decimal::Decimal, acquired_at: TimeStamp) -> PriceSnapshot {
        PriceSnapshot::new(
            PriceFigures::new(price, dec!(2375.30), dec!(0.93)).unwrap(),
            acquired_at,
            PriceOrigin::Live,
        )
    }

    #[tokio::test]
    async fn starts_empty_and_holds_one_snapshot() {
        let cache = PriceCache::new();
        assert!(cache.read().await.is_none());

        assert!(cache.write(snapshot(dec!(71.0218), at(0))).await);
        assert!(cache.write(snapshot(dec!(72.5), at(10))).await);

        assert_eq!(cache.read().await, Some(snapshot(dec!(72.5), at(10))));

        cache.reset().await;
        assert!(cache.read().await.is_none());
    }

    #[tokio::test]
    async fn older_snapshot_does_not_replace_newer() {
        let cache = PriceCache::new();
        cache.write(snapshot(dec!(72.5), at(10))).await;

        assert!(!cache.write(snapshot(dec!(71.0218), at(5))).await);
        assert_eq!(cache.read().await.unwrap().price_per_gram(), dec!(72.5));
    }

    #[test]
    fn freshness_window_is_exclusive() {
        let window = Duration::from_secs(45 * 60);
        let snapshot = snapshot(dec!(71.0218), at(0));

        assert!(PriceCache::is_fresh(&snapshot, &at(0), window));
        assert!(PriceCache::is_fresh(&snapshot, &at(44), window));
        assert!(!PriceCache::is_fresh(&snapshot, &at(45), window));
        assert!(!PriceCache::is_fresh(&snapshot, &at(59), window));
    }
}
