use serde::Serialize;
use shared::time::TimeStamp;
use std::time::Duration;

use crate::snapshot::{PriceAge, PriceSnapshot};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const DAYS_PER_MONTH: u32 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub has_snapshot: bool,
    pub age_minutes: Option<i64>,
    pub expires_in_minutes: Option<i64>,
    /// Worst-case upstream requests if every window ends in a miss.
    pub polls_per_day: u32,
    pub polls_per_month: u32,
}

impl CacheStatus {
    pub(super) fn new(snapshot: Option<&PriceSnapshot>, now: &TimeStamp, window: Duration) -> Self {
        let polls_per_day = polls_per_day(window);
        let (age_minutes, expires_in_minutes) = match snapshot {
            Some(snapshot) => {
                let age_secs = snapshot.acquired_at.duration_until(now).num_seconds().max(0);
                let remaining_secs = (window.as_secs() as i64 - age_secs).max(0);
                (
                    Some(PriceAge::between(&snapshot.acquired_at, now).as_minutes()),
                    Some((remaining_secs + 30) / 60),
                )
            }
            None => (None, None),
        };
        Self {
            has_snapshot: snapshot.is_some(),
            age_minutes,
            expires_in_minutes,
            polls_per_day,
            polls_per_month: polls_per_month(window),
        }
    }
}

pub fn polls_per_day(window: Duration) -> u32 {
    let window_secs = window.as_secs().max(1);
    let polls = (SECONDS_PER_DAY + window_secs / 2) / window_secs;
    u32::try_from(polls).unwrap_or(u32::MAX)
}

pub fn polls_per_month(window: Duration) -> u32 {
    polls_per_day(window).saturating_mul(DAYS_PER_MONTH)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::snapshot::{PriceFigures, PriceOrigin};

    #[test]
    fn default_window_stays_under_monthly_quota() {
        let window = Duration::from_secs(45 * 60);

        assert_eq!(polls_per_day(window), 32);
        assert_eq!(CacheStatus::new(None, &TimeStamp::now(), window).polls_per_month, 960);
    }

    #[test]
    fn empty_status() {
        let status = CacheStatus::new(None, &TimeStamp::now(), Duration::from_secs(2700));

        assert!(!status.has_snapshot);
        assert_eq!(status.age_minutes, None);
        assert_eq!(status.expires_in_minutes, None);
    }

    #[test]
    fn age_and_expiry() {
        let acquired = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let snapshot = PriceSnapshot::new(
            PriceFigures::new(dec!(71.0218), dec!(2375.30), dec!(0.93)).unwrap(),
            TimeStamp::from(acquired),
            PriceOrigin::Live,
        );
        let window = Duration::from_secs(2700);

        let now = TimeStamp::from(acquired + ChronoDuration::minutes(20));
        let status = CacheStatus::new(Some(&snapshot), &now, window);
        assert!(status.has_snapshot);
        assert_eq!(status.age_minutes, Some(20));
        assert_eq!(status.expires_in_minutes, Some(25));

        let now = TimeStamp::from(acquired + ChronoDuration::minutes(90));
        let status = CacheStatus::new(Some(&snapshot), &now, window);
        assert_eq!(status.age_minutes, Some(90));
        assert_eq!(status.expires_in_minutes, Some(0));
    }
}
