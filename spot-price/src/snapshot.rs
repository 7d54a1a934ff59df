use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use shared::time::TimeStamp;

use crate::fetcher::PriceFetchError;

pub const INDETERMINATE_AGE_MINUTES: i64 = 999;

const PRICE_PER_GRAM_DP: u32 = 4;
const PRICE_IN_QUOTE_UNIT_DP: u32 = 2;
const EXCHANGE_RATE_DP: u32 = 4;

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

// Applied to already-rounded values.
fn positive(what: &str, value: Decimal) -> Result<Decimal, PriceFetchError> {
    if value <= Decimal::ZERO {
        return Err(PriceFetchError::InvalidData(format!(
            "{} must be positive, got {}",
            what, value
        )));
    }
    Ok(value)
}

/// The numeric part of a price. Values are rounded on construction and
/// every figure is strictly positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceFigures")]
pub struct PriceFigures {
    price_per_gram: Decimal,
    price_in_quote_unit: Decimal,
    exchange_rate: Decimal,
}

impl PriceFigures {
    pub fn new(
        price_per_gram: Decimal,
        price_in_quote_unit: Decimal,
        exchange_rate: Decimal,
    ) -> Result<Self, PriceFetchError> {
        Ok(Self {
            price_per_gram: positive(
                "price per gram",
                round(price_per_gram, PRICE_PER_GRAM_DP),
            )?,
            price_in_quote_unit: positive(
                "price per troy ounce",
                round(price_in_quote_unit, PRICE_IN_QUOTE_UNIT_DP),
            )?,
            exchange_rate: positive("exchange rate", round(exchange_rate, EXCHANGE_RATE_DP))?,
        })
    }

    pub fn price_per_gram(&self) -> Decimal {
        self.price_per_gram
    }

    pub fn price_in_quote_unit(&self) -> Decimal {
        self.price_in_quote_unit
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }
}

#[derive(Deserialize)]
struct RawPriceFigures {
    price_per_gram: Decimal,
    price_in_quote_unit: Decimal,
    exchange_rate: Decimal,
}

impl TryFrom<RawPriceFigures> for PriceFigures {
    type Error = PriceFetchError;

    fn try_from(raw: RawPriceFigures) -> Result<Self, Self::Error> {
        PriceFigures::new(raw.price_per_gram, raw.price_in_quote_unit, raw.exchange_rate)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceOrigin {
    Live,
    Cached,
    Fallback,
}

impl std::fmt::Display for PriceOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceOrigin::Live => write!(f, "live"),
            PriceOrigin::Cached => write!(f, "cached"),
            PriceOrigin::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceSnapshot {
    #[serde(flatten)]
    pub figures: PriceFigures,
    pub acquired_at: TimeStamp,
    pub origin: PriceOrigin,
}

impl PriceSnapshot {
    pub fn new(figures: PriceFigures, acquired_at: TimeStamp, origin: PriceOrigin) -> Self {
        Self {
            figures,
            acquired_at,
            origin,
        }
    }

    pub(crate) fn with_origin(mut self, origin: PriceOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn price_per_gram(&self) -> Decimal {
        self.figures.price_per_gram()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceAge {
    Minutes(i64),
    Indeterminate,
}

impl PriceAge {
    /// Age of something acquired at `acquired_at`, rounded to the nearest minute.
    pub fn between(acquired_at: &TimeStamp, now: &TimeStamp) -> Self {
        let secs = acquired_at.duration_until(now).num_seconds().max(0);
        PriceAge::Minutes((secs + 30) / 60)
    }

    pub fn as_minutes(&self) -> i64 {
        match self {
            PriceAge::Minutes(minutes) => *minutes,
            PriceAge::Indeterminate => INDETERMINATE_AGE_MINUTES,
        }
    }
}

impl Serialize for PriceAge {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_minutes())
    }
}

/// What a caller gets back: a snapshot labelled with its provenance and age.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpotPrice {
    #[serde(flatten)]
    pub snapshot: PriceSnapshot,
    #[serde(rename = "age_minutes")]
    pub age: PriceAge,
}

impl SpotPrice {
    pub(crate) fn aged(snapshot: PriceSnapshot, now: &TimeStamp) -> Self {
        let age = PriceAge::between(&snapshot.acquired_at, now);
        Self { snapshot, age }
    }

    pub(crate) fn emergency(figures: PriceFigures, now: TimeStamp) -> Self {
        Self {
            snapshot: PriceSnapshot::new(figures, now, PriceOrigin::Fallback),
            age: PriceAge::Indeterminate,
        }
    }

    pub fn price_per_gram(&self) -> Decimal {
        self.snapshot.price_per_gram()
    }

    pub fn figures(&self) -> &PriceFigures {
        &self.snapshot.figures
    }

    pub fn origin(&self) -> PriceOrigin {
        self.snapshot.origin
    }

    pub fn acquired_at(&self) -> TimeStamp {
        self.snapshot.acquired_at
    }

    pub fn age_minutes(&self) -> i64 {
        self.age.as_minutes()
    }

    pub fn is_degraded(&self) -> bool {
        self.snapshot.origin == PriceOrigin::Fallback
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn figures_are_rounded_once_on_construction() {
        let figures = PriceFigures::new(dec!(71.018755), dec!(2375.2969), dec!(0.92995)).unwrap();

        assert_eq!(figures.price_per_gram(), dec!(71.0188));
        assert_eq!(figures.price_in_quote_unit(), dec!(2375.30));
        assert_eq!(figures.exchange_rate(), dec!(0.9300));
    }

    #[test]
    fn rounds_midpoints_away_from_zero() {
        let figures = PriceFigures::new(dec!(1.00005), dec!(10.125), dec!(0.12345)).unwrap();

        assert_eq!(figures.price_per_gram(), dec!(1.0001));
        assert_eq!(figures.price_in_quote_unit(), dec!(10.13));
        assert_eq!(figures.exchange_rate(), dec!(0.1235));
    }

    #[test]
    fn non_positive_figures_are_invalid() {
        assert!(matches!(
            PriceFigures::new(dec!(0), dec!(1), dec!(1)),
            Err(PriceFetchError::InvalidData(_))
        ));
        assert!(matches!(
            PriceFigures::new(dec!(0.00004), dec!(1), dec!(1)),
            Err(PriceFetchError::InvalidData(_))
        ));
        assert!(matches!(
            PriceFigures::new(dec!(1), dec!(1), dec!(-0.9)),
            Err(PriceFetchError::InvalidData(_))
        ));
    }

    #[test]
    fn figures_rounding_to_zero_are_invalid() {
        assert!(matches!(
            PriceFigures::new(dec!(1), dec!(1), dec!(0.00004)),
            Err(PriceFetchError::InvalidData(_))
        ));
        assert!(matches!(
            PriceFigures::new(dec!(1), dec!(0.004), dec!(1)),
            Err(PriceFetchError::InvalidData(_))
        ));
        assert!(serde_json::from_str::<PriceFigures>(
            r#"{"price_per_gram":"85","price_in_quote_unit":"2800","exchange_rate":"0.00001"}"#
        )
        .is_err());
    }

    #[test]
    fn age_serializes_as_whole_minutes() {
        let acquired = TimeStamp::from(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let figures = PriceFigures::new(dec!(85), dec!(2800), dec!(0.92)).unwrap();
        let now = TimeStamp::from(Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap());

        let aged = SpotPrice::aged(
            PriceSnapshot::new(figures.clone(), acquired, PriceOrigin::Cached),
            &now,
        );
        let emergency = SpotPrice::emergency(figures, now);

        let aged = serde_json::to_value(&aged).unwrap();
        let emergency = serde_json::to_value(&emergency).unwrap();
        assert_eq!(aged["age_minutes"], serde_json::json!(5));
        assert_eq!(emergency["age_minutes"], serde_json::json!(999));
        assert_eq!(emergency["origin"], serde_json::json!("FALLBACK"));
    }

    #[test]
    fn age_rounds_to_nearest_minute() {
        let acquired = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let at = |secs| TimeStamp::from(acquired + Duration::seconds(secs));
        let acquired = TimeStamp::from(acquired);

        assert_eq!(PriceAge::between(&acquired, &at(0)), PriceAge::Minutes(0));
        assert_eq!(PriceAge::between(&acquired, &at(29)), PriceAge::Minutes(0));
        assert_eq!(PriceAge::between(&acquired, &at(30)), PriceAge::Minutes(1));
        assert_eq!(PriceAge::between(&acquired, &at(50 * 60 + 10)), PriceAge::Minutes(50));
        assert_eq!(PriceAge::between(&acquired, &at(-120)), PriceAge::Minutes(0));
        assert_eq!(PriceAge::Indeterminate.as_minutes(), 999);
    }
}
