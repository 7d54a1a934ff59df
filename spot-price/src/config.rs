use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::snapshot::PriceFigures;

pub const TROY_OUNCE_IN_GRAMS: Decimal = dec!(31.1034768);

#[serde_with::serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SpotPriceConfig {
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_fresh_for")]
    pub fresh_for: Duration,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: Duration,
    #[serde(default = "default_commodity")]
    pub commodity: String,
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,
    #[serde(default = "default_troy_ounce_in_grams")]
    pub troy_ounce_in_grams: Decimal,
    #[serde(default)]
    pub use_synthetic_price: bool,
    #[serde(default = "default_synthetic")]
    pub synthetic: PriceFigures,
    #[serde(default = "default_emergency")]
    pub emergency: PriceFigures,
    #[serde(default)]
    pub monthly_request_quota: Option<u32>,
}

impl Default for SpotPriceConfig {
    fn default() -> Self {
        Self {
            fresh_for: default_fresh_for(),
            fetch_timeout: default_fetch_timeout(),
            commodity: default_commodity(),
            quote_currency: default_quote_currency(),
            troy_ounce_in_grams: default_troy_ounce_in_grams(),
            use_synthetic_price: false,
            synthetic: default_synthetic(),
            emergency: default_emergency(),
            monthly_request_quota: None,
        }
    }
}

// upstream refreshes every 30 min and allows 1000 requests / month
fn default_fresh_for() -> Duration {
    Duration::from_secs(45 * 60)
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_commodity() -> String {
    "XAU".to_string()
}

fn default_quote_currency() -> String {
    "EUR".to_string()
}

fn default_troy_ounce_in_grams() -> Decimal {
    TROY_OUNCE_IN_GRAMS
}

fn default_synthetic() -> PriceFigures {
    PriceFigures::new(dec!(84.50), dec!(2750.00), dec!(0.95)).expect("bad default synthetic price")
}

fn default_emergency() -> PriceFigures {
    PriceFigures::new(dec!(85.00), dec!(2800.00), dec!(0.92)).expect("bad default emergency price")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: SpotPriceConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.fresh_for, Duration::from_secs(2700));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.commodity, "XAU");
        assert_eq!(config.quote_currency, "EUR");
        assert_eq!(config.troy_ounce_in_grams, dec!(31.1034768));
        assert!(!config.use_synthetic_price);
        assert_eq!(config.emergency.price_per_gram(), dec!(85.00));
        assert_eq!(config.synthetic.price_per_gram(), dec!(84.50));
    }

    #[test]
    fn rejects_non_positive_emergency_price() {
        let res = serde_json::from_str::<SpotPriceConfig>(
            r#"{"emergency": {"price_per_gram": "0", "price_in_quote_unit": "2800", "exchange_rate": "0.92"}}"#,
        );

        assert!(res.is_err());
    }
}
