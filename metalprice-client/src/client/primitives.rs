use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::{secret_wrapper, time::TimeStamp};

use std::{collections::HashMap, str::FromStr};

use super::error::MetalPriceClientError;

secret_wrapper! { ApiKey }

impl ApiKey {
    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

/// Rates as reported by the provider: units of each code per one unit of `base`.
#[derive(Debug, Clone)]
pub struct LatestRates {
    pub base: String,
    pub timestamp: Option<TimeStamp>,
    rates: HashMap<String, Value>,
}

impl LatestRates {
    pub(super) fn new(base: String, timestamp: Option<i64>, rates: HashMap<String, Value>) -> Self {
        Self {
            base,
            timestamp: timestamp
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                .map(TimeStamp::from),
            rates,
        }
    }

    /// Looks up a rate and checks that it is a strictly positive number.
    pub fn rate(&self, code: &str) -> Result<Decimal, MetalPriceClientError> {
        let raw = match self.rates.get(code) {
            None | Some(Value::Null) => {
                return Err(MetalPriceClientError::MissingRate(code.to_string()))
            }
            Some(raw) => raw,
        };
        let value = match raw {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        }
        .ok_or_else(|| MetalPriceClientError::NonNumericRate {
            code: code.to_string(),
            value: raw.to_string(),
        })?;
        if value <= Decimal::ZERO {
            return Err(MetalPriceClientError::NonPositiveRate {
                code: code.to_string(),
                value,
            });
        }
        Ok(value)
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
