use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use std::{fmt, str::FromStr};

#[derive(Error, Debug)]
#[error("unknown purity '{0}', expected one of 24K, 22K, 21K, 18K, 14K, 10K, 9K, 8K")]
pub struct UnknownPurity(String);

/// Karat grades with their fineness and the share of spot value a fair buyer pays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Purity {
    K24,
    K22,
    K21,
    K18,
    K14,
    K10,
    K9,
    K8,
}

impl Purity {
    pub const ALL: [Purity; 8] = [
        Purity::K24,
        Purity::K22,
        Purity::K21,
        Purity::K18,
        Purity::K14,
        Purity::K10,
        Purity::K9,
        Purity::K8,
    ];

    pub fn karats(&self) -> u8 {
        match self {
            Purity::K24 => 24,
            Purity::K22 => 22,
            Purity::K21 => 21,
            Purity::K18 => 18,
            Purity::K14 => 14,
            Purity::K10 => 10,
            Purity::K9 => 9,
            Purity::K8 => 8,
        }
    }

    pub fn fineness(&self) -> Decimal {
        match self {
            Purity::K24 => dec!(0.999),
            Purity::K22 => dec!(0.917),
            Purity::K21 => dec!(0.875),
            Purity::K18 => dec!(0.750),
            Purity::K14 => dec!(0.585),
            Purity::K10 => dec!(0.417),
            Purity::K9 => dec!(0.375),
            Purity::K8 => dec!(0.333),
        }
    }

    pub fn target_percent(&self) -> Decimal {
        match self {
            Purity::K24 => dec!(0.90),
            Purity::K22 | Purity::K21 | Purity::K18 | Purity::K14 => dec!(0.81),
            Purity::K10 | Purity::K9 => dec!(0.78),
            Purity::K8 => dec!(0.75),
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{}K ({}%)",
            self.karats(),
            (self.fineness() * Decimal::ONE_HUNDRED).round_dp(1)
        )
    }
}

impl fmt::Display for Purity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.karats())
    }
}

impl FromStr for Purity {
    type Err = UnknownPurity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let karats = s.trim().trim_end_matches(['K', 'k']);
        Purity::ALL
            .into_iter()
            .find(|p| karats.parse::<u8>().ok() == Some(p.karats()))
            .ok_or_else(|| UnknownPurity(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Valuation {
    pub purity: Purity,
    pub weight_grams: Decimal,
    pub pure_content_grams: Decimal,
    pub spot_price_per_gram_at_purity: Decimal,
    pub spot_value: Decimal,
    pub target_value: Decimal,
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Values `weight_grams` of `purity` at a spot price per gram of pure metal.
/// Returns `None` unless both weight and price are positive.
pub fn calculate_value(
    weight_grams: Decimal,
    purity: Purity,
    spot_price_per_gram: Decimal,
) -> Option<Valuation> {
    if weight_grams <= Decimal::ZERO || spot_price_per_gram <= Decimal::ZERO {
        return None;
    }
    let pure_content_grams = weight_grams * purity.fineness();
    let spot_value = pure_content_grams * spot_price_per_gram;

    Some(Valuation {
        purity,
        weight_grams,
        pure_content_grams,
        spot_price_per_gram_at_purity: spot_price_per_gram * purity.fineness(),
        spot_value: round2(spot_value),
        target_value: round2(spot_value * purity.target_percent()),
    })
}
