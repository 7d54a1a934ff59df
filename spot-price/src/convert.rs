use metalprice_client::LatestRates;
use rust_decimal::Decimal;

use crate::{fetcher::PriceFetchError, snapshot::PriceFigures};

/// Derives per-gram figures from the provider's rates, both quoted per one unit
/// of the base currency: `commodity_rate` troy ounces and `quote_rate` units of
/// the target currency.
pub(crate) fn derive_figures(
    commodity_rate: Decimal,
    quote_rate: Decimal,
    troy_ounce_in_grams: Decimal,
) -> Result<PriceFigures, PriceFetchError> {
    if commodity_rate <= Decimal::ZERO || quote_rate <= Decimal::ZERO {
        return Err(PriceFetchError::InvalidData(format!(
            "rates must be positive, got commodity={} quote={}",
            commodity_rate, quote_rate
        )));
    }
    let overflow = || {
        PriceFetchError::InvalidData(format!(
            "rates out of range: commodity={} quote={}",
            commodity_rate, quote_rate
        ))
    };

    let price_base_per_ounce = Decimal::ONE
        .checked_div(commodity_rate)
        .ok_or_else(overflow)?;
    let price_quote_per_ounce = price_base_per_ounce
        .checked_mul(quote_rate)
        .ok_or_else(overflow)?;
    let price_per_gram = price_quote_per_ounce
        .checked_div(troy_ounce_in_grams)
        .ok_or_else(overflow)?;

    PriceFigures::new(price_per_gram, price_base_per_ounce, quote_rate)
}

pub(crate) fn figures_from_rates(
    rates: &LatestRates,
    commodity: &str,
    quote_currency: &str,
    troy_ounce_in_grams: Decimal,
) -> Result<PriceFigures, PriceFetchError> {
    let commodity_rate = rates.rate(commodity)?;
    let quote_rate = rates.rate(quote_currency)?;
    derive_figures(commodity_rate, quote_rate, troy_ounce_in_grams)
}
