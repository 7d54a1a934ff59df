mod error;

use async_trait::async_trait;
use metalprice_client::{MetalPriceClient, MetalPriceClientConfig};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::{config::SpotPriceConfig, convert, snapshot::PriceFigures};
pub use error::*;

#[async_trait]
pub trait PriceFetcher: Send + Sync {
    async fn fetch(&self) -> Result<PriceFigures, PriceFetchError>;
}

pub struct MetalPriceFetcher {
    client: MetalPriceClient,
    commodity: String,
    quote_currency: String,
    troy_ounce_in_grams: Decimal,
}

impl MetalPriceFetcher {
    pub fn new(
        client_config: MetalPriceClientConfig,
        config: &SpotPriceConfig,
    ) -> Result<Self, PriceFetchError> {
        let client = MetalPriceClient::new(client_config)
            .map_err(|e| PriceFetchError::Config(e.to_string()))?;
        Ok(Self {
            client,
            commodity: config.commodity.clone(),
            quote_currency: config.quote_currency.clone(),
            troy_ounce_in_grams: config.troy_ounce_in_grams,
        })
    }
}

#[async_trait]
impl PriceFetcher for MetalPriceFetcher {
    #[instrument(
        name = "spot_price.metal_price_fetcher.fetch",
        skip(self),
        fields(commodity = %self.commodity, quote = %self.quote_currency)
    )]
    async fn fetch(&self) -> Result<PriceFigures, PriceFetchError> {
        let rates = self
            .client
            .latest_rates(&[self.commodity.as_str(), self.quote_currency.as_str()])
            .await?;
        convert::figures_from_rates(
            &rates,
            &self.commodity,
            &self.quote_currency,
            self.troy_ounce_in_grams,
        )
    }
}
