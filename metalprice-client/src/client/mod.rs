mod config;
mod error;
mod metalprice_response;
mod primitives;

use reqwest::{header::ACCEPT, Client as ReqwestClient, Response};
use tracing::instrument;

pub use config::*;
pub use error::*;
use metalprice_response::*;
pub use primitives::*;

#[derive(Clone, Debug)]
pub struct MetalPriceClient {
    client: ReqwestClient,
    config: MetalPriceClientConfig,
}

impl MetalPriceClient {
    pub fn new(config: MetalPriceClientConfig) -> Result<Self, MetalPriceClientError> {
        let client = ReqwestClient::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .build()
            .map_err(MetalPriceClientError::Reqwest)?;
        Ok(Self { client, config })
    }

    /// Fetches the latest rates of `currencies` against the configured base.
    /// Fails before touching the network when no api key is configured.
    #[instrument(
        name = "metalprice_client.latest_rates",
        skip(self),
        fields(base = %self.config.base_currency, error, error.message),
        err
    )]
    pub async fn latest_rates(
        &self,
        currencies: &[&str],
    ) -> Result<LatestRates, MetalPriceClientError> {
        let api_key = match self.config.api_key {
            Some(ref key) if !key.is_blank() => key,
            _ => {
                shared::tracing::insert_error_fields(MetalPriceClientError::MissingApiKey);
                return Err(MetalPriceClientError::MissingApiKey);
            }
        };

        let response = self
            .client
            .get(self.url_for_path("/latest"))
            .header(ACCEPT, "application/json")
            .query(&[
                ("api_key", api_key.expose()),
                ("base", self.config.base_currency.as_str()),
                ("currencies", currencies.join(",").as_str()),
            ])
            .send()
            .await
            .map_err(|e| MetalPriceClientError::from_reqwest(e, self.config.timeout))?;

        self.extract_response_data(response).await
    }

    fn url_for_path(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn extract_response_data(
        &self,
        response: Response,
    ) -> Result<LatestRates, MetalPriceClientError> {
        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| MetalPriceClientError::from_reqwest(e, self.config.timeout))?;

        if !status.is_success() {
            let msg = serde_json::from_str::<MetalPriceResponse>(&response_text)
                .ok()
                .and_then(|data| data.error)
                .map(|error| error.describe())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or_default()
                        .to_string()
                });
            return Err(MetalPriceClientError::UnexpectedStatus {
                status: status.as_u16(),
                msg,
            });
        }

        let data = serde_json::from_str::<MetalPriceResponse>(&response_text)?;
        if !data.success {
            let (code, msg) = data
                .error
                .map(|error| (error.status_code, error.describe()))
                .unwrap_or((None, response_text));
            return Err(MetalPriceClientError::UnsuccessfulResponse { code, msg });
        }

        Ok(LatestRates::new(
            data.base
                .unwrap_or_else(|| self.config.base_currency.clone()),
            data.timestamp,
            data.rates,
        ))
    }
}
