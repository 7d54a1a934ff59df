use metalprice_client::MetalPriceClientError;
use thiserror::Error;

use std::time::Duration;

#[derive(Error, Debug)]
pub enum PriceFetchError {
    #[error("PriceFetchError - Config: {0}")]
    Config(String),
    #[error("PriceFetchError - Timeout: no price within {0:?}")]
    Timeout(Duration),
    #[error("PriceFetchError - Http: {0}")]
    Http(String),
    #[error("PriceFetchError - Parse: {0}")]
    Parse(String),
    #[error("PriceFetchError - InvalidData: {0}")]
    InvalidData(String),
}

impl From<MetalPriceClientError> for PriceFetchError {
    fn from(err: MetalPriceClientError) -> Self {
        match err {
            MetalPriceClientError::MissingApiKey => {
                PriceFetchError::Config("metalprice api key is not configured".to_string())
            }
            MetalPriceClientError::Timeout(duration) => PriceFetchError::Timeout(duration),
            MetalPriceClientError::Reqwest(_)
            | MetalPriceClientError::UnexpectedStatus { .. }
            | MetalPriceClientError::UnsuccessfulResponse { .. } => {
                PriceFetchError::Http(err.to_string())
            }
            MetalPriceClientError::Deserialization(_) => PriceFetchError::Parse(err.to_string()),
            MetalPriceClientError::MissingRate(_)
            | MetalPriceClientError::NonNumericRate { .. }
            | MetalPriceClientError::NonPositiveRate { .. } => {
                PriceFetchError::InvalidData(err.to_string())
            }
        }
    }
}
