use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetalPriceClientError {
    #[error("MetalPriceClientError - MissingApiKey")]
    MissingApiKey,
    #[error("MetalPriceClientError - Timeout: no response within {0:?}")]
    Timeout(std::time::Duration),
    #[error("MetalPriceClientError - Reqwest: {0}")]
    Reqwest(reqwest::Error),
    #[error("MetalPriceClientError - UnexpectedStatus: {status} - {msg:?}")]
    UnexpectedStatus { status: u16, msg: String },
    #[error("MetalPriceClientError - UnsuccessfulResponse: {code:?} - {msg:?}")]
    UnsuccessfulResponse { code: Option<u32>, msg: String },
    #[error("MetalPriceClientError - SerdeJson: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error("MetalPriceClientError - MissingRate: {0}")]
    MissingRate(String),
    #[error("MetalPriceClientError - NonNumericRate: {code} = {value}")]
    NonNumericRate { code: String, value: String },
    #[error("MetalPriceClientError - NonPositiveRate: {code} = {value}")]
    NonPositiveRate { code: String, value: Decimal },
}

impl MetalPriceClientError {
    pub(super) fn from_reqwest(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            MetalPriceClientError::Timeout(timeout)
        } else {
            MetalPriceClientError::Reqwest(err)
        }
    }
}
