use serde::{Deserialize, Serialize};

use std::time::Duration;

use super::primitives::ApiKey;

#[serde_with::serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MetalPriceClientConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<ApiKey>,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl Default for MetalPriceClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            base_currency: default_base_currency(),
            timeout: default_timeout(),
        }
    }
}

fn default_url() -> String {
    "https://api.metalpriceapi.com/v1".to_string()
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}
