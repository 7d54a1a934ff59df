use anyhow::Context;
use metalprice_client::{ApiKey, MetalPriceClientConfig};
use serde::{Deserialize, Serialize};
use spot_price::SpotPriceConfig;

use std::path::Path;

use super::tracing::TracingConfig;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub spot_price: SpotPriceConfig,
    #[serde(default)]
    pub metalprice: MetalPriceClientConfig,
}

pub struct EnvOverride {
    pub metalprice_api_key: String,
}

impl Config {
    pub fn from_path(
        path: Option<impl AsRef<Path>>,
        EnvOverride { metalprice_api_key }: EnvOverride,
    ) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let config_file =
                    std::fs::read_to_string(path).context("Couldn't read config file")?;
                Self::from_yaml(&config_file)?
            }
            None => Config::default(),
        };

        if !metalprice_api_key.is_empty() {
            config.metalprice.api_key = Some(ApiKey::from(metalprice_api_key));
        }

        Ok(config)
    }

    fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents).context("Couldn't parse config file")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_partial_yaml() {
        let config = Config::from_yaml(
            r#"
tracing:
  json: true
spot_price:
  fresh_for: 3600
  fetch_timeout: 5
  monthly_request_quota: 1000
  emergency:
    price_per_gram: 90.5
    price_in_quote_unit: 3000
    exchange_rate: 0.9
metalprice:
  url: http://localhost:8080/v1
"#,
        )
        .unwrap();

        assert!(config.tracing.json);
        assert_eq!(config.spot_price.fresh_for.as_secs(), 3600);
        assert_eq!(config.spot_price.fetch_timeout.as_secs(), 5);
        assert_eq!(config.spot_price.monthly_request_quota, Some(1000));
        assert_eq!(config.spot_price.emergency.price_per_gram(), dec!(90.5));
        assert_eq!(config.spot_price.quote_currency, "EUR");
        assert_eq!(config.metalprice.url, "http://localhost:8080/v1");
        assert_eq!(config.metalprice.base_currency, "USD");
        assert!(config.metalprice.api_key.is_none());
    }

    #[test]
    fn env_api_key_overrides_file() {
        let config = Config::from_path(
            None::<&str>,
            EnvOverride {
                metalprice_api_key: "from-env".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            config.metalprice.api_key.as_ref().map(|key| key.expose()),
            Some("from-env")
        );
    }

    #[test]
    fn empty_env_keeps_file_value() {
        let config = Config::from_path(
            None::<&str>,
            EnvOverride {
                metalprice_api_key: String::new(),
            },
        )
        .unwrap();

        assert!(config.metalprice.api_key.is_none());
    }
}
