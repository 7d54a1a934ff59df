use serde::Deserialize;
use serde_json::Value;

use std::collections::HashMap;

#[derive(Deserialize, Debug)]
pub struct MetalPriceResponse {
    pub success: bool,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub rates: HashMap<String, Value>,
    #[serde(default)]
    pub error: Option<MetalPriceErrorResponse>,
}

#[derive(Deserialize, Debug)]
pub struct MetalPriceErrorResponse {
    #[serde(rename = "statusCode", default)]
    pub status_code: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl MetalPriceErrorResponse {
    pub fn describe(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.info.clone())
            .unwrap_or_default()
    }
}
