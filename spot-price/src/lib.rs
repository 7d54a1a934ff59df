#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

pub mod app;
mod config;
mod convert;
pub mod fetcher;
pub mod price_cache;
mod snapshot;
pub mod valuation;

pub use app::SpotPriceApp;
pub use config::*;
pub use fetcher::{MetalPriceFetcher, PriceFetchError, PriceFetcher};
pub use price_cache::{CacheStatus, PriceCache};
pub use snapshot::*;
