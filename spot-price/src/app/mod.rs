use metalprice_client::MetalPriceClientConfig;
use shared::time::{Clock, SystemClock};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::SpotPriceConfig,
    fetcher::{MetalPriceFetcher, PriceFetchError, PriceFetcher},
    price_cache::{self, CacheStatus, PriceCache},
    snapshot::{PriceFigures, PriceOrigin, PriceSnapshot, SpotPrice},
};

/// Serves the spot price: a fresh cached snapshot if there is one, otherwise
/// a single bounded fetch, otherwise the best fallback available.
#[derive(Clone)]
pub struct SpotPriceApp {
    config: SpotPriceConfig,
    cache: PriceCache,
    fetcher: Arc<dyn PriceFetcher>,
    clock: Arc<dyn Clock>,
}

impl SpotPriceApp {
    pub fn init(
        config: SpotPriceConfig,
        client_config: MetalPriceClientConfig,
    ) -> Result<Self, PriceFetchError> {
        let fetcher = MetalPriceFetcher::new(client_config, &config)?;
        Ok(Self::new(config, fetcher))
    }

    pub fn new(config: SpotPriceConfig, fetcher: impl PriceFetcher + 'static) -> Self {
        let app = Self {
            config,
            cache: PriceCache::new(),
            fetcher: Arc::new(fetcher),
            clock: Arc::new(SystemClock),
        };
        app.check_quota();
        app
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_cache(mut self, cache: PriceCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn config(&self) -> &SpotPriceConfig {
        &self.config
    }

    #[instrument(name = "spot_price.current_price", skip(self), fields(origin, error, error.message))]
    pub async fn current_price(&self) -> SpotPrice {
        let price = self.resolve().await;
        tracing::Span::current().record("origin", &tracing::field::display(price.origin()));
        price
    }

    pub async fn cache_status(&self) -> CacheStatus {
        self.cache
            .status(&self.clock.now(), self.config.fresh_for)
            .await
    }

    async fn resolve(&self) -> SpotPrice {
        let now = self.clock.now();
        if self.config.use_synthetic_price {
            debug!("serving synthetic price");
            return SpotPrice::aged(
                PriceSnapshot::new(self.config.synthetic.clone(), now, PriceOrigin::Live),
                &now,
            );
        }

        if let Some(snapshot) = self.cache.read().await {
            if PriceCache::is_fresh(&snapshot, &now, self.config.fresh_for) {
                let price = SpotPrice::aged(snapshot.with_origin(PriceOrigin::Cached), &now);
                debug!(
                    price_per_gram = %price.price_per_gram(),
                    age_minutes = price.age_minutes(),
                    "cache hit"
                );
                return price;
            }
        }

        debug!("cache miss, fetching from upstream");
        match shared::tracing::record_error(|| self.fetch()).await {
            Ok(figures) => {
                let acquired_at = self.clock.now();
                let snapshot = PriceSnapshot::new(figures, acquired_at, PriceOrigin::Live);
                if !self.cache.write(snapshot.clone()).await {
                    debug!("a newer snapshot was cached concurrently, keeping it");
                }
                info!(
                    price_per_gram = %snapshot.price_per_gram(),
                    fresh_for_secs = self.config.fresh_for.as_secs(),
                    "fetched spot price"
                );
                SpotPrice::aged(snapshot, &acquired_at)
            }
            Err(e) => self.fallback(e).await,
        }
    }

    async fn fetch(&self) -> Result<PriceFigures, PriceFetchError> {
        tokio::time::timeout(self.config.fetch_timeout, self.fetcher.fetch())
            .await
            .map_err(|_| PriceFetchError::Timeout(self.config.fetch_timeout))?
    }

    async fn fallback(&self, reason: PriceFetchError) -> SpotPrice {
        let now = self.clock.now();
        match self.cache.read().await {
            Some(snapshot) => {
                let price = SpotPrice::aged(snapshot.with_origin(PriceOrigin::Fallback), &now);
                warn!(
                    price_per_gram = %price.price_per_gram(),
                    age_minutes = price.age_minutes(),
                    reason = %reason,
                    "serving stale cached price"
                );
                price
            }
            None => {
                error!(
                    price_per_gram = %self.config.emergency.price_per_gram(),
                    reason = %reason,
                    "no cached price, serving emergency price"
                );
                SpotPrice::emergency(self.config.emergency.clone(), now)
            }
        }
    }

    fn check_quota(&self) {
        if let Some(quota) = self.config.monthly_request_quota {
            let polls = price_cache::polls_per_month(self.config.fresh_for);
            if polls > quota {
                warn!(
                    polls_per_month = polls,
                    quota,
                    fresh_for_secs = self.config.fresh_for.as_secs(),
                    "freshness window allows more upstream requests than the quota"
                );
            }
        }
    }
}
