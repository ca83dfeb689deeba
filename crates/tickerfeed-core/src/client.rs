//! Fetch orchestrator: validation, cache, rotation and normalization behind
//! two calls.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::{alphavantage, marketaux};
use crate::cache::{CacheMode, CacheStore};
use crate::config::ClientConfig;
use crate::credential::CredentialPool;
use crate::domain::{Article, PriceSeries, Symbol};
use crate::error::{FetchError, ValidationError};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::request::{NewsRequest, PriceRequest, RequestKey};
use crate::rotation::{PayloadShape, Rotator, UpstreamQuery};
use crate::stats::{FetchStats, FetchStatsSnapshot};
use crate::throttling::RateGate;

/// Rate-gated, key-rotating client for the price and news upstreams.
///
/// Each instance owns its credential pools, rate windows and caches, so
/// independent clients never share state.
pub struct MarketDataClient {
    prices: Rotator,
    news: Rotator,
    price_cache: CacheStore<RequestKey, PriceSeries>,
    news_cache: CacheStore<RequestKey, Vec<Article>>,
    cache_ttl: Duration,
    demo_symbols: Option<Vec<String>>,
    stats: Arc<FetchStats>,
}

impl MarketDataClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let stats = Arc::new(FetchStats::new());
        let (price_pool, news_pool) = if config.demo_mode {
            (CredentialPool::demo(), CredentialPool::demo())
        } else {
            (config.price_credentials.clone(), config.news_credentials.clone())
        };

        let build = |name: &'static str,
                     base_url: &str,
                     credential_param: &'static str,
                     pool: CredentialPool| {
            Rotator::new(name, base_url, credential_param, pool, Arc::clone(&http_client))
                .with_gate(RateGate::per_minute(config.max_calls_per_minute))
                .with_retry(config.retry)
                .with_rotate_on_daily_cap(config.rotate_on_daily_cap)
                .with_timeout_ms(config.http_timeout_ms)
                .with_stats(Arc::clone(&stats))
        };

        let prices = build(
            alphavantage::UPSTREAM_NAME,
            &config.price_base_url,
            alphavantage::CREDENTIAL_PARAM,
            price_pool,
        );
        let news = build(
            marketaux::UPSTREAM_NAME,
            &config.news_base_url,
            marketaux::CREDENTIAL_PARAM,
            news_pool,
        );

        Self {
            prices,
            news,
            price_cache: CacheStore::new(),
            news_cache: CacheStore::new(),
            cache_ttl: config.cache_ttl,
            demo_symbols: config.demo_mode.then(|| config.demo_symbols.clone()),
            stats,
        }
    }

    /// Fetch a normalized price series.
    ///
    /// `function` is one of `TIME_SERIES_{INTRADAY,DAILY,WEEKLY,MONTHLY}`;
    /// `interval` is required for intraday and ignored otherwise.
    pub async fn get_prices(
        &self,
        function: &str,
        symbol: &str,
        interval: Option<&str>,
    ) -> Result<PriceSeries, FetchError> {
        let request = PriceRequest::parse(function, symbol, interval)?;
        self.fetch_prices(&request, CacheMode::Use).await
    }

    pub async fn fetch_prices(
        &self,
        request: &PriceRequest,
        mode: CacheMode,
    ) -> Result<PriceSeries, FetchError> {
        self.check_demo_symbol(&request.symbol)?;

        let key = request.cache_key();
        self.price_cache
            .get_or_fetch(key, self.cache_ttl, mode, || async {
                let query = UpstreamQuery {
                    params: alphavantage::query_params(request),
                    expects: PayloadShape::PriceSeries,
                };
                let body = self.prices.fetch_with_rotation(&query).await?;
                let (meta, rows) = alphavantage::normalize(&body);
                info!(
                    symbol = %request.symbol,
                    function = %request.function,
                    rows = rows.len(),
                    "fetched price series"
                );
                Ok::<_, FetchError>(PriceSeries::new(meta, rows))
            })
            .await
    }

    /// Fetch normalized news. No ticker means general market news.
    pub async fn get_news(
        &self,
        ticker: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Article>, FetchError> {
        let request = NewsRequest::parse(ticker, limit)?;
        self.fetch_news(&request, CacheMode::Use).await
    }

    pub async fn fetch_news(
        &self,
        request: &NewsRequest,
        mode: CacheMode,
    ) -> Result<Vec<Article>, FetchError> {
        if let Some(ticker) = &request.ticker {
            self.check_demo_symbol(ticker)?;
        }

        let key = request.cache_key();
        self.news_cache
            .get_or_fetch(key, self.cache_ttl, mode, || async {
                let query = UpstreamQuery {
                    params: marketaux::query_params(request),
                    expects: PayloadShape::NewsFeed,
                };
                let body = self.news.fetch_with_rotation(&query).await?;
                let articles = marketaux::extract_articles(&body, request);
                info!(
                    ticker = request.ticker.as_ref().map_or("general", Symbol::as_str),
                    articles = articles.len(),
                    "fetched news"
                );
                Ok::<_, FetchError>(articles)
            })
            .await
    }

    /// Counters across both upstreams and both caches.
    pub fn stats(&self) -> FetchStatsSnapshot {
        FetchStatsSnapshot {
            cache_hits: self.price_cache.hits() + self.news_cache.hits(),
            cache_misses: self.price_cache.misses() + self.news_cache.misses(),
            ..self.stats.snapshot()
        }
    }

    /// Drop every cached response.
    pub async fn clear_cache(&self) {
        self.price_cache.clear().await;
        self.news_cache.clear().await;
    }

    pub fn is_demo(&self) -> bool {
        self.demo_symbols.is_some()
    }

    fn check_demo_symbol(&self, symbol: &Symbol) -> Result<(), ValidationError> {
        let Some(allowed) = &self.demo_symbols else {
            return Ok(());
        };
        if allowed.iter().any(|candidate| candidate == symbol.as_str()) {
            return Ok(());
        }
        debug!(symbol = %symbol, "symbol outside demo allow-list");
        Err(ValidationError::NotInDemoAllowList {
            symbol: symbol.as_str().to_owned(),
        })
    }
}
