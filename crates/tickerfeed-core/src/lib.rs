//! # Tickerfeed Core
//!
//! Resilient client for rate-limited, key-throttled market data and news
//! upstreams.
//!
//! ## Overview
//!
//! - **Rate gate** holding each credential under a per-minute ceiling
//! - **Credential rotation** with bounded backoff on minute throttles
//! - **Throttle classifier** separating parameter errors, minute throttles
//!   and daily caps in 2xx bodies
//! - **Normalizers** projecting upstream JSON onto typed bars and articles
//! - **TTL cache** serving repeated requests without upstream calls
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Upstream parameters and payload normalizers |
//! | [`cache`] | TTL cache keyed by request signature |
//! | [`classify`] | Body classification |
//! | [`client`] | [`MarketDataClient`] orchestrator |
//! | [`config`] | Environment-driven configuration |
//! | [`credential`] | Masked credentials and pools |
//! | [`domain`] | Symbols, bars, articles |
//! | [`error`] | Error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`request`] | Validated requests and cache keys |
//! | [`retry`] | Backoff strategies |
//! | [`rotation`] | Credential rotation and retry |
//! | [`stats`] | Upstream outcome counters |
//! | [`throttling`] | Sliding-window rate gate |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickerfeed_core::{ClientConfig, MarketDataClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MarketDataClient::new(ClientConfig::from_env()?);
//!
//!     let series = client.get_prices("TIME_SERIES_DAILY", "IBM", None).await?;
//!     for bar in &series.rows {
//!         println!("{} close={:.2}", bar.timestamp, bar.close);
//!     }
//!
//!     let news = client.get_news(Some("IBM"), 3).await?;
//!     println!("{} articles", news.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ MarketDataClient │── validate ──▶ ParameterError
//! └────────┬─────────┘
//!          │ miss
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │    TTL Cache     │     │    Rate Gate     │
//! └────────┬─────────┘     └────────▲─────────┘
//!          │                        │ admit
//!          ▼                        │
//! ┌──────────────────┐     ┌────────┴─────────┐
//! │     Rotator      │────▶│   HTTP Client    │
//! └────────┬─────────┘     └──────────────────┘
//!          │ classify
//!          ▼
//! ┌──────────────────┐
//! │   Normalizers    │
//! └──────────────────┘
//! ```
//!
//! ## Errors
//!
//! Only [`FetchError`] crosses the client boundary:
//!
//! ```rust
//! use tickerfeed_core::FetchError;
//!
//! fn describe(error: &FetchError) -> &'static str {
//!     match error {
//!         FetchError::Parameter(_) => "fix the request",
//!         FetchError::DailyCap { .. } => "try again tomorrow",
//!         FetchError::Exhausted { .. } => "every credential failed",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! Credentials only appear on the wire. Logs and `Debug` output show a
//! masked suffix.

pub mod adapters;
pub mod cache;
pub mod classify;
pub mod client;
pub mod config;
pub mod credential;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod request;
pub mod retry;
pub mod rotation;
pub mod stats;
pub mod throttling;

// Cache
pub use cache::{CacheMode, CacheStore};

// Classification
pub use classify::{classify, Classification};

// Client
pub use client::MarketDataClient;

// Configuration
pub use config::ClientConfig;

// Credentials
pub use credential::{Credential, CredentialPool, DEMO_CREDENTIAL};

// Domain types
pub use domain::{
    base_symbol, Article, Bar, BarTimestamp, IntradayInterval, Meta, PriceSeries, SeriesFunction,
    Sentiment, Symbol,
};

// Errors
pub use error::{AttemptError, ConfigError, FetchError, ValidationError};

// HTTP
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Requests
pub use request::{NewsRequest, PriceRequest, RequestKey};

// Retry and rotation
pub use retry::{Backoff, RetryConfig};
pub use rotation::{PayloadShape, Rotator, UpstreamQuery};

// Stats
pub use stats::{FetchStats, FetchStatsSnapshot};

// Throttling
pub use throttling::RateGate;
