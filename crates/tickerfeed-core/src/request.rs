//! Validated request payloads and the cache keys derived from them.
//!
//! Every check here runs before any upstream call is issued.

use crate::domain::{IntradayInterval, SeriesFunction, Symbol};
use crate::error::ValidationError;

/// Request payload for the price endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub function: SeriesFunction,
    pub symbol: Symbol,
    /// Present only for [`SeriesFunction::Intraday`].
    pub interval: Option<IntradayInterval>,
}

impl PriceRequest {
    /// Build a request, dropping the interval for non-intraday functions.
    pub fn new(
        function: SeriesFunction,
        symbol: Symbol,
        interval: Option<IntradayInterval>,
    ) -> Result<Self, ValidationError> {
        let interval = if function.requires_interval() {
            Some(interval.ok_or(ValidationError::MissingInterval)?)
        } else {
            None
        };
        Ok(Self {
            function,
            symbol,
            interval,
        })
    }

    /// Parse caller-supplied strings. An empty interval counts as absent.
    pub fn parse(
        function: &str,
        symbol: &str,
        interval: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let function = function.parse::<SeriesFunction>()?;
        let interval = interval.map(str::trim).filter(|value| !value.is_empty());

        let interval = match (function.requires_interval(), interval) {
            (true, None) => return Err(ValidationError::MissingInterval),
            (true, Some(value)) => Some(value.parse::<IntradayInterval>()?),
            (false, _) => None,
        };

        Self::new(function, Symbol::parse(symbol)?, interval)
    }

    pub fn cache_key(&self) -> RequestKey {
        RequestKey::Prices {
            function: self.function,
            symbol: self.symbol.clone(),
            interval: self.interval,
        }
    }
}

/// Request payload for the news endpoint. No ticker means general market news.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub ticker: Option<Symbol>,
    pub limit: usize,
}

impl NewsRequest {
    pub fn new(ticker: Option<Symbol>, limit: usize) -> Result<Self, ValidationError> {
        if limit == 0 {
            return Err(ValidationError::ZeroLimit);
        }
        Ok(Self { ticker, limit })
    }

    pub fn parse(ticker: Option<&str>, limit: usize) -> Result<Self, ValidationError> {
        let ticker = ticker
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Symbol::parse)
            .transpose()?;
        Self::new(ticker, limit)
    }

    pub fn cache_key(&self) -> RequestKey {
        RequestKey::News {
            ticker: self.ticker.clone(),
            limit: self.limit,
        }
    }
}

/// Canonical request signature used as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Prices {
        function: SeriesFunction,
        symbol: Symbol,
        interval: Option<IntradayInterval>,
    },
    News {
        ticker: Option<Symbol>,
        limit: usize,
    },
}
