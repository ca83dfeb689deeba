//! # Domain Models
//!
//! Typed values produced by the normalizers and accepted by the client.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, uppercased ticker |
//! | [`SeriesFunction`] | `TIME_SERIES_*` operation |
//! | [`IntradayInterval`] | Intraday bucket size |
//! | [`BarTimestamp`] | Parsed-or-raw bar key |
//! | [`Bar`] | OHLCV observation |
//! | [`Meta`] | Series metadata |
//! | [`PriceSeries`] | `{ meta, rows }` price response |
//! | [`Article`] | Normalized news item |
//! | [`Sentiment`] | Bullish / Bearish / Neutral label |

mod models;
mod series;
mod symbol;
mod timestamp;

pub use models::{Article, Bar, Meta, PriceSeries, Sentiment};
pub use series::{IntradayInterval, SeriesFunction};
pub use symbol::{base_symbol, Symbol};
pub use timestamp::BarTimestamp;
