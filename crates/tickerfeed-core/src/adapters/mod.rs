//! Upstream-specific request parameters and payload normalizers.
//!
//! | Upstream | Serves | Credential parameter |
//! |----------|--------|----------------------|
//! | [`alphavantage`] | `TIME_SERIES_*` price bars | `apikey` |
//! | [`marketaux`] | news articles with entity sentiment | `api_token` |

pub mod alphavantage;
pub mod marketaux;
