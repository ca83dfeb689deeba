//! CLI argument definitions for tickerfeed.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `prices` | Fetch a normalized `TIME_SERIES_*` price series |
//! | `news` | Fetch normalized news with sentiment labels |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--demo` | `false` | Use the demo credential and allow-list |
//! | `--refresh` | `false` | Skip the cache read and refetch |
//! | `--stats` | `false` | Log upstream counters after the command |
//!
//! # Examples
//!
//! ```bash
//! tickerfeed prices IBM --pretty
//! tickerfeed prices IBM --function TIME_SERIES_INTRADAY --interval 5min
//! tickerfeed news --ticker AAPL --limit 3
//! tickerfeed news --limit 5 --demo
//! ```

use clap::{Args, Parser, Subcommand};

/// Rate-gated, key-rotating market data and news client.
///
/// Credentials are read from `TICKERFEED_ALPHAVANTAGE_KEYS` and
/// `TICKERFEED_MARKETAUX_KEYS` (comma-separated), or from a `.env` file.
#[derive(Debug, Parser)]
#[command(
    name = "tickerfeed",
    author,
    version,
    about = "Rate-gated, key-rotating market data and news client"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Force demo mode: the single `demo` credential and the demo symbol
    /// allow-list, regardless of `TICKERFEED_DEMO_MODE`.
    #[arg(long, global = true, default_value_t = false)]
    pub demo: bool,

    /// Ignore any cached response and refetch from the upstream.
    #[arg(long, global = true, default_value_t = false)]
    pub refresh: bool,

    /// Log upstream call, throttle and cache counters when done.
    #[arg(long, global = true, default_value_t = false)]
    pub stats: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a price series, oldest bar first.
    ///
    /// # Examples
    ///
    ///   tickerfeed prices IBM
    ///   tickerfeed prices IBM --function TIME_SERIES_WEEKLY
    ///   tickerfeed prices MSFT --function TIME_SERIES_INTRADAY --interval 15min
    Prices(PricesArgs),

    /// Fetch news articles. Omit `--ticker` for general market news.
    ///
    /// # Examples
    ///
    ///   tickerfeed news --ticker AAPL
    ///   tickerfeed news --limit 10
    News(NewsArgs),
}

/// Arguments for the `prices` command.
#[derive(Debug, Args)]
pub struct PricesArgs {
    /// Market symbol (e.g., IBM, MSFT, TSCO.LON).
    pub symbol: String,

    /// Series function: TIME_SERIES_INTRADAY, TIME_SERIES_DAILY,
    /// TIME_SERIES_WEEKLY or TIME_SERIES_MONTHLY.
    #[arg(long, default_value = "TIME_SERIES_DAILY")]
    pub function: String,

    /// Intraday interval: 1min, 5min, 15min, 30min or 60min. Required for
    /// TIME_SERIES_INTRADAY, ignored otherwise.
    #[arg(long)]
    pub interval: Option<String>,
}

/// Arguments for the `news` command.
#[derive(Debug, Args)]
pub struct NewsArgs {
    /// Restrict to articles mentioning this ticker.
    #[arg(long)]
    pub ticker: Option<String>,

    /// Maximum number of articles (must be greater than zero).
    #[arg(long, default_value_t = 3)]
    pub limit: usize,
}
