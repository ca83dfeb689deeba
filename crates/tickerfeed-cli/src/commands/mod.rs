mod news;
mod prices;

use serde_json::Value;
use tracing::info;

use tickerfeed_core::{CacheMode, ClientConfig, MarketDataClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Build a client from the environment and run the selected command.
pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let mut config = ClientConfig::from_env()?;
    if cli.demo {
        config.demo_mode = true;
    }
    let client = MarketDataClient::new(config);
    let mode = if cli.refresh {
        CacheMode::Refresh
    } else {
        CacheMode::Use
    };

    let result = match &cli.command {
        Command::Prices(args) => prices::run(args, &client, mode).await,
        Command::News(args) => news::run(args, &client, mode).await,
    };

    if cli.stats {
        let stats = client.stats();
        info!(
            upstream_calls = stats.upstream_calls,
            succeeded = stats.succeeded,
            throttled = stats.throttled,
            daily_capped = stats.daily_capped,
            failed = stats.failed,
            rotations = stats.rotations,
            backoffs = stats.backoffs,
            total_backoff_ms = stats.total_backoff_ms,
            cache_hits = stats.cache_hits,
            cache_misses = stats.cache_misses,
            "fetch stats"
        );
    }

    result
}
