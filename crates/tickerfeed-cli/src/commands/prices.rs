use serde_json::Value;

use tickerfeed_core::{CacheMode, FetchError, MarketDataClient, PriceRequest};

use crate::cli::PricesArgs;
use crate::error::CliError;

pub async fn run(
    args: &PricesArgs,
    client: &MarketDataClient,
    mode: CacheMode,
) -> Result<Value, CliError> {
    let request = PriceRequest::parse(&args.function, &args.symbol, args.interval.as_deref())
        .map_err(FetchError::from)?;
    let series = client.fetch_prices(&request, mode).await?;
    Ok(serde_json::to_value(series)?)
}
