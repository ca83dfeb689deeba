use serde::Serialize;
use serde_json::Value;

use tickerfeed_core::{Article, CacheMode, FetchError, MarketDataClient, NewsRequest};

use crate::cli::NewsArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct NewsResponseData {
    ticker: Option<String>,
    articles: Vec<Article>,
}

pub async fn run(
    args: &NewsArgs,
    client: &MarketDataClient,
    mode: CacheMode,
) -> Result<Value, CliError> {
    let request = NewsRequest::parse(args.ticker.as_deref(), args.limit).map_err(FetchError::from)?;
    let articles = client.fetch_news(&request, mode).await?;

    let data = NewsResponseData {
        ticker: request.ticker.map(String::from),
        articles,
    };
    Ok(serde_json::to_value(data)?)
}
