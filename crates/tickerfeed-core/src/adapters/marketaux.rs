use std::collections::HashSet;

use serde_json::Value;

use crate::domain::{base_symbol, Article, Sentiment, Symbol};
use crate::request::NewsRequest;

pub const DEFAULT_BASE_URL: &str = "https://api.marketaux.com/v1/news/all";

/// Query parameter carrying the credential.
pub const CREDENTIAL_PARAM: &str = "api_token";

pub const UPSTREAM_NAME: &str = "marketaux";

/// Query parameters for `request`, credential excluded.
pub fn query_params(request: &NewsRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("language", String::from("en")),
        ("countries", String::from("us")),
        ("filter_entities", String::from("true")),
        ("limit", request.limit.to_string()),
    ];
    if let Some(ticker) = &request.ticker {
        params.push(("symbols", ticker.as_str().to_owned()));
    }
    params
}

/// A usable news payload carries a `data` array.
pub fn has_expected_shape(body: &Value) -> bool {
    body.get("data").is_some_and(Value::is_array)
}

/// Normalize the `data` array of a news payload.
///
/// Ticker feeds keep upstream order. General feeds drop repeats by title (url
/// when untitled), keeping the first occurrence in upstream (newest-first)
/// order rather than the last. Both are cut to `request.limit`.
pub fn extract_articles(body: &Value, request: &NewsRequest) -> Vec<Article> {
    let ticker = request.ticker.as_ref().map(Symbol::base);
    let items = body
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let articles = items.iter().map(|item| normalize_article(item, ticker));
    if ticker.is_some() {
        return articles.take(request.limit).collect();
    }

    let mut seen = HashSet::new();
    articles
        .filter(|article| match article.dedup_key() {
            Some(key) => seen.insert(key.to_owned()),
            None => true,
        })
        .take(request.limit)
        .collect()
}

/// Map one upstream news item onto [`Article`].
///
/// Sentiment comes from the score of the entity whose base symbol matches
/// `ticker` (case-insensitive). A missing or null score there falls back to
/// the first entity's score.
pub fn normalize_article(item: &Value, ticker: Option<&str>) -> Article {
    let text = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    };
    let entities = item
        .get("entities")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let matched = ticker.and_then(|ticker| {
        entities.iter().find(|entity| {
            entity
                .get("symbol")
                .and_then(Value::as_str)
                .is_some_and(|symbol| base_symbol(symbol).eq_ignore_ascii_case(ticker))
        })
    });
    let score = matched
        .and_then(entity_score)
        .or_else(|| entities.first().and_then(entity_score))
        .and_then(sentiment_score);

    Article {
        title: text("title"),
        summary: text("snippet").or_else(|| text("description")),
        url: text("url"),
        source: text("source"),
        published_at: text("published_at"),
        sentiment: score.map(Sentiment::from_score),
    }
}

fn entity_score(entity: &Value) -> Option<&Value> {
    entity.get("sentiment_score").filter(|score| !score.is_null())
}

fn sentiment_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    score.filter(|score| score.is_finite())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(title: &str, url: &str, entities: Value) -> Value {
        json!({
            "title": title,
            "description": format!("{title} description"),
            "snippet": "",
            "url": url,
            "source": "news.test",
            "published_at": "2024-01-02T15:04:05.000000Z",
            "entities": entities
        })
    }

    #[test]
    fn ticker_params_include_symbols_filter() {
        let request = NewsRequest::new(Some(Symbol::parse("aapl").expect("valid")), 3).expect("valid");
        let params = query_params(&request);

        assert!(params.contains(&("symbols", String::from("AAPL"))));
        assert!(params.contains(&("limit", String::from("3"))));
        assert!(params.contains(&("filter_entities", String::from("true"))));
    }

    #[test]
    fn sentiment_prefers_matching_entity_by_base_symbol() {
        let raw = item(
            "Shopify rallies",
            "https://news.test/shop",
            json!([
                { "symbol": "AMZN", "sentiment_score": -0.6 },
                { "symbol": "shop.to", "sentiment_score": "0.42" }
            ]),
        );

        let article = normalize_article(&raw, Some("SHOP"));

        assert_eq!(article.sentiment, Some(Sentiment::Bullish));
        assert_eq!(article.summary.as_deref(), Some("Shopify rallies description"));
        assert_eq!(article.published_at.as_deref(), Some("2024-01-02T15:04:05.000000Z"));
    }

    #[test]
    fn sentiment_falls_back_to_first_entity_or_absent() {
        let raw = item("Markets slide", "https://news.test/a", json!([{ "symbol": "SPY", "sentiment_score": -0.3 }]));
        assert_eq!(normalize_article(&raw, Some("IBM")).sentiment, Some(Sentiment::Bearish));
        assert_eq!(normalize_article(&raw, None).sentiment, Some(Sentiment::Bearish));

        let unscored = item("Quiet day", "https://news.test/b", json!([{ "symbol": "SPY", "sentiment_score": "n/a" }]));
        assert_eq!(normalize_article(&unscored, None).sentiment, None);

        let bare = json!({ "title": "No entities" });
        let article = normalize_article(&bare, None);
        assert_eq!(article.sentiment, None);
        assert_eq!(article.url, None);
    }

    #[test]
    fn matched_entity_without_score_falls_back_to_first_entity_score() {
        let missing = item(
            "Shopify mentioned",
            "https://news.test/shop-2",
            json!([
                { "symbol": "AMZN", "sentiment_score": 0.6 },
                { "symbol": "SHOP.TO" }
            ]),
        );
        assert_eq!(normalize_article(&missing, Some("SHOP")).sentiment, Some(Sentiment::Bullish));

        let null = item(
            "Shopify mentioned again",
            "https://news.test/shop-3",
            json!([
                { "symbol": "AMZN", "sentiment_score": -0.5 },
                { "symbol": "SHOP.TO", "sentiment_score": null }
            ]),
        );
        assert_eq!(normalize_article(&null, Some("SHOP")).sentiment, Some(Sentiment::Bearish));
    }

    #[test]
    fn suffixed_ticker_matches_entity_by_root() {
        let body = json!({
            "data": [item(
                "Shopify in Toronto",
                "https://news.test/shop-4",
                json!([
                    { "symbol": "AMZN", "sentiment_score": -0.6 },
                    { "symbol": "SHOP", "sentiment_score": 0.3 }
                ]),
            )]
        });
        let request = NewsRequest::new(Some(Symbol::parse("shop.to").expect("valid")), 1).expect("valid");

        let articles = extract_articles(&body, &request);

        assert_eq!(articles[0].sentiment, Some(Sentiment::Bullish));
    }

    #[test]
    fn general_news_is_deduplicated_and_limited() {
        let body = json!({
            "data": [
                item("One", "https://news.test/1", json!([])),
                item("One", "https://news.test/1-dup", json!([])),
                item("Two", "https://news.test/2", json!([])),
                item("Three", "https://news.test/3", json!([]))
            ]
        });
        let request = NewsRequest::new(None, 2).expect("valid");

        let titles: Vec<_> = extract_articles(&body, &request)
            .into_iter()
            .filter_map(|article| article.title)
            .collect();

        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn ticker_news_keeps_order_and_limit() {
        let body = json!({
            "data": [
                item("A", "https://news.test/a", json!([])),
                item("A", "https://news.test/a2", json!([])),
                item("B", "https://news.test/b", json!([]))
            ]
        });
        let request = NewsRequest::new(Some(Symbol::parse("IBM").expect("valid")), 2).expect("valid");

        let urls: Vec<_> = extract_articles(&body, &request)
            .into_iter()
            .filter_map(|article| article.url)
            .collect();

        assert_eq!(urls, vec!["https://news.test/a", "https://news.test/a2"]);
    }

    #[test]
    fn shape_check_requires_data_array() {
        assert!(has_expected_shape(&json!({ "data": [] })));
        assert!(!has_expected_shape(&json!({ "data": {} })));
        assert!(!has_expected_shape(&json!({ "meta": {} })));
    }
}
