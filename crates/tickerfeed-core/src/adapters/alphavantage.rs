use serde_json::{Map, Value};

use crate::domain::{Bar, BarTimestamp, Meta};
use crate::request::PriceRequest;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Query parameter carrying the credential.
pub const CREDENTIAL_PARAM: &str = "apikey";

pub const UPSTREAM_NAME: &str = "alphavantage";

const META_KEY: &str = "Meta Data";
const SERIES_KEY_PREFIX: &str = "Time Series";

/// Query parameters for `request`, credential excluded.
pub fn query_params(request: &PriceRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("function", request.function.as_str().to_owned()),
        ("symbol", request.symbol.as_str().to_owned()),
    ];
    if let Some(interval) = request.interval {
        params.push(("interval", interval.as_str().to_owned()));
    }
    params
}

/// A usable price payload carries a `Meta Data` object.
pub fn has_expected_shape(body: &Value) -> bool {
    body.get(META_KEY).is_some_and(Value::is_object)
}

/// Project a raw time-series payload onto [`Meta`] and bars sorted oldest first.
///
/// A missing or empty series block yields no bars. Unparseable prices become
/// `NaN` and an unparseable volume becomes `0`.
pub fn normalize(body: &Value) -> (Meta, Vec<Bar>) {
    let meta = body
        .get(META_KEY)
        .and_then(Value::as_object)
        .map(simplify_meta)
        .unwrap_or_default();

    let series = body.as_object().and_then(|fields| {
        fields
            .iter()
            .find(|(key, _)| key.starts_with(SERIES_KEY_PREFIX))
            .and_then(|(_, value)| value.as_object())
    });

    let mut bars: Vec<Bar> = series
        .into_iter()
        .flatten()
        .map(|(key, fields)| clean_bar(key, fields))
        .collect();
    bars.sort_by(|left, right| left.timestamp.cmp(&right.timestamp));

    (meta, bars)
}

fn simplify_meta(meta: &Map<String, Value>) -> Meta {
    let text = |key: &str| meta.get(key).and_then(Value::as_str).map(str::to_owned);
    Meta {
        symbol: text("2. Symbol").unwrap_or_default(),
        last_refreshed: text("3. Last Refreshed").unwrap_or_default(),
        interval: text("4. Interval"),
        time_zone: text("6. Time Zone").or_else(|| text("5. Time Zone")),
        info: text("1. Information"),
    }
}

fn clean_bar(key: &str, fields: &Value) -> Bar {
    let price = |name: &str| fields.get(name).and_then(as_f64).unwrap_or(f64::NAN);
    Bar {
        timestamp: BarTimestamp::parse(key),
        open: price("1. open"),
        high: price("2. high"),
        low: price("3. low"),
        close: price("4. close"),
        volume: fields.get("5. volume").map_or(0, volume),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// Volumes sometimes arrive as "123.0".
fn volume(value: &Value) -> u64 {
    if let Some(whole) = value.as_u64() {
        return whole;
    }
    match as_f64(value) {
        Some(parsed) if parsed.is_finite() && parsed > 0.0 => parsed.trunc() as u64,
        _ => 0,
    }
}
