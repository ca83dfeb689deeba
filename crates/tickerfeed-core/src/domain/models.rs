use serde::{Deserialize, Serialize};

use crate::domain::BarTimestamp;

/// One OHLCV observation. Missing price fields are `NaN` and a missing volume
/// is `0`; a malformed bar never fails the whole series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: BarTimestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Descriptive series metadata. Never used for control flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub symbol: String,
    pub last_refreshed: String,
    pub interval: Option<String>,
    pub time_zone: Option<String>,
    pub info: Option<String>,
}

/// Normalized price response: metadata plus bars sorted oldest to newest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub meta: Meta,
    pub rows: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(meta: Meta, rows: Vec<Bar>) -> Self {
        Self { meta, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sentiment label derived from an entity sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// Scores above this are bullish; below its negation, bearish.
    pub const THRESHOLD: f64 = 0.15;

    pub fn from_score(score: f64) -> Self {
        if score > Self::THRESHOLD {
            Self::Bullish
        } else if score < -Self::THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }
}

/// Normalized news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    /// Publication time exactly as the provider reported it.
    pub published_at: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl Article {
    /// Identity used when de-duplicating a feed: the title, else the url.
    pub fn dedup_key(&self) -> Option<&str> {
        self.title.as_deref().or(self.url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_thresholds_are_exclusive() {
        assert_eq!(Sentiment::from_score(0.16), Sentiment::Bullish);
        assert_eq!(Sentiment::from_score(0.15), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(-0.15), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(-0.2), Sentiment::Bearish);
    }

    #[test]
    fn dedup_key_prefers_title() {
        let mut article = Article {
            title: None,
            summary: None,
            url: Some(String::from("https://news.test/a")),
            source: None,
            published_at: None,
            sentiment: None,
        };
        assert_eq!(article.dedup_key(), Some("https://news.test/a"));

        article.title = Some(String::from("Headline"));
        assert_eq!(article.dedup_key(), Some("Headline"));
    }
}
