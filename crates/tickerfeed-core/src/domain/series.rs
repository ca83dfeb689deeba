use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Time-series operations the price upstream understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesFunction {
    #[serde(rename = "TIME_SERIES_INTRADAY")]
    Intraday,
    #[serde(rename = "TIME_SERIES_DAILY")]
    Daily,
    #[serde(rename = "TIME_SERIES_WEEKLY")]
    Weekly,
    #[serde(rename = "TIME_SERIES_MONTHLY")]
    Monthly,
}

impl SeriesFunction {
    pub const ALL: [Self; 4] = [Self::Intraday, Self::Daily, Self::Weekly, Self::Monthly];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intraday => "TIME_SERIES_INTRADAY",
            Self::Daily => "TIME_SERIES_DAILY",
            Self::Weekly => "TIME_SERIES_WEEKLY",
            Self::Monthly => "TIME_SERIES_MONTHLY",
        }
    }

    pub const fn requires_interval(self) -> bool {
        matches!(self, Self::Intraday)
    }
}

impl Display for SeriesFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesFunction {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|function| function.as_str() == value.trim())
            .ok_or_else(|| ValidationError::UnsupportedFunction {
                value: value.to_owned(),
            })
    }
}

/// Intraday bucket sizes accepted by the price upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntradayInterval {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "60min")]
    SixtyMinutes,
}

impl IntradayInterval {
    pub const ALL: [Self; 5] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinutes => "5min",
            Self::FifteenMinutes => "15min",
            Self::ThirtyMinutes => "30min",
            Self::SixtyMinutes => "60min",
        }
    }
}

impl Display for IntradayInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntradayInterval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidInterval {
                value: value.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_functions() {
        let function = SeriesFunction::from_str("TIME_SERIES_WEEKLY").expect("must parse");
        assert_eq!(function, SeriesFunction::Weekly);
        assert!(!function.requires_interval());
        assert!(SeriesFunction::Intraday.requires_interval());
    }

    #[test]
    fn rejects_unknown_function() {
        let err = SeriesFunction::from_str("GLOBAL_QUOTE").expect_err("must fail");
        assert!(matches!(err, ValidationError::UnsupportedFunction { .. }));
    }

    #[test]
    fn parses_interval_case_insensitively() {
        let interval = IntradayInterval::from_str("5MIN").expect("must parse");
        assert_eq!(interval, IntradayInterval::FiveMinutes);

        let err = IntradayInterval::from_str("2min").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidInterval { .. }));
    }
}
