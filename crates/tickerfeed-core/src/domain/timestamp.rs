use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

/// Bar timestamp as the provider sent it: parsed when the key matched a known
/// layout, otherwise the raw key.
///
/// Provider timestamps carry no offset; they are local to the time zone named
/// in the series metadata and are kept naive.
///
/// Ordering: values of the same variant compare naturally. Across variants
/// every `Parsed` sorts before every `Raw`. That cross-variant order is an
/// artifact of the enum layout, not a statement about which instant is
/// earlier; callers mixing both should not rely on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BarTimestamp {
    Parsed(PrimitiveDateTime),
    Raw(String),
}

impl BarTimestamp {
    /// Parse a series key: `YYYY-MM-DD HH:MM:SS` first, then `YYYY-MM-DD`
    /// (midnight), else keep the raw string.
    pub fn parse(raw: &str) -> Self {
        if let Ok(parsed) =
            PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        {
            return Self::Parsed(parsed);
        }

        if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
            return Self::Parsed(date.midnight());
        }

        Self::Raw(raw.to_owned())
    }

    pub const fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn as_datetime(&self) -> Option<PrimitiveDateTime> {
        match self {
            Self::Parsed(value) => Some(*value),
            Self::Raw(_) => None,
        }
    }

    /// ISO-8601 rendering (`YYYY-MM-DDTHH:MM:SS`) for parsed values, the raw
    /// key otherwise.
    pub fn to_iso_string(&self) -> String {
        match self {
            Self::Parsed(value) => value
                .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
                .unwrap_or_else(|_| value.to_string()),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

impl Display for BarTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl Serialize for BarTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for BarTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        if let Ok(parsed) = PrimitiveDateTime::parse(
            &value,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        ) {
            return Ok(Self::Parsed(parsed));
        }
        Ok(Self::parse(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_intraday_key() {
        let ts = BarTimestamp::parse("2024-01-03 15:55:00");
        assert_eq!(ts, BarTimestamp::Parsed(datetime!(2024-01-03 15:55:00)));
    }

    #[test]
    fn parses_date_only_key_as_midnight() {
        let ts = BarTimestamp::parse("2024-01-03");
        assert_eq!(ts.as_datetime(), Some(datetime!(2024-01-03 00:00:00)));
        assert_eq!(ts.to_iso_string(), "2024-01-03T00:00:00");
    }

    #[test]
    fn keeps_unparseable_key_raw() {
        let ts = BarTimestamp::parse("Q1 2024");
        assert_eq!(ts, BarTimestamp::Raw(String::from("Q1 2024")));
        assert!(!ts.is_parsed());
        assert_eq!(ts.to_string(), "Q1 2024");
    }

    #[test]
    fn parsed_values_sort_before_raw_values() {
        let mut values = vec![
            BarTimestamp::parse("later"),
            BarTimestamp::parse("2024-01-02"),
            BarTimestamp::parse("2024-01-01"),
        ];
        values.sort();

        assert_eq!(values[0].to_iso_string(), "2024-01-01T00:00:00");
        assert_eq!(values[1].to_iso_string(), "2024-01-02T00:00:00");
        assert_eq!(values[2], BarTimestamp::Raw(String::from("later")));
    }

    #[test]
    fn serializes_as_iso_string() {
        let json = serde_json::to_string(&BarTimestamp::parse("2024-01-03 09:30:00"))
            .expect("serializable");
        assert_eq!(json, "\"2024-01-03T09:30:00\"");

        let back: BarTimestamp = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back, BarTimestamp::Parsed(datetime!(2024-01-03 09:30:00)));
    }
}
