use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Longest exchange or share-class suffix accepted after the `.`
/// (`BRK.B`, `SHOP.TO`, `TSCO.LON`, `RELIANCE.BSE`).
const MAX_SUFFIX_LEN: usize = 4;

/// Canonical ticker symbol: uppercase root, optional `.` suffix.
///
/// The root may carry `-` separated share classes (`BRK-B`). At most one `.`
/// is allowed, so [`Symbol::base`] is always the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        let Some(first) = normalized.chars().next() else {
            return Err(ValidationError::EmptySymbol);
        };

        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }
        if !first.is_ascii_alphabetic() {
            return Err(ValidationError::SymbolInvalidStart { ch: first });
        }
        if let Some((index, ch)) = normalized
            .char_indices()
            .find(|&(_, ch)| !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '-'))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        let malformed = |reason| ValidationError::SymbolMalformed {
            symbol: normalized.clone(),
            reason,
        };
        let (root, suffix) = match normalized.split_once('.') {
            Some((root, suffix)) => (root, Some(suffix)),
            None => (normalized.as_str(), None),
        };

        if root.ends_with('-') || root.contains("--") {
            return Err(malformed("dangling share-class separator"));
        }
        if let Some(suffix) = suffix {
            if suffix.is_empty() || suffix.len() > MAX_SUFFIX_LEN {
                return Err(malformed("exchange suffix must be 1 to 4 characters"));
            }
            if suffix.contains(['.', '-']) {
                return Err(malformed("only one exchange suffix is allowed"));
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Root without the exchange suffix, e.g. `SHOP` for `SHOP.TO`.
    pub fn base(&self) -> &str {
        base_symbol(&self.0)
    }
}

/// Portion of a raw upstream ticker before the first `.`.
pub fn base_symbol(raw: &str) -> &str {
    raw.split_once('.').map_or(raw, |(root, _)| root)
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_and_share_class_forms_are_accepted() {
        for (input, canonical, base) in [
            (" ibm ", "IBM", "IBM"),
            ("shop.to", "SHOP.TO", "SHOP"),
            ("tsco.lon", "TSCO.LON", "TSCO"),
            ("brk-b", "BRK-B", "BRK-B"),
            ("brk.b", "BRK.B", "BRK"),
        ] {
            let symbol = Symbol::parse(input).expect("symbol should parse");
            assert_eq!(symbol.as_str(), canonical);
            assert_eq!(symbol.base(), base);
        }
    }

    #[test]
    fn rejects_bad_start_and_characters() {
        assert!(matches!(
            Symbol::parse("1IBM"),
            Err(ValidationError::SymbolInvalidStart { ch: '1' })
        ));
        assert!(matches!(
            Symbol::parse("IBM$"),
            Err(ValidationError::SymbolInvalidChar { ch: '$', index: 3 })
        ));
        assert_eq!(Symbol::parse("   "), Err(ValidationError::EmptySymbol));
    }

    #[test]
    fn rejects_malformed_suffixes() {
        for input in ["SHOP.", "SHOP.TO.X", "RDS.A-B", "BRK-", "BRK--B", "IBM.NYSEX"] {
            assert!(
                matches!(Symbol::parse(input), Err(ValidationError::SymbolMalformed { .. })),
                "{input} should be malformed"
            );
        }
    }

    #[test]
    fn base_symbol_strips_upstream_suffix() {
        assert_eq!(base_symbol("shop.to"), "shop");
        assert_eq!(base_symbol("AAPL"), "AAPL");
    }

    #[test]
    fn deserializing_revalidates() {
        let symbol: Symbol = serde_json::from_str("\"msft\"").expect("valid");
        assert_eq!(symbol.as_str(), "MSFT");
        assert!(serde_json::from_str::<Symbol>("\"MSFT..X\"").is_err());
    }
}
