//! AssetSymbol - Validated ticker symbols for asset classes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing symbols
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("Empty asset symbol")]
    EmptyCode,

    #[error("Asset symbol too long (max {max} chars): {symbol}")]
    TooLong { symbol: String, max: usize },

    #[error("Invalid asset symbol format: {0}")]
    InvalidFormat(String),
}

/// Ticker symbol of an asset class (e.g. `DFL`, `USDT`)
///
/// Symbols are uppercased, alphanumeric and at most
/// [`AssetSymbol::MAX_LENGTH`] characters.
///
/// # Examples
/// ```
/// use dasset_core::AssetSymbol;
///
/// let sym: AssetSymbol = "dfl".parse().unwrap();
/// assert_eq!(sym.as_str(), "DFL");
/// assert!("BAD-SYM".parse::<AssetSymbol>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetSymbol(String);

impl AssetSymbol {
    /// Maximum symbol length
    pub const MAX_LENGTH: usize = 10;

    /// Returns the symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetSymbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(SymbolError::EmptyCode);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SymbolError::TooLong {
                symbol: s,
                max: Self::MAX_LENGTH,
            });
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SymbolError::InvalidFormat(s));
        }

        Ok(Self(s))
    }
}

impl TryFrom<String> for AssetSymbol {
    type Error = SymbolError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AssetSymbol> for String {
    fn from(symbol: AssetSymbol) -> Self {
        symbol.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        let sym: AssetSymbol = "usdt".parse().unwrap();
        assert_eq!(sym.as_str(), "USDT");
        assert_eq!(sym.to_string(), "USDT");
    }

    #[test]
    fn test_empty_code_error() {
        assert_eq!("  ".parse::<AssetSymbol>(), Err(SymbolError::EmptyCode));
    }

    #[test]
    fn test_too_long_error() {
        let result = "VERYLONGSYMBOL".parse::<AssetSymbol>();
        assert!(matches!(result, Err(SymbolError::TooLong { max: 10, .. })));
    }

    #[test]
    fn test_invalid_format_error() {
        let result = "BTC-USD".parse::<AssetSymbol>();
        assert!(matches!(result, Err(SymbolError::InvalidFormat(_))));
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Result<AssetSymbol, _> = serde_json::from_str("\"no spaces\"");
        assert!(parsed.is_err());

        let ok: AssetSymbol = serde_json::from_str("\"dfl\"").unwrap();
        assert_eq!(ok.as_str(), "DFL");
    }
}
