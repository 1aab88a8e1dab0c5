//! Validated string primitives used across Coinbase payloads.
//!
//! Coinbase encodes money, sizes and rates as decimal strings. These newtypes
//! keep the raw text (so it can be echoed back to the API unchanged)
//! while guaranteeing the format at deserialization time.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoinbaseError;

macro_rules! validated_string {
    ($(#[$meta:meta])* $name:ident, $check:path, $expected:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Get the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Parse as an exact decimal.
            pub fn to_decimal(&self) -> Result<Decimal, CoinbaseError> {
                Decimal::from_str(&self.0).map_err(|e| {
                    CoinbaseError::InvalidValue(format!("{:?} is not a decimal: {e}", self.0))
                })
            }

            /// Parse as a float.
            pub fn to_f64(&self) -> Result<f64, CoinbaseError> {
                self.0.parse().map_err(|_| {
                    CoinbaseError::InvalidValue(format!("{:?} is not a number", self.0))
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoinbaseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if $check(&value) {
                    Ok(Self(value))
                } else {
                    Err(CoinbaseError::InvalidValue(format!(
                        concat!("{:?}: ", $expected),
                        value
                    )))
                }
            }
        }

        impl FromStr for $name {
            type Err = CoinbaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

validated_string!(
    /// A plain numeric string such as `"123"`, `"-0.5"` or `"3.14"`.
    ///
    /// Exponents, signs other than a leading `-`, separators and surrounding
    /// whitespace are rejected.
    NumericString,
    is_numeric,
    "must be a numeric string"
);

validated_string!(
    /// A strictly positive numeric string without leading zeros.
    PositiveNumericString,
    is_positive_numeric,
    "must be a positive numeric string"
);

validated_string!(
    /// A numeric string between 0 and 100 inclusive.
    Percent,
    is_percent,
    "must be a numeric string between 0 and 100"
);

validated_string!(
    /// A product identifier such as `BTC-USD`.
    ProductId,
    is_product_id,
    "product must be uppercase BASE-QUOTE (e.g. BTC-USD)"
);

impl ProductId {
    /// Convert a bare symbol into a product id, appending `currency` when no
    /// quote is present (`"btc"` becomes `"BTC-USD"`).
    pub fn from_symbol(product: &str, currency: &str) -> Result<Self, CoinbaseError> {
        if product.is_empty() {
            return Err(CoinbaseError::InvalidValue(
                "missing product symbol".to_string(),
            ));
        }
        let mut product_id = product.to_uppercase();
        if !product_id.contains('-') {
            product_id = format!("{product_id}-{}", currency.to_uppercase());
        }
        product_id.parse()
    }

    /// The base currency (`BTC` in `BTC-USD`).
    pub fn base(&self) -> &str {
        self.0.split_once('-').map(|(base, _)| base).unwrap_or(&self.0)
    }

    /// The quote currency (`USD` in `BTC-USD`).
    pub fn quote(&self) -> &str {
        self.0.split_once('-').map(|(_, quote)| quote).unwrap_or("")
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn split_number(s: &str) -> Option<(&str, Option<&str>)> {
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    if !all_digits(int) || frac.is_some_and(|f| !all_digits(f)) {
        return None;
    }
    Some((int, frac))
}

fn is_numeric(s: &str) -> bool {
    split_number(s.strip_prefix('-').unwrap_or(s)).is_some()
}

fn is_positive_numeric(s: &str) -> bool {
    match split_number(s) {
        Some(("0", Some(frac))) => frac.bytes().any(|b| b != b'0'),
        Some((int, _)) => !int.starts_with('0'),
        None => false,
    }
}

fn is_percent(s: &str) -> bool {
    is_numeric(s)
        && s
            .parse::<f64>()
            .is_ok_and(|n| n.is_finite() && (0.0..=100.0).contains(&n))
}

fn is_product_id(s: &str) -> bool {
    let part = |p: &str| {
        !p.is_empty()
            && p.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            && p.bytes().any(|b| b.is_ascii_uppercase())
    };
    s.split_once('-')
        .is_some_and(|(base, quote)| part(base) && part(quote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_string_accepts_plain_numbers() {
        for valid in ["0", "-0", "1", "-1", "123", "-123", "0.0", "10.25", "-0.5", "0001"] {
            assert!(valid.parse::<NumericString>().is_ok(), "{valid}");
        }
    }

    #[test]
    fn test_numeric_string_rejects_malformed() {
        let invalid = [
            "", " ", " 1", "1 ", "\t1", "\n1", "1\n", "1_000", "1,000", "1e3", "+1", ".123",
            "-.123", "1.", "1.2.3", "--1", "1-2", "abc", "123abc", "abc123", "💯", "1💯",
            "１２３",
        ];
        for value in invalid {
            assert!(value.parse::<NumericString>().is_err(), "{value:?}");
        }
    }

    #[test]
    fn test_numeric_string_rejects_non_strings_in_json() {
        for json in ["null", "true", "0", "1.23", "{}", "[]", r#"["1"]"#] {
            assert!(serde_json::from_str::<NumericString>(json).is_err(), "{json}");
        }
        let parsed: NumericString = serde_json::from_str(r#""42.5""#).unwrap();
        assert_eq!(parsed, "42.5");
        assert_eq!(parsed.to_f64().unwrap(), 42.5);
    }

    #[test]
    fn test_positive_numeric_string() {
        for valid in ["1", "10", "999999", "0.1", "0.01", "1.0", "100.25"] {
            let parsed: PositiveNumericString = valid.parse().unwrap();
            assert!(parsed.to_f64().unwrap() > 0.0);
        }
        for invalid in [
            "0", "-0", "0.0", "-1", "-0.1", ".123", "-.123", "01", "00", " 1", "1 ", "1e2", "+1",
            "abc", "1abc", "💯",
        ] {
            assert!(invalid.parse::<PositiveNumericString>().is_err(), "{invalid:?}");
        }
    }

    #[test]
    fn test_percent_bounds() {
        assert!("0".parse::<Percent>().is_ok());
        assert!("55.5".parse::<Percent>().is_ok());
        assert!("100".parse::<Percent>().is_ok());
        assert!("100.01".parse::<Percent>().is_err());
        assert!("-1".parse::<Percent>().is_err());
    }

    #[test]
    fn test_product_id_from_symbol() {
        assert_eq!(ProductId::from_symbol("btc", "USD").unwrap(), "BTC-USD");
        assert_eq!(ProductId::from_symbol("eth-usd", "USD").unwrap(), "ETH-USD");
        assert!(ProductId::from_symbol("", "USD").is_err());

        let id: ProductId = "SOL-USD".parse().unwrap();
        assert_eq!(id.base(), "SOL");
        assert_eq!(id.quote(), "USD");
        assert!("btc-usd".parse::<ProductId>().is_err());
        assert!("BTCUSD".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_numeric_string_to_decimal_keeps_scale() {
        let increment: NumericString = "0.00000001".parse().unwrap();
        assert_eq!(increment.to_decimal().unwrap().to_string(), "0.00000001");
    }
}
