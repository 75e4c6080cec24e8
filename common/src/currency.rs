//! Currency records and conversion factors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::CurrencyId;

/// Maximum length of a currency code.
pub const MAX_CODE_LEN: usize = 8;

/// Short textual currency code, normalized to upper case (ISO 4217 style).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a new currency code.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim();
        if code.is_empty()
            || code.len() > MAX_CODE_LEN
            || !code.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ValidationError::InvalidCode(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A known currency and its rate against the base unit.
///
/// `rate_to_base` is the number of units of this currency that one base unit
/// buys. Converting from `a` to `b` multiplies by `b.rate_to_base / a.rate_to_base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Unique identifier.
    pub id: CurrencyId,
    /// Unique code.
    pub code: CurrencyCode,
    /// Human-readable name.
    pub name: String,
    /// Units of this currency per base unit. Strictly positive.
    pub rate_to_base: Decimal,
}

impl Currency {
    /// Create a validated currency record.
    pub fn new(
        id: CurrencyId,
        code: CurrencyCode,
        name: impl Into<String>,
        rate_to_base: Decimal,
    ) -> Result<Self, ValidationError> {
        let currency = Self {
            id,
            code,
            name: name.into(),
            rate_to_base,
        };
        currency.validate()?;
        Ok(currency)
    }

    /// Check the record-level invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName(self.id));
        }
        if self.rate_to_base <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveRate {
                id: self.id,
                rate: self.rate_to_base,
            });
        }
        Ok(())
    }

    /// Check if this currency sits at the base unit.
    pub fn is_base(&self) -> bool {
        self.rate_to_base == Decimal::ONE
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.id)
    }
}

/// Multiplier turning an amount in one currency into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionFactor(Decimal);

impl ConversionFactor {
    /// Factor for converting a currency into itself.
    pub const IDENTITY: ConversionFactor = ConversionFactor(Decimal::ONE);

    /// Create a factor from a decimal. Returns `None` unless strictly positive.
    pub fn new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    /// Get the decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check if this is the identity factor.
    pub fn is_identity(&self) -> bool {
        self.0 == Decimal::ONE
    }
}

impl fmt::Display for ConversionFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn id(raw: u32) -> CurrencyId {
        CurrencyId::new(raw).unwrap()
    }

    #[test]
    fn test_currency_code_normalized() {
        let code = CurrencyCode::new(" usd ").unwrap();
        assert_eq!(code.as_str(), "USD");
        assert_eq!(code, "USD".parse().unwrap());
    }

    #[test]
    fn test_currency_code_rejects_garbage() {
        assert!(CurrencyCode::new("").is_err());
        assert!(CurrencyCode::new("US-D").is_err());
        assert!(CurrencyCode::new("ABCDEFGHI").is_err());
    }

    #[test]
    fn test_currency_validation() {
        let usd = Currency::new(id(1), "USD".parse().unwrap(), "US Dollar", dec!(1));
        assert!(usd.unwrap().is_base());

        let zero = Currency::new(id(2), "EUR".parse().unwrap(), "Euro", dec!(0));
        assert!(matches!(zero, Err(ValidationError::NonPositiveRate { .. })));

        let negative = Currency::new(id(2), "EUR".parse().unwrap(), "Euro", dec!(-0.9));
        assert!(matches!(negative, Err(ValidationError::NonPositiveRate { .. })));

        let unnamed = Currency::new(id(2), "EUR".parse().unwrap(), "  ", dec!(0.9));
        assert!(matches!(unnamed, Err(ValidationError::EmptyName(_))));
    }

    #[test]
    fn test_currency_serde_shape() {
        let eur = Currency::new(id(2), "eur".parse().unwrap(), "Euro", dec!(0.9)).unwrap();
        let json = serde_json::to_value(&eur).unwrap();

        assert_eq!(json["id"], 2);
        assert_eq!(json["code"], "EUR");
        assert_eq!(json["rate_to_base"], "0.9");

        let back: Currency = serde_json::from_value(json).unwrap();
        assert_eq!(back, eur);
    }

    #[test]
    fn test_conversion_factor() {
        assert!(ConversionFactor::IDENTITY.is_identity());
        assert!(ConversionFactor::new(dec!(0)).is_none());
        assert!(ConversionFactor::new(dec!(-1)).is_none());
        assert_eq!(ConversionFactor::new(dec!(0.9)).unwrap().value(), dec!(0.9));
    }
}
