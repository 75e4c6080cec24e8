//! Applying conversion factors to amounts.

use cambio_common::ConversionFactor;
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{ExchangeError, ExchangeResult};

/// Default number of decimal places in converted amounts.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Largest supported number of decimal places.
pub const MAX_DECIMAL_PLACES: u32 = 8;

/// Multiplies amounts by conversion factors and rounds the result.
///
/// Rounding is half-to-even (banker's rounding): `0.125` becomes `0.12` and
/// `0.135` becomes `0.14` at two places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeCalculator {
    decimal_places: u32,
}

impl ExchangeCalculator {
    /// Create a calculator rounding to `decimal_places`.
    pub fn new(decimal_places: u32) -> Self {
        Self {
            decimal_places: decimal_places.min(MAX_DECIMAL_PLACES),
        }
    }

    /// Number of decimal places in results.
    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Smallest representable step of a result, e.g. `0.01`.
    pub fn unit(&self) -> Decimal {
        Decimal::new(1, self.decimal_places)
    }

    /// Convert `amount` using `factor`.
    ///
    /// The result must fit with every configured decimal place; an amount too
    /// large for that is rejected as out of range.
    pub fn calculate(&self, amount: Decimal, factor: ConversionFactor) -> ExchangeResult<Decimal> {
        let converted = amount
            .checked_mul(factor.value())
            .map(|value| self.round(value))
            .filter(|value| value.scale() == self.decimal_places);

        converted.ok_or_else(|| {
            warn!(
                %amount,
                %factor,
                places = self.decimal_places,
                "Converted amount out of range"
            );
            ExchangeError::InvalidInput("amount is out of range".to_string())
        })
    }

    /// Round a value to the configured precision, padding the scale so
    /// `90` prints as `90.00`.
    ///
    /// Padding is best-effort: values within a few digits of `Decimal::MAX`
    /// keep a smaller scale. [`calculate`](Self::calculate) rejects those.
    pub fn round(&self, value: Decimal) -> Decimal {
        let mut rounded = value.round_dp(self.decimal_places);
        rounded.rescale(self.decimal_places);
        rounded
    }
}

impl Default for ExchangeCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMAL_PLACES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn factor(value: Decimal) -> ConversionFactor {
        ConversionFactor::new(value).unwrap()
    }

    #[test]
    fn test_calculate_rounds_to_two_places() {
        let calc = ExchangeCalculator::default();

        assert_eq!(calc.calculate(dec!(100), factor(dec!(0.9))).unwrap(), dec!(90.00));
        assert_eq!(
            calc.calculate(dec!(90), factor(dec!(1) / dec!(0.9))).unwrap(),
            dec!(100.00)
        );
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        let calc = ExchangeCalculator::default();

        assert_eq!(calc.round(dec!(0.125)), dec!(0.12));
        assert_eq!(calc.round(dec!(0.135)), dec!(0.14));
        assert_eq!(calc.round(dec!(2.5001)), dec!(2.50));
        assert_eq!(calc.round(dec!(-0.125)), dec!(-0.12));
        assert_eq!(calc.round(dec!(90)).to_string(), "90.00");
    }

    #[test]
    fn test_configurable_places() {
        let calc = ExchangeCalculator::new(0);
        assert_eq!(calc.calculate(dec!(10), factor(dec!(0.25))).unwrap(), dec!(2));
        assert_eq!(calc.unit(), dec!(1));

        let calc = ExchangeCalculator::new(4);
        assert_eq!(
            calc.calculate(dec!(1), factor(dec!(1.23456))).unwrap(),
            dec!(1.2346)
        );
        assert_eq!(calc.unit(), dec!(0.0001));

        assert_eq!(ExchangeCalculator::new(30).decimal_places(), MAX_DECIMAL_PLACES);
    }

    #[test]
    fn test_zero_amount() {
        let calc = ExchangeCalculator::default();
        assert_eq!(calc.calculate(Decimal::ZERO, factor(dec!(150))).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_is_out_of_range() {
        let calc = ExchangeCalculator::default();
        let out_of_range = Err(ExchangeError::InvalidInput("amount is out of range".into()));

        let huge = Decimal::from_i128_with_scale(10i128.pow(27), 0);

        assert_eq!(calc.calculate(Decimal::MAX, factor(dec!(2))), out_of_range);
        assert_eq!(calc.calculate(huge, factor(dec!(150))), out_of_range);
    }

    #[test]
    fn test_result_too_large_for_places_is_out_of_range() {
        let calc = ExchangeCalculator::default();
        let amount = Decimal::from_i128_with_scale(7 * 10i128.pow(28), 0);

        assert!(calc.round(amount).scale() < 2);
        assert_eq!(
            calc.calculate(amount, ConversionFactor::IDENTITY),
            Err(ExchangeError::InvalidInput("amount is out of range".into()))
        );

        let large = Decimal::from_i128_with_scale(10i128.pow(24), 0);
        let padded = calc.calculate(large, ConversionFactor::IDENTITY).unwrap();
        assert_eq!(padded.to_string(), "1000000000000000000000000.00");
    }

    proptest! {
        #[test]
        fn prop_identity_factor_keeps_amount(cents in 0i64..1_000_000_000_000i64) {
            let calc = ExchangeCalculator::default();
            let amount = Decimal::new(cents, 2);
            prop_assert_eq!(calc.calculate(amount, ConversionFactor::IDENTITY).unwrap(), amount);
        }
    }
}
