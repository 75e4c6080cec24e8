//! The exchange desk: single entry point for currency queries and conversions.

use std::sync::Arc;

use cambio_common::{ConversionFactor, Currency, CurrencyCode, CurrencyId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::calculator::ExchangeCalculator;
use crate::config::EngineConfig;
use crate::defaults::{DefaultPairSelector, SortOrder};
use crate::error::{ExchangeError, ExchangeResult};
use crate::metrics::{DeskMetrics, MetricsSnapshot};
use crate::resolver::RateResolver;
use crate::store::CurrencyRepository;

/// Request to convert an amount between two currencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRequest {
    /// Currency being converted from.
    pub from: CurrencyId,
    /// Currency being converted to.
    pub to: CurrencyId,
    /// Amount in the source currency, as supplied by the caller.
    pub amount: Option<f64>,
}

impl ConversionRequest {
    /// Create a new conversion request.
    pub fn new(from: CurrencyId, to: CurrencyId, amount: Option<f64>) -> Self {
        Self { from, to, amount }
    }

    /// Check the amount and turn it into a decimal.
    pub fn validated_amount(&self) -> ExchangeResult<Decimal> {
        validate_amount(self.amount)
    }
}

/// Check that an amount is present, finite and non-negative, and turn it
/// into a decimal.
pub fn validate_amount(amount: Option<f64>) -> ExchangeResult<Decimal> {
    let amount =
        amount.ok_or_else(|| ExchangeError::InvalidInput("amount is required".to_string()))?;

    if !amount.is_finite() {
        return Err(ExchangeError::InvalidInput(
            "amount must be a finite number".to_string(),
        ));
    }
    if amount < 0.0 {
        return Err(ExchangeError::InvalidInput(
            "amount must not be negative".to_string(),
        ));
    }

    let out_of_range = || ExchangeError::InvalidInput("amount is out of range".to_string());
    let decimal = Decimal::try_from(amount).map_err(|_| out_of_range())?;

    if decimal.is_zero() {
        // A positive amount below the smallest decimal step would silently become zero.
        if amount > 0.0 {
            return Err(out_of_range());
        }
        // -0.0 passes the sign check above; normalize it away.
        return Ok(Decimal::ZERO);
    }
    Ok(decimal)
}

/// A completed conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Unique calculation ID.
    pub id: Uuid,
    /// Currency converted from.
    pub from_currency: Currency,
    /// Currency converted to.
    pub to_currency: Currency,
    /// Amount supplied by the caller.
    pub input_amount: Decimal,
    /// Rounded amount in the target currency.
    pub converted_amount: Decimal,
    /// Factor the input was multiplied by.
    pub rate_applied: ConversionFactor,
    /// When the calculation ran.
    pub calculated_at: DateTime<Utc>,
}

/// Desk statistics.
#[derive(Debug, Clone, Serialize)]
pub struct DeskStats {
    /// Currencies currently published.
    pub currencies: usize,
    /// Catalog version the figures were taken from.
    pub catalog_version: u64,
    /// Request counters.
    pub metrics: MetricsSnapshot,
}

/// Query facade over the currency catalog and conversion pipeline.
pub struct ExchangeDesk {
    repository: Arc<dyn CurrencyRepository>,
    resolver: RateResolver,
    calculator: ExchangeCalculator,
    selector: DefaultPairSelector,
    metrics: DeskMetrics,
}

impl ExchangeDesk {
    /// Create a desk over `repository` using `config`.
    pub fn new(repository: Arc<dyn CurrencyRepository>, config: &EngineConfig) -> ExchangeResult<Self> {
        config.validate().map_err(ExchangeError::Configuration)?;

        Ok(Self::from_parts(
            Arc::clone(&repository),
            RateResolver::new(Arc::clone(&repository)),
            ExchangeCalculator::new(config.decimal_places),
            DefaultPairSelector::new(repository, config.default_pair.clone()),
        ))
    }

    /// Assemble a desk from pre-built collaborators.
    pub fn from_parts(
        repository: Arc<dyn CurrencyRepository>,
        resolver: RateResolver,
        calculator: ExchangeCalculator,
        selector: DefaultPairSelector,
    ) -> Self {
        Self {
            repository,
            resolver,
            calculator,
            selector,
            metrics: DeskMetrics::new(),
        }
    }

    /// List all currencies, optionally leaving one out.
    #[instrument(skip(self))]
    pub fn list_currencies(&self, exclude: Option<CurrencyId>) -> Vec<Currency> {
        self.metrics.lookup();
        let currencies = self.repository.list_excluding(exclude);
        debug!(count = currencies.len(), "Listed currencies");
        currencies
    }

    /// Find a currency by id.
    #[instrument(skip(self))]
    pub fn get_currency(&self, id: CurrencyId) -> ExchangeResult<Currency> {
        self.metrics.lookup();
        self.repository.find_by_id(id).ok_or_else(|| {
            warn!(%id, "Currency not found");
            ExchangeError::NotFound(id)
        })
    }

    /// Find a currency by code.
    #[instrument(skip(self))]
    pub fn get_currency_by_code(&self, code: &CurrencyCode) -> Option<Currency> {
        self.metrics.lookup();
        self.repository.find_by_code(code)
    }

    /// Get the default currencies ordered by `order` (`"asc"` when absent).
    #[instrument(skip(self))]
    pub fn get_default_pair(&self, order: Option<&str>) -> Vec<Currency> {
        self.selector.select(SortOrder::from(order))
    }

    /// Convert `amount` of `from` into `to`.
    pub fn exchange_calculate(
        &self,
        from: CurrencyId,
        to: CurrencyId,
        amount: Option<f64>,
    ) -> ExchangeResult<ConversionResult> {
        self.convert(&ConversionRequest::new(from, to, amount))
    }

    /// Run a conversion request.
    #[instrument(skip(self, request), fields(from = %request.from, to = %request.to))]
    pub fn convert(&self, request: &ConversionRequest) -> ExchangeResult<ConversionResult> {
        self.metrics.calculation_requested();

        let outcome = self.run_conversion(request);
        match &outcome {
            Ok(_) => self.metrics.calculation_success(),
            Err(e) => self.metrics.calculation_error(e),
        }
        outcome
    }

    fn run_conversion(&self, request: &ConversionRequest) -> ExchangeResult<ConversionResult> {
        let input_amount = request.validated_amount()?;
        let resolved = self.resolver.resolve(request.from, request.to)?;
        let converted_amount = self.calculator.calculate(input_amount, resolved.factor)?;

        let result = ConversionResult {
            id: Uuid::now_v7(),
            from_currency: resolved.from,
            to_currency: resolved.to,
            input_amount,
            converted_amount,
            rate_applied: resolved.factor,
            calculated_at: Utc::now(),
        };

        info!(
            calculation_id = %result.id,
            from = %result.from_currency.code,
            to = %result.to_currency.code,
            amount = %result.input_amount,
            converted = %result.converted_amount,
            factor = %result.rate_applied,
            "Exchange calculated"
        );

        Ok(result)
    }

    /// The calculator used for conversions.
    pub fn calculator(&self) -> &ExchangeCalculator {
        &self.calculator
    }

    /// Get desk statistics.
    pub fn stats(&self) -> DeskStats {
        let snapshot = self.repository.snapshot();
        DeskStats {
            currencies: snapshot.len(),
            catalog_version: snapshot.version(),
            metrics: self.metrics.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CurrencyStore;
    use rust_decimal_macros::dec;

    fn id(raw: u32) -> CurrencyId {
        CurrencyId::new(raw).unwrap()
    }

    fn make_currency(raw: u32, code: &str, rate: Decimal) -> Currency {
        Currency::new(id(raw), code.parse().unwrap(), code, rate).unwrap()
    }

    fn setup_desk() -> ExchangeDesk {
        let store = CurrencyStore::with_currencies(vec![
            make_currency(1, "USD", dec!(1.0)),
            make_currency(2, "EUR", dec!(0.9)),
        ])
        .unwrap();
        ExchangeDesk::new(Arc::new(store), &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_validated_amount() {
        let request = |amount| ConversionRequest::new(id(1), id(2), amount);

        assert_eq!(request(Some(12.5)).validated_amount().unwrap(), dec!(12.5));
        assert_eq!(request(Some(0.0)).validated_amount().unwrap(), Decimal::ZERO);
        assert_eq!(request(Some(-0.0)).validated_amount().unwrap(), Decimal::ZERO);

        assert_eq!(
            request(None).validated_amount(),
            Err(ExchangeError::InvalidInput("amount is required".into()))
        );
        assert!(matches!(
            request(Some(f64::NAN)).validated_amount(),
            Err(ExchangeError::InvalidInput(_))
        ));
        assert!(matches!(
            request(Some(f64::INFINITY)).validated_amount(),
            Err(ExchangeError::InvalidInput(_))
        ));
        assert!(matches!(
            request(Some(-1.0)).validated_amount(),
            Err(ExchangeError::InvalidInput(_))
        ));
        assert!(matches!(
            request(Some(1e40)).validated_amount(),
            Err(ExchangeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tiny_amount_is_out_of_range() {
        let out_of_range = Err(ExchangeError::InvalidInput("amount is out of range".into()));

        assert_eq!(validate_amount(Some(1e-30)), out_of_range);
        assert_eq!(validate_amount(Some(f64::MIN_POSITIVE)), out_of_range);
        assert_eq!(validate_amount(Some(0.001)).unwrap(), dec!(0.001));
    }

    #[test]
    fn test_huge_amount_is_rejected_not_failed() {
        let store = CurrencyStore::with_currencies(vec![
            make_currency(1, "USD", dec!(1.0)),
            make_currency(4, "JPY", dec!(150)),
        ])
        .unwrap();
        let desk = ExchangeDesk::new(Arc::new(store), &EngineConfig::default()).unwrap();

        for amount in [1e27, 7e28] {
            let err = desk.exchange_calculate(id(1), id(4), Some(amount)).unwrap_err();
            assert_eq!(err, ExchangeError::InvalidInput("amount is out of range".into()));
            assert!(err.is_client_error());
        }

        let same = desk.exchange_calculate(id(1), id(1), Some(7e28)).unwrap_err();
        assert_eq!(same, ExchangeError::InvalidInput("amount is out of range".into()));

        let metrics = desk.stats().metrics;
        assert_eq!(metrics.calculations_rejected, 3);
        assert_eq!(metrics.calculations_failed, 0);
    }

    #[test]
    fn test_exchange_calculate() {
        let desk = setup_desk();

        let result = desk.exchange_calculate(id(1), id(2), Some(100.0)).unwrap();
        assert_eq!(result.from_currency.code.as_str(), "USD");
        assert_eq!(result.to_currency.code.as_str(), "EUR");
        assert_eq!(result.input_amount, dec!(100));
        assert_eq!(result.converted_amount, dec!(90.00));
        assert_eq!(result.rate_applied.value(), dec!(0.9));
    }

    #[test]
    fn test_missing_amount_wins_over_unknown_ids() {
        let desk = setup_desk();

        let result = desk.exchange_calculate(id(404), id(405), None);
        assert_eq!(
            result,
            Err(ExchangeError::InvalidInput("amount is required".into()))
        );
    }

    #[test]
    fn test_calculation_ids_are_unique() {
        let desk = setup_desk();
        let a = desk.exchange_calculate(id(1), id(2), Some(1.0)).unwrap();
        let b = desk.exchange_calculate(id(1), id(2), Some(1.0)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_get_currency_by_code() {
        let desk = setup_desk();
        let eur = desk.get_currency_by_code(&"eur".parse().unwrap()).unwrap();
        assert_eq!(eur.id, id(2));
        assert!(desk.get_currency_by_code(&"XAU".parse().unwrap()).is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let store = Arc::new(CurrencyStore::new());
        let config = EngineConfig {
            decimal_places: 99,
            ..Default::default()
        };

        let result = ExchangeDesk::new(store, &config);
        assert!(matches!(result, Err(ExchangeError::Configuration(_))));
    }

    #[test]
    fn test_stats() {
        let desk = setup_desk();

        desk.list_currencies(None);
        let _ = desk.get_currency(id(1));
        let _ = desk.exchange_calculate(id(1), id(2), Some(5.0));
        let _ = desk.exchange_calculate(id(1), id(3), Some(5.0));
        let _ = desk.exchange_calculate(id(1), id(2), None);

        let stats = desk.stats();
        assert_eq!(stats.currencies, 2);
        assert_eq!(stats.catalog_version, 1);
        assert_eq!(stats.metrics.lookups_total, 2);
        assert_eq!(stats.metrics.calculations_total, 3);
        assert_eq!(stats.metrics.calculations_success, 1);
        assert_eq!(stats.metrics.calculations_not_found, 1);
        assert_eq!(stats.metrics.calculations_rejected, 1);
    }
}
