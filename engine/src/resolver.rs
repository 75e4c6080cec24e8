//! Resolution of currency pairs into conversion factors.

use std::sync::Arc;

use cambio_common::{ConversionFactor, Currency, CurrencyId};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::error::{ExchangeError, ExchangeResult};
use crate::store::{CurrencyRepository, CurrencySnapshot};

/// Both sides of a conversion and the factor between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRate {
    /// Currency being converted from.
    pub from: Currency,
    /// Currency being converted to.
    pub to: Currency,
    /// Multiplier from `from` units into `to` units.
    pub factor: ConversionFactor,
}

/// Looks up currency pairs and derives direct conversion factors.
pub struct RateResolver {
    repository: Arc<dyn CurrencyRepository>,
}

impl RateResolver {
    /// Create a resolver reading from the given repository.
    pub fn new(repository: Arc<dyn CurrencyRepository>) -> Self {
        Self { repository }
    }

    /// Resolve the factor converting one unit of `from` into `to`.
    pub fn resolve(&self, from: CurrencyId, to: CurrencyId) -> ExchangeResult<ResolvedRate> {
        let snapshot = self.repository.snapshot();
        Self::resolve_in(&snapshot, from, to)
    }

    /// Resolve against a specific snapshot.
    pub fn resolve_in(
        snapshot: &CurrencySnapshot,
        from: CurrencyId,
        to: CurrencyId,
    ) -> ExchangeResult<ResolvedRate> {
        let (from_currency, to_currency) = match (snapshot.get(from), snapshot.get(to)) {
            (Some(f), Some(t)) => (f, t),
            (None, Some(_)) => {
                warn!(%from, "Source currency not found");
                return Err(ExchangeError::NotFound(from));
            }
            (Some(_), None) => {
                warn!(%to, "Target currency not found");
                return Err(ExchangeError::NotFound(to));
            }
            (None, None) if from == to => {
                warn!(%from, "Currency not found");
                return Err(ExchangeError::NotFound(from));
            }
            (None, None) => {
                warn!(%from, %to, "Neither currency found");
                return Err(ExchangeError::PairNotFound { from, to });
            }
        };

        let factor = if from == to {
            ConversionFactor::IDENTITY
        } else {
            Self::factor_between(from_currency, to_currency)?
        };

        debug!(
            from = %from_currency.code,
            to = %to_currency.code,
            factor = %factor,
            version = snapshot.version(),
            "Resolved conversion factor"
        );

        Ok(ResolvedRate {
            from: from_currency.clone(),
            to: to_currency.clone(),
            factor,
        })
    }

    /// `to.rate_to_base / from.rate_to_base`, guarded against bad stored rates.
    fn factor_between(from: &Currency, to: &Currency) -> ExchangeResult<ConversionFactor> {
        for currency in [from, to] {
            if currency.rate_to_base <= Decimal::ZERO {
                error!(
                    id = %currency.id,
                    rate = %currency.rate_to_base,
                    "Stored currency has a non-positive rate"
                );
                return Err(ExchangeError::Internal(format!(
                    "currency {} has non-positive rate {}",
                    currency.id, currency.rate_to_base
                )));
            }
        }

        let raw = to.rate_to_base.checked_div(from.rate_to_base).ok_or_else(|| {
            error!(from = %from.id, to = %to.id, "Conversion factor overflowed");
            ExchangeError::Internal(format!(
                "conversion factor from {} to {} overflowed",
                from.id, to.id
            ))
        })?;

        ConversionFactor::new(raw.normalize()).ok_or_else(|| {
            error!(from = %from.id, to = %to.id, factor = %raw, "Conversion factor underflowed");
            ExchangeError::Internal(format!(
                "conversion factor from {} to {} is not positive",
                from.id, to.id
            ))
        })
    }
}
