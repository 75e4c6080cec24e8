//! Exchange engine error types.

use cambio_common::CurrencyId;
use thiserror::Error;

/// Errors that can occur in the exchange engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// A referenced currency does not exist.
    #[error("Currency not found: {0}")]
    NotFound(CurrencyId),

    /// Neither side of a conversion exists.
    #[error("Currencies not found: {from} and {to}")]
    PairNotFound { from: CurrencyId, to: CurrencyId },

    /// Caller supplied a missing or unusable value.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored data broke an invariant.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Engine configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ExchangeError {
    /// Check if this error means a currency id could not be resolved.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ExchangeError::NotFound(_) | ExchangeError::PairNotFound { .. }
        )
    }

    /// Check if the caller caused this error.
    pub fn is_client_error(&self) -> bool {
        self.is_not_found() || matches!(self, ExchangeError::InvalidInput(_))
    }

    /// Get the currency ids that could not be resolved.
    pub fn missing_ids(&self) -> Vec<CurrencyId> {
        match self {
            ExchangeError::NotFound(id) => vec![*id],
            ExchangeError::PairNotFound { from, to } => vec![*from, *to],
            _ => Vec::new(),
        }
    }

    /// Get error code for boundary responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExchangeError::NotFound(_) | ExchangeError::PairNotFound { .. } => {
                "CURRENCY_NOT_FOUND"
            }
            ExchangeError::InvalidInput(_) => "INVALID_INPUT",
            ExchangeError::Internal(_) => "INTERNAL_ERROR",
            ExchangeError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Result type for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;
