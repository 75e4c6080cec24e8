//! Validation errors for currency records.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::CurrencyId;

/// Errors raised when a currency record or catalog breaks an invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Currency IDs must be positive.
    #[error("Invalid currency id: {0}")]
    InvalidId(u32),

    /// Text that does not parse as a currency id.
    #[error("Unparseable currency id: {0:?}")]
    UnparseableId(String),

    /// Code is empty, too long or contains non-alphanumeric characters.
    #[error("Invalid currency code: {0:?}")]
    InvalidCode(String),

    /// Display name is empty.
    #[error("Currency {0} has an empty name")]
    EmptyName(CurrencyId),

    /// Rate is zero or negative.
    #[error("Currency {id} has non-positive rate {rate}")]
    NonPositiveRate { id: CurrencyId, rate: Decimal },

    /// Two records share an id.
    #[error("Duplicate currency id: {0}")]
    DuplicateId(CurrencyId),

    /// Two records share a code.
    #[error("Duplicate currency code: {0}")]
    DuplicateCode(String),

    /// An update tried to change the code of an existing record.
    #[error("Currency {id} code is immutable: {existing} cannot become {requested}")]
    CodeChanged {
        id: CurrencyId,
        existing: String,
        requested: String,
    },
}

impl ValidationError {
    /// Get error code for boundary responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidId(_) => "INVALID_ID",
            ValidationError::UnparseableId(_) => "UNPARSEABLE_ID",
            ValidationError::InvalidCode(_) => "INVALID_CODE",
            ValidationError::EmptyName(_) => "EMPTY_NAME",
            ValidationError::NonPositiveRate { .. } => "NON_POSITIVE_RATE",
            ValidationError::DuplicateId(_) => "DUPLICATE_ID",
            ValidationError::DuplicateCode(_) => "DUPLICATE_CODE",
            ValidationError::CodeChanged { .. } => "CODE_CHANGED",
        }
    }
}
