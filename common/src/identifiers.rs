//! Identifier types for currency records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::ValidationError;

/// Unique identifier for a currency record.
/// Always a positive integer; zero is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CurrencyId(NonZeroU32);

impl CurrencyId {
    /// Create a currency ID from a raw integer.
    pub fn new(id: u32) -> Result<Self, ValidationError> {
        NonZeroU32::new(id)
            .map(Self)
            .ok_or(ValidationError::InvalidId(id))
    }

    /// Get the raw integer value.
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl From<NonZeroU32> for CurrencyId {
    fn from(id: NonZeroU32) -> Self {
        Self(id)
    }
}

impl TryFrom<u32> for CurrencyId {
    type Error = ValidationError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<CurrencyId> for u32 {
    fn from(id: CurrencyId) -> Self {
        id.get()
    }
}

impl FromStr for CurrencyId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::UnparseableId(s.to_string()))?;
        Self::new(raw)
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
