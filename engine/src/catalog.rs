//! Loading currency catalogs from JSON.

use std::fs;
use std::path::Path;

use cambio_common::{Currency, CurrencyId, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::store::{CurrencySnapshot, CurrencyStore};

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON for the expected shape.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog breaks a currency invariant.
    #[error("Invalid catalog: {0}")]
    Invalid(#[from] ValidationError),
}

/// A serialized set of currencies, optionally with its default pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCatalog {
    /// Currencies in presentation order.
    pub currencies: Vec<Currency>,
    /// Default pair carried by the catalog, overriding configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_pair: Option<Vec<CurrencyId>>,
}

impl CurrencyCatalog {
    /// Parse and validate a catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        debug!(currencies = catalog.currencies.len(), "Parsed currency catalog");
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            currencies = catalog.currencies.len(),
            "Loaded currency catalog"
        );
        Ok(catalog)
    }

    /// The built-in sample catalog.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json_str(SAMPLE_CATALOG)
    }

    /// Check every currency invariant without publishing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        CurrencySnapshot::new(self.currencies.clone()).map(|_| ())
    }

    /// Build a store holding this catalog's currencies.
    pub fn into_store(self) -> Result<CurrencyStore, ValidationError> {
        CurrencyStore::with_currencies(self.currencies)
    }
}
