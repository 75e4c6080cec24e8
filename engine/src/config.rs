//! Engine configuration.

use std::path::PathBuf;

use cambio_common::CurrencyId;
use tracing::warn;

use crate::calculator::{DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};

/// Environment variable holding the number of decimal places.
pub const ENV_DECIMAL_PLACES: &str = "CAMBIO_DECIMAL_PLACES";
/// Environment variable holding comma-separated default currency ids.
pub const ENV_DEFAULT_PAIR: &str = "CAMBIO_DEFAULT_PAIR";
/// Environment variable holding the path of a JSON currency catalog.
pub const ENV_CATALOG: &str = "CAMBIO_CATALOG";

/// Main engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Decimal places in converted amounts.
    pub decimal_places: u32,
    /// Currencies presented as the default exchange pair.
    pub default_pair: Vec<CurrencyId>,
    /// Optional catalog file to load at startup.
    pub catalog_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
            default_pair: [1, 2]
                .into_iter()
                .filter_map(|raw| CurrencyId::new(raw).ok())
                .collect(),
            catalog_path: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(places) = lookup(ENV_DECIMAL_PLACES) {
            match places.trim().parse() {
                Ok(places) => config.decimal_places = places,
                Err(_) => warn!(value = %places, "Ignoring unparseable {}", ENV_DECIMAL_PLACES),
            }
        }

        if let Some(pair) = lookup(ENV_DEFAULT_PAIR) {
            match parse_id_list(&pair) {
                Some(ids) => config.default_pair = ids,
                None => warn!(value = %pair, "Ignoring unparseable {}", ENV_DEFAULT_PAIR),
            }
        }

        if let Some(path) = lookup(ENV_CATALOG) {
            if !path.trim().is_empty() {
                config.catalog_path = Some(PathBuf::from(path));
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(format!(
                "Decimal places cannot exceed {}, got {}",
                MAX_DECIMAL_PLACES, self.decimal_places
            ));
        }

        if self.default_pair.is_empty() {
            return Err("Default pair cannot be empty".to_string());
        }

        let mut seen = self.default_pair.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.default_pair.len() {
            return Err("Default pair contains duplicate ids".to_string());
        }

        Ok(())
    }
}

fn parse_id_list(raw: &str) -> Option<Vec<CurrencyId>> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<CurrencyId>().ok())
        .collect()
}
