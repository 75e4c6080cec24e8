//! Cambio Exchange Engine
//!
//! Currency catalog queries and exchange calculations.
//!
//! # Features
//!
//! - Read-mostly currency store with atomic snapshot publishing
//! - Direct conversion factors derived from per-currency base rates
//! - Half-to-even rounding to a configurable number of decimal places
//! - Configurable default currency pair with ascending/descending order
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cambio_engine::{CurrencyCatalog, EngineConfig, ExchangeDesk};
//!
//! let store = CurrencyCatalog::sample()?.into_store()?;
//! let desk = ExchangeDesk::new(Arc::new(store), &EngineConfig::default())?;
//!
//! let result = desk.exchange_calculate(usd, eur, Some(100.0))?;
//! println!("{}", result.converted_amount);
//! ```

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod desk;
pub mod error;
pub mod metrics;
pub mod resolver;
pub mod store;

pub use calculator::ExchangeCalculator;
pub use catalog::{CatalogError, CurrencyCatalog};
pub use config::EngineConfig;
pub use defaults::{DefaultPairSelector, SortOrder};
pub use desk::{ConversionRequest, ConversionResult, DeskStats, ExchangeDesk};
pub use error::{ExchangeError, ExchangeResult};
pub use resolver::{RateResolver, ResolvedRate};
pub use store::{CurrencyRepository, CurrencySnapshot, CurrencyStore};
