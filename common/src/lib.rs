//! Cambio Common Types
//!
//! This crate contains the shared currency types used across the Cambio
//! exchange engine, including identifiers, currency records and conversion
//! factors.

pub mod identifiers;
pub mod currency;
pub mod error;

pub use identifiers::*;
pub use currency::*;
pub use error::*;
