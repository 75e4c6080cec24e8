//! Counters for exchange desk activity.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::ExchangeError;

/// Exchange desk counters.
#[derive(Debug, Default)]
pub struct DeskMetrics {
    /// Calculations requested.
    pub calculations_total: AtomicU64,
    /// Calculations that produced a result.
    pub calculations_success: AtomicU64,
    /// Calculations rejected for bad input.
    pub calculations_rejected: AtomicU64,
    /// Calculations naming unknown currencies.
    pub calculations_not_found: AtomicU64,
    /// Calculations failed on an invariant violation.
    pub calculations_failed: AtomicU64,
    /// Currency list and find requests.
    pub lookups_total: AtomicU64,
}

impl DeskMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment calculation requested.
    pub fn calculation_requested(&self) {
        self.calculations_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record calculation success.
    pub fn calculation_success(&self) {
        self.calculations_success.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed calculation under the matching counter.
    pub fn calculation_error(&self, error: &ExchangeError) {
        let counter = match error {
            ExchangeError::InvalidInput(_) => &self.calculations_rejected,
            e if e.is_not_found() => &self.calculations_not_found,
            _ => &self.calculations_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment lookups.
    pub fn lookup(&self) {
        self.lookups_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calculations_total: self.calculations_total.load(Ordering::Relaxed),
            calculations_success: self.calculations_success.load(Ordering::Relaxed),
            calculations_rejected: self.calculations_rejected.load(Ordering::Relaxed),
            calculations_not_found: self.calculations_not_found.load(Ordering::Relaxed),
            calculations_failed: self.calculations_failed.load(Ordering::Relaxed),
            lookups_total: self.lookups_total.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub calculations_total: u64,
    pub calculations_success: u64,
    pub calculations_rejected: u64,
    pub calculations_not_found: u64,
    pub calculations_failed: u64,
    pub lookups_total: u64,
}
