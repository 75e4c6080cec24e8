//! Default currency pair selection.

use std::fmt;
use std::sync::Arc;

use cambio_common::{Currency, CurrencyId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::CurrencyRepository;

/// Direction in which the default currencies are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lowest id first.
    #[default]
    Asc,
    /// Highest id first.
    Desc,
}

impl SortOrder {
    /// Parse an order token. Anything but `desc` means ascending.
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    /// Get the token for this order.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl From<Option<&str>> for SortOrder {
    fn from(token: Option<&str>) -> Self {
        token.map(Self::from_token).unwrap_or_default()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the configured default currencies and orders them by id.
pub struct DefaultPairSelector {
    repository: Arc<dyn CurrencyRepository>,
    default_ids: Vec<CurrencyId>,
}

impl DefaultPairSelector {
    /// Create a selector for the given default ids.
    pub fn new(repository: Arc<dyn CurrencyRepository>, default_ids: Vec<CurrencyId>) -> Self {
        Self {
            repository,
            default_ids,
        }
    }

    /// The configured default ids.
    pub fn default_ids(&self) -> &[CurrencyId] {
        &self.default_ids
    }

    /// Get the default currencies in the requested order.
    ///
    /// Configured ids missing from the catalog are skipped.
    pub fn select(&self, order: SortOrder) -> Vec<Currency> {
        let snapshot = self.repository.snapshot();

        let mut selected: Vec<Currency> = self
            .default_ids
            .iter()
            .filter_map(|&id| {
                let found = snapshot.get(id).cloned();
                if found.is_none() {
                    warn!(%id, "Configured default currency is not in the catalog");
                }
                found
            })
            .collect();

        match order {
            SortOrder::Asc => selected.sort_by_key(|c| c.id),
            SortOrder::Desc => selected.sort_by(|a, b| b.id.cmp(&a.id)),
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CurrencyStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn id(raw: u32) -> CurrencyId {
        CurrencyId::new(raw).unwrap()
    }

    fn make_currency(raw: u32, code: &str, rate: Decimal) -> Currency {
        Currency::new(id(raw), code.parse().unwrap(), code, rate).unwrap()
    }

    fn setup_selector(defaults: &[u32]) -> DefaultPairSelector {
        let store = CurrencyStore::with_currencies(vec![
            make_currency(1, "USD", dec!(1)),
            make_currency(2, "EUR", dec!(0.9)),
            make_currency(5, "BRL", dec!(5.1)),
        ])
        .unwrap();
        DefaultPairSelector::new(Arc::new(store), defaults.iter().map(|&raw| id(raw)).collect())
    }

    fn ids(currencies: &[Currency]) -> Vec<u32> {
        currencies.iter().map(|c| c.id.get()).collect()
    }

    #[test]
    fn test_order_tokens() {
        assert_eq!(SortOrder::from_token("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_token("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from_token(" DESC "), SortOrder::Desc);
        assert_eq!(SortOrder::from_token("xyz"), SortOrder::Asc);
        assert_eq!(SortOrder::from_token(""), SortOrder::Asc);
        assert_eq!(SortOrder::from(None), SortOrder::Asc);
        assert_eq!(SortOrder::from(Some("desc")), SortOrder::Desc);
    }

    #[test]
    fn test_select_orders_by_id() {
        let selector = setup_selector(&[5, 1]);

        assert_eq!(ids(&selector.select(SortOrder::Asc)), vec![1, 5]);
        assert_eq!(ids(&selector.select(SortOrder::Desc)), vec![5, 1]);
    }

    #[test]
    fn test_unknown_token_matches_ascending() {
        let selector = setup_selector(&[2, 1]);
        assert_eq!(
            selector.select(SortOrder::from_token("xyz")),
            selector.select(SortOrder::Asc)
        );
    }

    #[test]
    fn test_select_skips_missing_defaults() {
        let selector = setup_selector(&[2, 77, 1]);
        assert_eq!(ids(&selector.select(SortOrder::Desc)), vec![2, 1]);
    }

    #[test]
    fn test_select_empty_configuration() {
        let selector = setup_selector(&[]);
        assert!(selector.select(SortOrder::Asc).is_empty());
    }
}
