//! Currency storage with atomic snapshot publishing.

use std::collections::HashMap;
use std::sync::Arc;

use cambio_common::{Currency, CurrencyCode, CurrencyId, ValidationError};
use parking_lot::RwLock;
use tracing::{debug, info};

/// Immutable view of the currency catalog.
///
/// Currencies keep the order they were published in. Every lookup made while
/// serving one request should go through the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct CurrencySnapshot {
    currencies: Vec<Currency>,
    by_id: HashMap<CurrencyId, usize>,
    by_code: HashMap<CurrencyCode, usize>,
    version: u64,
}

impl CurrencySnapshot {
    /// Build a snapshot, checking record and uniqueness invariants.
    pub fn new(currencies: Vec<Currency>) -> Result<Self, ValidationError> {
        let mut by_id = HashMap::with_capacity(currencies.len());
        let mut by_code = HashMap::with_capacity(currencies.len());

        for (idx, currency) in currencies.iter().enumerate() {
            currency.validate()?;

            if by_id.insert(currency.id, idx).is_some() {
                return Err(ValidationError::DuplicateId(currency.id));
            }
            if by_code.insert(currency.code.clone(), idx).is_some() {
                return Err(ValidationError::DuplicateCode(currency.code.to_string()));
            }
        }

        Ok(Self {
            currencies,
            by_id,
            by_code,
            version: 0,
        })
    }

    /// Create an empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Publication counter, bumped on every successful store update.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of currencies.
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// All currencies in publication order.
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Look up a currency by id.
    pub fn get(&self, id: CurrencyId) -> Option<&Currency> {
        self.by_id.get(&id).map(|&idx| &self.currencies[idx])
    }

    /// Look up a currency by code.
    pub fn get_by_code(&self, code: &CurrencyCode) -> Option<&Currency> {
        self.by_code.get(code).map(|&idx| &self.currencies[idx])
    }

    /// Check if a currency id is present.
    pub fn contains(&self, id: CurrencyId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All currencies except the one matching `exclude`.
    ///
    /// An id that matches nothing leaves the list unchanged.
    pub fn list_excluding(&self, exclude: Option<CurrencyId>) -> Vec<Currency> {
        self.currencies
            .iter()
            .filter(|c| Some(c.id) != exclude)
            .cloned()
            .collect()
    }
}

/// Read access to the currency catalog.
pub trait CurrencyRepository: Send + Sync {
    /// Get the currently published snapshot.
    fn snapshot(&self) -> Arc<CurrencySnapshot>;

    /// List all currencies, optionally leaving one out.
    fn list_excluding(&self, exclude: Option<CurrencyId>) -> Vec<Currency> {
        self.snapshot().list_excluding(exclude)
    }

    /// Find a currency by id.
    fn find_by_id(&self, id: CurrencyId) -> Option<Currency> {
        self.snapshot().get(id).cloned()
    }

    /// Find a currency by code.
    fn find_by_code(&self, code: &CurrencyCode) -> Option<Currency> {
        self.snapshot().get_by_code(code).cloned()
    }
}

/// Thread-safe in-memory currency store.
///
/// Readers clone the current `Arc` under a short read lock. Writers build and
/// validate a full replacement before swapping it in, so a failed update
/// leaves the published catalog untouched.
pub struct CurrencyStore {
    current: RwLock<Arc<CurrencySnapshot>>,
}

impl CurrencyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CurrencySnapshot::empty())),
        }
    }

    /// Create a store holding the given currencies.
    pub fn with_currencies(currencies: Vec<Currency>) -> Result<Self, ValidationError> {
        let store = Self::new();
        store.publish(currencies)?;
        Ok(store)
    }

    /// Replace the whole catalog. Returns the new snapshot version.
    pub fn publish(&self, currencies: Vec<Currency>) -> Result<u64, ValidationError> {
        let mut snapshot = CurrencySnapshot::new(currencies)?;

        let mut current = self.current.write();
        snapshot.version = current.version + 1;
        let version = snapshot.version;
        let count = snapshot.len();
        *current = Arc::new(snapshot);
        drop(current);

        info!(version, currencies = count, "Published currency catalog");
        Ok(version)
    }

    /// Add a currency or update an existing one in place.
    ///
    /// An update keeps the record's position and must not change its code.
    pub fn upsert(&self, currency: Currency) -> Result<u64, ValidationError> {
        currency.validate()?;

        let mut current = self.current.write();
        let mut currencies = current.currencies.clone();

        match current.by_id.get(&currency.id) {
            Some(&idx) => {
                let existing = &currencies[idx];
                if existing.code != currency.code {
                    return Err(ValidationError::CodeChanged {
                        id: currency.id,
                        existing: existing.code.to_string(),
                        requested: currency.code.to_string(),
                    });
                }
                debug!(id = %currency.id, rate = %currency.rate_to_base, "Updating currency");
                currencies[idx] = currency;
            }
            None => {
                debug!(id = %currency.id, code = %currency.code, "Adding currency");
                currencies.push(currency);
            }
        }

        let mut snapshot = CurrencySnapshot::new(currencies)?;
        snapshot.version = current.version + 1;
        let version = snapshot.version;
        *current = Arc::new(snapshot);

        Ok(version)
    }

    /// Number of currencies currently published.
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}

impl Default for CurrencyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyRepository for CurrencyStore {
    fn snapshot(&self) -> Arc<CurrencySnapshot> {
        Arc::clone(&*self.current.read())
    }
}
