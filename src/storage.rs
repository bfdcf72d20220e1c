use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::categories::ensure_defaults;
use crate::error::Result;
use crate::models::{Category, Transaction};
use crate::store::{
    KeyValueStore, BUDGETED_AMOUNTS_KEY, CATEGORIES_KEY, IMPORT_CHECKSUM_KEY,
    STARTING_BALANCE_KEY, TRANSACTIONS_KEY,
};

/// Category id -> budgeted amount for the year.
pub type BudgetedAmounts = BTreeMap<String, f64>;

/// Typed access to the JSON collections kept in a [`KeyValueStore`].
pub struct Storage<'a, S: KeyValueStore> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> Storage<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("stored {key} is unreadable, starting empty: {e}");
                Ok(None)
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.store.set(key, &serde_json::to_string(value)?)
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.load(TRANSACTIONS_KEY)?.unwrap_or_default())
    }

    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        self.save(TRANSACTIONS_KEY, transactions)
    }

    /// Stored categories, or the defaults when nothing has been saved yet.
    pub fn categories(&self) -> Result<Vec<Category>> {
        Ok(self
            .load(CATEGORIES_KEY)?
            .unwrap_or_else(|| ensure_defaults(&[])))
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        self.save(CATEGORIES_KEY, categories)
    }

    /// Load categories with every default present and write the merged list
    /// back, as done whenever the transaction list is opened.
    pub fn categories_with_defaults(&self) -> Result<Vec<Category>> {
        let merged = ensure_defaults(&self.categories()?);
        self.save_categories(&merged)?;
        Ok(merged)
    }

    pub fn budgeted_amounts(&self) -> Result<BudgetedAmounts> {
        Ok(self.load(BUDGETED_AMOUNTS_KEY)?.unwrap_or_default())
    }

    pub fn save_budgeted_amounts(&self, amounts: &BudgetedAmounts) -> Result<()> {
        self.save(BUDGETED_AMOUNTS_KEY, amounts)
    }

    pub fn starting_balance(&self) -> Result<f64> {
        let stored = self.store.get(STARTING_BALANCE_KEY)?;
        Ok(stored.and_then(|s| s.trim().parse().ok()).unwrap_or(0.0))
    }

    pub fn save_starting_balance(&self, balance: f64) -> Result<()> {
        self.store.set(STARTING_BALANCE_KEY, &balance.to_string())
    }

    pub fn import_checksum(&self) -> Result<Option<String>> {
        self.store.get(IMPORT_CHECKSUM_KEY)
    }

    pub fn save_import_checksum(&self, checksum: &str) -> Result<()> {
        self.store.set(IMPORT_CHECKSUM_KEY, checksum)
    }

    /// Wipe every stored collection, mappings included.
    pub fn clear_all(&self) -> Result<()> {
        tracing::info!("clearing all stored data");
        self.store.clear()
    }
}
