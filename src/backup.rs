//! JSON backup files: everything needed to rebuild the store on another
//! machine. Mappings are not included.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::categories::ensure_defaults;
use crate::error::{Result, TreasurerError};
use crate::mappings::MappingStore;
use crate::models::{Category, Transaction};
use crate::storage::{BudgetedAmounts, Storage};
use crate::store::KeyValueStore;

pub const BACKUP_VERSION: &str = "1.0";

/// Budget entry as written by older exports, one per category and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBudget {
    pub category_id: String,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budgeted_amounts: Option<BudgetedAmounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budgets: Option<Vec<LegacyBudget>>,
}

impl Backup {
    /// Budgeted amounts, preferring the current field over legacy entries.
    pub fn resolved_budgeted_amounts(&self) -> BudgetedAmounts {
        if let Some(amounts) = &self.budgeted_amounts {
            return amounts.clone();
        }
        let mut amounts = BudgetedAmounts::new();
        for budget in self.budgets.iter().flatten() {
            amounts.insert(budget.category_id.clone(), budget.amount);
        }
        amounts
    }
}

pub fn default_file_name(today: NaiveDate) -> String {
    format!("treasurer-backup-{}.json", today.format("%Y-%m-%d"))
}

pub fn create_backup<S: KeyValueStore>(storage: &Storage<'_, S>, today: NaiveDate) -> Result<Backup> {
    let budgeted = storage.budgeted_amounts()?;
    let date = today.format("%Y-%m-%d").to_string();
    let budgets = budgeted
        .iter()
        .map(|(category_id, amount)| LegacyBudget {
            category_id: category_id.clone(),
            amount: *amount,
            date: date.clone(),
        })
        .collect();

    Ok(Backup {
        version: BACKUP_VERSION.to_string(),
        transactions: storage.transactions()?,
        categories: storage.categories()?,
        budgeted_amounts: Some(budgeted),
        budgets: Some(budgets),
    })
}

/// Overwrite transactions, categories and budgets with the backup's.
/// Mappings already in the store are kept and applied to the restored
/// transactions.
pub fn restore_backup<S: KeyValueStore>(storage: &Storage<'_, S>, backup: &Backup) -> Result<()> {
    if !backup.version.is_empty() && backup.version != BACKUP_VERSION {
        tracing::warn!("restoring backup with unrecognised version {:?}", backup.version);
    }
    let transactions =
        MappingStore::new(storage.store()).apply_stored_mappings(&backup.transactions)?;
    storage.save_transactions(&transactions)?;
    storage.save_categories(&ensure_defaults(&backup.categories))?;
    storage.save_budgeted_amounts(&backup.resolved_budgeted_amounts())?;
    tracing::info!(
        "restored {} transactions and {} categories",
        backup.transactions.len(),
        backup.categories.len()
    );
    Ok(())
}

pub fn read_backup(path: &Path) -> Result<Backup> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| TreasurerError::Backup(format!("{} is not a valid backup: {e}", path.display())))
}

pub fn write_backup(path: &Path, backup: &Backup) -> Result<()> {
    let json = serde_json::to_string_pretty(backup)?;
    std::fs::write(path, json)?;
    Ok(())
}
