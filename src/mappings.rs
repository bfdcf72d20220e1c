//! User corrections to parsed descriptions, keyed by the raw description
//! text they were made against, and the rewrite that applies them.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Mapping, Transaction};
use crate::parser::{parse_description, raw_name_token, ParsedDescription};
use crate::store::{KeyValueStore, MAPPINGS_KEY};

pub type Mappings = BTreeMap<String, Mapping>;

pub struct MappingStore<'a, S: KeyValueStore> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> MappingStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upsert; the last save for a description wins.
    pub fn save(
        &self,
        original_description: &str,
        name: &str,
        reference: &str,
        category: Option<&str>,
    ) -> Result<()> {
        let mut mappings = self.get_all()?;
        mappings.insert(
            original_description.to_string(),
            Mapping {
                original_description: original_description.to_string(),
                name: name.to_string(),
                reference: reference.to_string(),
                category: category.map(str::to_string),
            },
        );
        self.store
            .set(MAPPINGS_KEY, &serde_json::to_string(&mappings)?)?;
        tracing::debug!("saved mapping for {original_description:?}");
        Ok(())
    }

    /// Save category assignments in one write. A description that already
    /// has a mapping keeps its corrected name and reference.
    pub fn save_categorized(&self, assigned: &[Mapping]) -> Result<()> {
        let mut mappings = self.get_all()?;
        for mapping in assigned {
            mappings
                .entry(mapping.original_description.clone())
                .and_modify(|existing| existing.category = mapping.category.clone())
                .or_insert_with(|| mapping.clone());
        }
        self.store
            .set(MAPPINGS_KEY, &serde_json::to_string(&mappings)?)?;
        tracing::debug!("saved {} categorized mappings", assigned.len());
        Ok(())
    }

    pub fn get_all(&self) -> Result<Mappings> {
        let Some(raw) = self.store.get(MAPPINGS_KEY)? else {
            return Ok(Mappings::new());
        };
        match serde_json::from_str(&raw) {
            Ok(mappings) => Ok(mappings),
            Err(e) => {
                tracing::warn!("stored mappings are unreadable, ignoring them: {e}");
                Ok(Mappings::new())
            }
        }
    }

    pub fn get(&self, description: &str) -> Result<Option<Mapping>> {
        Ok(self.get_all()?.remove(description))
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(MAPPINGS_KEY)
    }

    pub fn apply_stored_mappings(&self, transactions: &[Transaction]) -> Result<Vec<Transaction>> {
        Ok(apply_mappings(transactions, &self.get_all()?))
    }

    /// Record a user edit of a transaction's name, reference or category and
    /// return the transaction as it should now be displayed.
    pub fn record_edit(
        &self,
        transaction: &Transaction,
        name: &str,
        reference: &str,
        category: Option<&str>,
    ) -> Result<Transaction> {
        let category = category.or(transaction.category_id());
        self.save(&transaction.transaction_description, name, reference, category)?;
        let mapping = Mapping {
            original_description: transaction.transaction_description.clone(),
            name: name.to_string(),
            reference: reference.to_string(),
            category: category.map(str::to_string),
        };
        Ok(apply_mapping(transaction, &mapping))
    }
}

/// Swap the parsed name and reference inside `description` for the mapped
/// ones. Substitution is by first substring occurrence, so text that also
/// appears elsewhere in the description can be replaced in the wrong place.
/// A fixed display name absent from the description is swapped via the raw
/// token it was parsed from.
pub fn rewrite_description(
    description: &str,
    original: &ParsedDescription,
    mapping: &Mapping,
) -> String {
    let mut rewritten = description.to_string();

    if !original.name.is_empty() {
        let target = match raw_name_token(&original.name) {
            Some(token) if !description.contains(&original.name) => token,
            _ => original.name.as_str(),
        };
        rewritten = rewritten.replacen(target, &mapping.name, 1);
    }

    if !mapping.reference.is_empty() {
        if !original.reference.is_empty() {
            rewritten = rewritten.replacen(&original.reference, &mapping.reference, 1);
        } else {
            let with_reference = format!("{} {}", mapping.name, mapping.reference);
            rewritten = rewritten.replacen(&mapping.name, &with_reference, 1);
        }
    }

    rewritten
}

fn apply_mapping(transaction: &Transaction, mapping: &Mapping) -> Transaction {
    let original = parse_description(
        &transaction.transaction_description,
        &transaction.transaction_type,
    );
    let category = mapping
        .category
        .clone()
        .filter(|c| !c.is_empty())
        .or_else(|| transaction.category.clone());

    Transaction {
        transaction_description: rewrite_description(
            &transaction.transaction_description,
            &original,
            mapping,
        ),
        category,
        ..transaction.clone()
    }
}

/// Rewrite every transaction that has a mapping for its exact description.
/// Transactions without one pass through unchanged.
pub fn apply_mappings(transactions: &[Transaction], mappings: &Mappings) -> Vec<Transaction> {
    let mut applied = 0usize;
    let result = transactions
        .iter()
        .map(|txn| match mappings.get(&txn.transaction_description) {
            Some(mapping) => {
                applied += 1;
                apply_mapping(txn, mapping)
            }
            None => txn.clone(),
        })
        .collect();
    tracing::debug!("applied {applied} stored mappings to {} transactions", transactions.len());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn txn(txn_type: &str, description: &str) -> Transaction {
        Transaction {
            transaction_date: "15/03/2024".to_string(),
            transaction_type: txn_type.to_string(),
            sort_code: String::new(),
            account_number: String::new(),
            transaction_description: description.to_string(),
            debit_amount: Some(20.0),
            credit_amount: None,
            balance: 100.0,
            category: None,
        }
    }

    fn mapping(name: &str, reference: &str, category: Option<&str>) -> Mapping {
        Mapping {
            original_description: String::new(),
            name: name.to_string(),
            reference: reference.to_string(),
            category: category.map(str::to_string),
        }
    }

    fn parsed(name: &str, reference: &str) -> ParsedDescription {
        ParsedDescription {
            name: name.to_string(),
            reference: reference.to_string(),
        }
    }

    #[test]
    fn test_save_and_get_all() {
        let store = MemoryStore::new();
        let mappings = MappingStore::new(&store);
        mappings.save("RAW ONE", "One", "Ref", Some("expense_kit")).unwrap();
        mappings.save("RAW TWO", "Two", "", None).unwrap();
        let all = mappings.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["RAW ONE"].category.as_deref(), Some("expense_kit"));
        assert_eq!(all["RAW TWO"].original_description, "RAW TWO");
    }

    #[test]
    fn test_save_is_last_write_wins() {
        let store = MemoryStore::new();
        let mappings = MappingStore::new(&store);
        mappings.save("RAW", "First", "A", None).unwrap();
        mappings.save("RAW", "Second", "B", Some("income_misc")).unwrap();
        let m = mappings.get("RAW").unwrap().unwrap();
        assert_eq!(m.name, "Second");
        assert_eq!(m.reference, "B");
        assert_eq!(mappings.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_save_categorized_keeps_user_corrections() {
        let store = MemoryStore::new();
        let mappings = MappingStore::new(&store);
        mappings.save("RAW", "Corrected", "Ref", None).unwrap();
        let assigned = vec![
            Mapping {
                original_description: "RAW".to_string(),
                name: "RAW".to_string(),
                reference: String::new(),
                category: Some("expense_kit".to_string()),
            },
            Mapping {
                original_description: "OTHER".to_string(),
                name: "OTHER".to_string(),
                reference: String::new(),
                category: Some("expense_misc".to_string()),
            },
        ];
        mappings.save_categorized(&assigned).unwrap();
        let all = mappings.get_all().unwrap();
        assert_eq!(all["RAW"].name, "Corrected");
        assert_eq!(all["RAW"].category.as_deref(), Some("expense_kit"));
        assert_eq!(all["OTHER"].category.as_deref(), Some("expense_misc"));
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = MemoryStore::new();
        let mappings = MappingStore::new(&store);
        mappings.save("RAW", "Name", "Ref", None).unwrap();
        mappings.clear().unwrap();
        assert!(mappings.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_store_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(MAPPINGS_KEY, "{not json").unwrap();
        let mappings = MappingStore::new(&store);
        assert!(mappings.get_all().unwrap().is_empty());
        mappings.save("RAW", "Name", "", None).unwrap();
        assert_eq!(mappings.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_rewrite_replaces_name_and_reference() {
        let out = rewrite_description(
            "JOHN SMITH 123123456789012345 SUBS 654321 01JAN24",
            &parsed("JOHN SMITH", "SUBS"),
            &mapping("J Smith", "Membership", None),
        );
        assert_eq!(out, "J Smith 123123456789012345 Membership 654321 01JAN24");
    }

    #[test]
    fn test_rewrite_appends_reference_when_none_existed() {
        let out = rewrite_description(
            "BRITISH GAS",
            &parsed("BRITISH GAS", ""),
            &mapping("Gas", "Clubhouse", None),
        );
        assert_eq!(out, "Gas Clubhouse");
    }

    #[test]
    fn test_rewrite_keeps_reference_when_mapping_has_none() {
        let out = rewrite_description(
            "IONOS CLOUD LTD. INV 7",
            &parsed("IONOS CLOUD LTD.", "INV 7"),
            &mapping("Ionos", "", None),
        );
        assert_eq!(out, "Ionos INV 7");
    }

    #[test]
    fn test_rewrite_replaces_first_occurrence_only() {
        // The reference text also appears inside the name; the first hit wins.
        let out = rewrite_description(
            "KIT KIT SHOP",
            &parsed("KIT SHOP", "KIT"),
            &mapping("Shop", "Kit order", None),
        );
        assert_eq!(out, "Kit order Shop");
    }

    #[test]
    fn test_rewrite_fixed_name_replaces_raw_token() {
        let out = rewrite_description(
            "PLYRDATA 123456",
            &parsed("Playerdata", "123456"),
            &mapping("Kit Supplier", "GPS vests", None),
        );
        assert_eq!(out, "Kit Supplier GPS vests");

        let out = rewrite_description(
            "EDINBURGH UNIVERSI 000123456789012345 CLUBDUES 654321 10:00",
            &parsed("EUWHC", "CLUBDUES"),
            &mapping("Hockey Club", "Club dues", None),
        );
        assert_eq!(out, "Hockey Club 000123456789012345 Club dues 654321 10:00");
    }

    #[test]
    fn test_rewrite_unknown_name_not_present_leaves_text() {
        let out = rewrite_description(
            "ACME 99",
            &parsed("Acme Ltd", "99"),
            &mapping("Acme", "Order", None),
        );
        assert_eq!(out, "ACME Order");
    }

    #[test]
    fn test_apply_without_mapping_is_identity() {
        let txns = vec![txn("DD", "BRITISH GAS")];
        let out = apply_mappings(&txns, &Mappings::new());
        assert_eq!(out, txns);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let txns = vec![txn("DD", "BRITISH GAS")];
        let mut mappings = Mappings::new();
        mappings.insert("BRITISH GAS".to_string(), mapping("Gas", "", Some("expense_facilities")));
        let out = apply_mappings(&txns, &mappings);
        assert_eq!(txns[0].transaction_description, "BRITISH GAS");
        assert_eq!(txns[0].category, None);
        assert_eq!(out[0].transaction_description, "Gas");
        assert_eq!(out[0].category.as_deref(), Some("expense_facilities"));
    }

    #[test]
    fn test_apply_keeps_category_when_mapping_has_none() {
        let mut t = txn("DD", "BRITISH GAS");
        t.category = Some("expense_misc".to_string());
        let mut mappings = Mappings::new();
        mappings.insert("BRITISH GAS".to_string(), mapping("Gas", "", None));
        let out = apply_mappings(&[t], &mappings);
        assert_eq!(out[0].category.as_deref(), Some("expense_misc"));
    }

    #[test]
    fn test_saved_mapping_round_trip() {
        let store = MemoryStore::new();
        let mappings = MappingStore::new(&store);
        let raw = "JOHN SMITH 123123456789012345 SUBS 654321 01JAN24";
        mappings.save(raw, "John Smith", "Membership 2024", Some("income_membership")).unwrap();

        let out = mappings.apply_stored_mappings(&[txn("FPI", raw)]).unwrap();
        assert!(out[0].transaction_description.contains("John Smith"));
        assert!(out[0].transaction_description.contains("Membership 2024"));
        assert_eq!(out[0].category.as_deref(), Some("income_membership"));
    }

    #[test]
    fn test_saved_playerdata_name_survives_apply() {
        let store = MemoryStore::new();
        let mappings = MappingStore::new(&store);
        mappings
            .save("PLYRDATA 123456", "Kit Supplier", "GPS vests", Some("expense_kit"))
            .unwrap();

        let out = mappings
            .apply_stored_mappings(&[txn("DD", "PLYRDATA 123456")])
            .unwrap();
        assert!(out[0].transaction_description.contains("Kit Supplier"));
        assert!(out[0].transaction_description.contains("GPS vests"));
        assert_eq!(out[0].category.as_deref(), Some("expense_kit"));
    }

    #[test]
    fn test_record_edit_saves_and_rewrites() {
        let store = MemoryStore::new();
        let mappings = MappingStore::new(&store);
        let t = txn("DD", "IONOS CLOUD LTD. INV 7");
        let edited = mappings
            .record_edit(&t, "Ionos", "Web hosting", Some("expense_advertising"))
            .unwrap();
        assert_eq!(edited.transaction_description, "Ionos Web hosting");
        assert_eq!(edited.category.as_deref(), Some("expense_advertising"));
        let saved = mappings.get("IONOS CLOUD LTD. INV 7").unwrap().unwrap();
        assert_eq!(saved.reference, "Web hosting");
    }

    #[test]
    fn test_record_edit_keeps_existing_category() {
        let store = MemoryStore::new();
        let mappings = MappingStore::new(&store);
        let mut t = txn("DD", "BRITISH GAS");
        t.category = Some("expense_facilities".to_string());
        mappings.record_edit(&t, "Gas", "", None).unwrap();
        let saved = mappings.get("BRITISH GAS").unwrap().unwrap();
        assert_eq!(saved.category.as_deref(), Some("expense_facilities"));
    }
}
