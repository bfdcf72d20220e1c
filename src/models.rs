use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Some(Self::Income),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub category_id: String,
    pub amount: f64,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budgeted_values: Option<Vec<Budget>>,
}

/// One row of a bank statement. `transaction_description` is rewritten in
/// place when stored mappings are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_date: String,
    pub transaction_type: String,
    #[serde(default)]
    pub sort_code: String,
    #[serde(default)]
    pub account_number: String,
    pub transaction_description: String,
    pub debit_amount: Option<f64>,
    pub credit_amount: Option<f64>,
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    /// Income when the bank credited the account, expense otherwise.
    pub fn direction(&self) -> CategoryType {
        if self.credit_amount.is_some() {
            CategoryType::Income
        } else {
            CategoryType::Expense
        }
    }

    /// Category id, treating an empty string as unset.
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn is_categorized(&self) -> bool {
        self.category_id().is_some()
    }
}

/// A user correction keyed by the raw description it was made against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub original_description: String,
    pub name: String,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_json_uses_camel_case() {
        let json = r#"{
            "transactionDate": "15/03/2024",
            "transactionType": "FPO",
            "sortCode": "'80-22-60",
            "accountNumber": "12345678",
            "transactionDescription": "SOMEONE 123 REF",
            "debitAmount": 50.0,
            "creditAmount": null,
            "balance": 950.5
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.transaction_type, "FPO");
        assert_eq!(txn.debit_amount, Some(50.0));
        assert_eq!(txn.credit_amount, None);
        assert_eq!(txn.category, None);
        assert_eq!(txn.direction(), CategoryType::Expense);

        let out = serde_json::to_value(&txn).unwrap();
        assert!(out.get("transactionDescription").is_some());
        assert!(out.get("category").is_none());
    }

    #[test]
    fn test_category_type_field_name() {
        let json = r##"{"id":"income_misc","name":"Miscellaneous","type":"INCOME","color":"#0F3C3C"}"##;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert_eq!(cat.category_type, CategoryType::Income);
        assert!(cat.budgeted_values.is_none());
    }

    #[test]
    fn test_empty_category_is_uncategorized() {
        let mut txn = Transaction {
            transaction_date: "01/01/2024".to_string(),
            transaction_type: "DD".to_string(),
            sort_code: String::new(),
            account_number: String::new(),
            transaction_description: "X".to_string(),
            debit_amount: None,
            credit_amount: Some(10.0),
            balance: 0.0,
            category: Some(String::new()),
        };
        assert!(!txn.is_categorized());
        assert_eq!(txn.direction(), CategoryType::Income);
        txn.category = Some("income_misc".to_string());
        assert_eq!(txn.category_id(), Some("income_misc"));
    }

    #[test]
    fn test_category_type_parse() {
        assert_eq!(CategoryType::parse("income"), Some(CategoryType::Income));
        assert_eq!(CategoryType::parse(" EXPENSE "), Some(CategoryType::Expense));
        assert_eq!(CategoryType::parse("transfer"), None);
    }
}
