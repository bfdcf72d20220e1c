use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::Transaction;

/// Transactions keyed by `YYYY-MM`.
pub type MonthGroups = BTreeMap<String, Vec<Transaction>>;

/// Parse a `dd/mm/yyyy` statement date.
pub fn parse_uk_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let d: u32 = parts[0].trim().parse().ok()?;
    let m: u32 = parts[1].trim().parse().ok()?;
    let y: i32 = parts[2].trim().parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Group by statement month, newest transaction first within each month.
/// Rows whose date cannot be parsed are left out.
pub fn group_by_month(transactions: &[Transaction]) -> MonthGroups {
    let mut groups = MonthGroups::new();
    for txn in transactions {
        let Some(date) = parse_uk_date(&txn.transaction_date) else {
            tracing::warn!("skipping transaction with invalid date {:?}", txn.transaction_date);
            continue;
        };
        groups.entry(month_key(date)).or_default().push(txn.clone());
    }
    for txns in groups.values_mut() {
        // stable, so same-day rows keep statement order
        txns.sort_by_key(|t| std::cmp::Reverse(parse_uk_date(&t.transaction_date)));
    }
    groups
}

/// Flatten back to one list, most recent month first.
pub fn flatten(groups: &MonthGroups) -> Vec<Transaction> {
    groups.values().rev().flatten().cloned().collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorizationStats {
    pub total: usize,
    pub categorized: usize,
    pub remaining: usize,
    pub percentage: f64,
}

pub fn categorization_stats<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> CategorizationStats {
    let mut total = 0usize;
    let mut categorized = 0usize;
    for txn in transactions {
        total += 1;
        if txn.is_categorized() {
            categorized += 1;
        }
    }
    let percentage = if total > 0 {
        categorized as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    CategorizationStats {
        total,
        categorized,
        remaining: total - categorized,
        percentage,
    }
}
