use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::grouping::parse_uk_date;
use crate::models::{Category, CategoryType, Transaction};
use crate::storage::BudgetedAmounts;

/// Bucket for transactions without a category.
pub const UNASSIGNED: &str = "unassigned";

// ---------------------------------------------------------------------------
// Academic year
// ---------------------------------------------------------------------------

/// The academic year a date falls in, named by the calendar year it starts
/// in. Years run from 1 August to 31 July.
pub fn academic_year_of(date: NaiveDate) -> i32 {
    if date.month() >= 8 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// `2024` -> `"2024/25"`
pub fn format_academic_year(year: i32) -> String {
    format!("{year}/{:02}", (year + 1).rem_euclid(100))
}

/// Parse `2024` or `2024/25` into the starting year.
pub fn parse_academic_year(raw: &str) -> Option<i32> {
    let start = raw.trim().split('/').next()?;
    start.trim().parse().ok()
}

/// Month keys from August of `year` to July of the next.
pub fn academic_months(year: i32) -> Vec<String> {
    (8..=12)
        .map(|m| format!("{year:04}-{m:02}"))
        .chain((1..=7).map(|m| format!("{:04}-{m:02}", year + 1)))
        .collect()
}

/// Every academic year with at least one transaction, newest first.
pub fn available_academic_years(transactions: &[Transaction]) -> Vec<i32> {
    let years: BTreeSet<i32> = transactions
        .iter()
        .filter_map(|t| parse_uk_date(&t.transaction_date))
        .map(academic_year_of)
        .collect();
    years.into_iter().rev().collect()
}

// ---------------------------------------------------------------------------
// Yearly summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodTotals {
    /// Category id -> credits
    pub income: BTreeMap<String, f64>,
    /// Category id -> debits
    pub expenses: BTreeMap<String, f64>,
    pub total_income: f64,
    pub total_expenses: f64,
}

impl PeriodTotals {
    pub fn net_change(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    fn add(&mut self, category_id: &str, txn: &Transaction) {
        if let Some(credit) = txn.credit_amount.filter(|a| *a != 0.0) {
            *self.income.entry(category_id.to_string()).or_default() += credit;
            self.total_income += credit;
        }
        if let Some(debit) = txn.debit_amount.filter(|a| *a != 0.0) {
            *self.expenses.entry(category_id.to_string()).or_default() += debit;
            self.total_expenses += debit;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearlySummary {
    pub academic_year: i32,
    /// Twelve entries, August first.
    pub months: Vec<(String, PeriodTotals)>,
    pub year: PeriodTotals,
}

impl YearlySummary {
    pub fn month(&self, key: &str) -> Option<&PeriodTotals> {
        self.months.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    /// Category ids with income in the year, in category order, with the
    /// unassigned bucket last.
    pub fn active_income(&self, categories: &[Category]) -> Vec<String> {
        active_ids(&self.year.income, categories)
    }

    pub fn active_expenses(&self, categories: &[Category]) -> Vec<String> {
        active_ids(&self.year.expenses, categories)
    }
}

fn active_ids(totals: &BTreeMap<String, f64>, categories: &[Category]) -> Vec<String> {
    let mut ids: Vec<String> = categories
        .iter()
        .filter(|c| totals.contains_key(&c.id))
        .map(|c| c.id.clone())
        .collect();
    // ids of deleted categories, then unassigned
    ids.extend(
        totals
            .keys()
            .filter(|k| k.as_str() != UNASSIGNED && !categories.iter().any(|c| &c.id == *k))
            .cloned(),
    );
    if totals.contains_key(UNASSIGNED) {
        ids.push(UNASSIGNED.to_string());
    }
    ids
}

/// Income and expense totals per category for each month of the academic
/// year. Transactions outside the year or with unreadable dates are ignored.
pub fn yearly_summary(transactions: &[Transaction], academic_year: i32) -> YearlySummary {
    let mut months: Vec<(String, PeriodTotals)> = academic_months(academic_year)
        .into_iter()
        .map(|k| (k, PeriodTotals::default()))
        .collect();
    let mut year = PeriodTotals::default();

    for txn in transactions {
        let Some(date) = parse_uk_date(&txn.transaction_date) else {
            continue;
        };
        if academic_year_of(date) != academic_year {
            continue;
        }
        let key = format!("{:04}-{:02}", date.year(), date.month());
        let category_id = txn.category_id().unwrap_or(UNASSIGNED);
        if let Some((_, totals)) = months.iter_mut().find(|(k, _)| *k == key) {
            totals.add(category_id, txn);
        }
        year.add(category_id, txn);
    }

    YearlySummary {
        academic_year,
        months,
        year,
    }
}

// ---------------------------------------------------------------------------
// Budget summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLine {
    pub category_id: String,
    pub category_name: String,
    pub category_type: CategoryType,
    pub budgeted: f64,
    pub actual: f64,
    /// Positive is good: income above budget, or spending under it.
    pub variance: f64,
}

impl BudgetLine {
    /// Variance as a whole percentage of the budget (of 1 when unbudgeted).
    pub fn variance_percent(&self) -> f64 {
        let base = if self.budgeted == 0.0 { 1.0 } else { self.budgeted };
        (self.variance / base * 100.0).round().abs()
    }

    pub fn is_active(&self) -> bool {
        self.budgeted != 0.0 || self.actual != 0.0
    }
}

/// Budget against actual for every category: credits count for income
/// categories, debits for expense ones. Income categories come first, then
/// each type is sorted by name.
pub fn budget_summary(
    transactions: &[Transaction],
    categories: &[Category],
    budgeted: &BudgetedAmounts,
) -> Vec<BudgetLine> {
    let mut lines: Vec<BudgetLine> = categories
        .iter()
        .map(|category| {
            let actual: f64 = transactions
                .iter()
                .filter(|t| t.category_id() == Some(category.id.as_str()))
                .map(|t| match category.category_type {
                    CategoryType::Income => t.credit_amount.unwrap_or(0.0),
                    CategoryType::Expense => t.debit_amount.unwrap_or(0.0),
                })
                .sum();
            let budget = budgeted.get(&category.id).copied().unwrap_or(0.0);
            let variance = match category.category_type {
                CategoryType::Income => actual - budget,
                CategoryType::Expense => budget - actual,
            };
            BudgetLine {
                category_id: category.id.clone(),
                category_name: category.name.clone(),
                category_type: category.category_type,
                budgeted: budget,
                actual,
                variance,
            }
        })
        .collect();

    lines.sort_by(|a, b| {
        let rank = |t: CategoryType| matches!(t, CategoryType::Expense);
        rank(a.category_type)
            .cmp(&rank(b.category_type))
            .then_with(|| a.category_name.to_lowercase().cmp(&b.category_name.to_lowercase()))
    });
    lines
}
