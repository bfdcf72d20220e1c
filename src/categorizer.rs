use std::collections::HashMap;

use crate::error::Result;
use crate::grouping::MonthGroups;
use crate::mappings::MappingStore;
use crate::models::{Category, CategoryType, Mapping, Transaction};
use crate::parser::{parse_description, ParsedDescription};
use crate::store::KeyValueStore;

/// Keyword rules tried before the generic name match. Each entry sends
/// matching descriptions to the first candidate category whose name contains
/// `category_name_contains`.
struct SpecialRule {
    keywords: &'static [&'static str],
    direction: CategoryType,
    category_name_contains: &'static str,
}

const SPECIAL_RULES: &[SpecialRule] = &[SpecialRule {
    keywords: &["umpire", "referee"],
    direction: CategoryType::Expense,
    category_name_contains: "match",
}];

const MIN_KEYWORD_LEN: usize = 4;

pub struct CategorizeOutcome {
    pub groups: MonthGroups,
    pub changed: bool,
    pub categorized: usize,
    pub uncategorized: usize,
}

/// Lowercased reference -> category id, learned from transactions that
/// already carry a category. The first transaction seen for a reference wins.
fn learn_patterns(groups: &MonthGroups) -> HashMap<String, String> {
    let mut patterns = HashMap::new();
    for txn in groups.values().rev().flatten() {
        let Some(category) = txn.category_id() else {
            continue;
        };
        let parsed = parse_description(&txn.transaction_description, &txn.transaction_type);
        if parsed.reference.is_empty() {
            continue;
        }
        patterns
            .entry(parsed.reference.to_lowercase())
            .or_insert_with(|| category.to_string());
    }
    patterns
}

fn special_rule_match<'a>(
    description: &str,
    direction: CategoryType,
    candidates: &[&'a Category],
) -> Option<&'a Category> {
    SPECIAL_RULES
        .iter()
        .filter(|rule| rule.direction == direction)
        .filter(|rule| rule.keywords.iter().any(|k| description.contains(k)))
        .find_map(|rule| {
            candidates
                .iter()
                .find(|c| c.name.to_lowercase().contains(rule.category_name_contains))
                .copied()
        })
}

fn keyword_match<'a>(description: &str, candidates: &[&'a Category]) -> Option<&'a Category> {
    candidates.iter().copied().find(|category| {
        category
            .name
            .to_lowercase()
            .split_whitespace()
            .filter(|k| k.chars().count() >= MIN_KEYWORD_LEN)
            .any(|k| description.contains(k))
    })
}

fn match_category(
    txn: &Transaction,
    parsed: &ParsedDescription,
    patterns: &HashMap<String, String>,
    categories: &[Category],
) -> Option<String> {
    if !parsed.reference.is_empty() {
        if let Some(category) = patterns.get(&parsed.reference.to_lowercase()) {
            tracing::debug!("{:?} matched learned reference", txn.transaction_description);
            return Some(category.clone());
        }
    }

    let direction = txn.direction();
    let candidates: Vec<&Category> = categories
        .iter()
        .filter(|c| c.category_type == direction)
        .collect();
    let description = txn.transaction_description.to_lowercase();

    let matched = special_rule_match(&description, direction, &candidates)
        .or_else(|| keyword_match(&description, &candidates))?;
    tracing::debug!("{:?} matched category {:?}", txn.transaction_description, matched.name);
    Some(matched.id.clone())
}

/// Assign categories to every uncategorized transaction that a learned
/// reference, a special rule, or a category keyword can place. Each
/// assignment is saved as a mapping so the same raw description resolves
/// without heuristics next time.
///
/// Rounds repeat until one assigns nothing, so categories assigned in one
/// round can teach references to the next and a second call is a no-op.
pub fn auto_categorize<S: KeyValueStore>(
    groups: &MonthGroups,
    categories: &[Category],
    mappings: &MappingStore<'_, S>,
) -> Result<CategorizeOutcome> {
    let mut groups = groups.clone();
    let mut categorized = 0usize;
    let mut saved: Vec<Mapping> = Vec::new();

    loop {
        let patterns = learn_patterns(&groups);
        let mut assigned = 0usize;

        for txns in groups.values_mut().rev() {
            for txn in txns.iter_mut() {
                if txn.is_categorized() {
                    continue;
                }
                let parsed = parse_description(&txn.transaction_description, &txn.transaction_type);
                let Some(category) = match_category(txn, &parsed, &patterns, categories) else {
                    continue;
                };
                saved.push(Mapping {
                    original_description: txn.transaction_description.clone(),
                    name: parsed.name,
                    reference: parsed.reference,
                    category: Some(category.clone()),
                });
                txn.category = Some(category);
                assigned += 1;
            }
        }

        categorized += assigned;
        if assigned == 0 {
            break;
        }
    }

    if !saved.is_empty() {
        mappings.save_categorized(&saved)?;
    }

    let uncategorized = groups
        .values()
        .flatten()
        .filter(|t| !t.is_categorized())
        .count();
    tracing::info!("auto-categorized {categorized} transactions, {uncategorized} left");

    Ok(CategorizeOutcome {
        groups,
        changed: categorized > 0,
        categorized,
        uncategorized,
    })
}
