use std::collections::HashSet;

use crate::error::{Result, TreasurerError};
use crate::models::{Category, CategoryType};

// (id, name, colour)
const DEFAULT_INCOME_CATEGORIES: &[(&str, &str, &str)] = &[
    ("income_su_grant", "Claimed SU grant", "#38A169"),
    ("income_membership", "Membership fees", "#2F855A"),
    ("income_transport", "Transport charges", "#276749"),
    ("income_events", "Event charges", "#22543D"),
    ("income_fundraising", "Fundraising", "#1C4532"),
    ("income_sponsorship", "Sponsorship", "#2C7A7B"),
    ("income_donations", "Donations", "#285E61"),
    ("income_kickback", "Kickback", "#234E52"),
    ("income_social", "Social events", "#1D4044"),
    ("income_awards", "Awards", "#154C4C"),
    ("income_misc", "Miscellaneous", "#0F3C3C"),
    ("income_tests", "Tests", "#0B3030"),
];

const DEFAULT_EXPENSE_CATEGORIES: &[(&str, &str, &str)] = &[
    ("expense_affiliation", "Affiliation fees", "#E53E3E"),
    ("expense_tests", "Tests", "#C53030"),
    ("expense_coaching", "Coaching", "#9B2C2C"),
    ("expense_match", "Match Costs", "#822727"),
    ("expense_facilities", "Facilities", "#63171B"),
    ("expense_safety", "Safety fees", "#E53E3E"),
    ("expense_training_equipment", "Training Equipment", "#C53030"),
    ("expense_playing_equipment", "Playing Equipment", "#9B2C2C"),
    ("expense_kit", "Kit", "#822727"),
    ("expense_transport_hire", "Transport hire", "#63171B"),
    ("expense_transport_fuel", "Transport fuel", "#E53E3E"),
    ("expense_accommodation", "Accommodation", "#C53030"),
    ("expense_events", "Events", "#9B2C2C"),
    ("expense_social", "Social events", "#822727"),
    ("expense_loans", "Loans and outstanding debt", "#63171B"),
    ("expense_ers", "ERS", "#E53E3E"),
    ("expense_advertising", "Advertising and promotion", "#C53030"),
    ("expense_misc", "Miscellaneous", "#9B2C2C"),
];

const NEW_INCOME_COLOR: &str = "#38A169";
const NEW_EXPENSE_COLOR: &str = "#E53E3E";

fn build(defaults: &[(&str, &str, &str)], category_type: CategoryType) -> Vec<Category> {
    defaults
        .iter()
        .map(|(id, name, color)| Category {
            id: id.to_string(),
            name: name.to_string(),
            category_type,
            color: color.to_string(),
            budgeted_values: None,
        })
        .collect()
}

/// Every default category, income first, in canonical order.
pub fn default_categories() -> Vec<Category> {
    let mut all = build(DEFAULT_INCOME_CATEGORIES, CategoryType::Income);
    all.extend(build(DEFAULT_EXPENSE_CATEGORIES, CategoryType::Expense));
    all
}

/// Append whichever defaults are missing (by id). Existing categories keep
/// their position and contents, including user edits to default ids.
pub fn ensure_defaults(existing: &[Category]) -> Vec<Category> {
    let existing_ids: HashSet<&str> = existing.iter().map(|c| c.id.as_str()).collect();
    let missing: Vec<Category> = default_categories()
        .into_iter()
        .filter(|c| !existing_ids.contains(c.id.as_str()))
        .collect();
    if !missing.is_empty() {
        tracing::debug!("adding {} missing default categories", missing.len());
    }

    let mut merged = existing.to_vec();
    merged.extend(missing);
    merged
}

pub fn new_category(name: &str, category_type: CategoryType) -> Result<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TreasurerError::EmptyCategoryName);
    }
    let color = match category_type {
        CategoryType::Income => NEW_INCOME_COLOR,
        CategoryType::Expense => NEW_EXPENSE_COLOR,
    };
    Ok(Category {
        id: format!("cat_{}", chrono::Utc::now().timestamp_millis()),
        name: name.to_string(),
        category_type,
        color: color.to_string(),
        budgeted_values: None,
    })
}

/// Drop a category by id. Transactions still pointing at it are left alone
/// and report as unassigned.
pub fn remove_category(categories: &[Category], id: &str) -> Result<Vec<Category>> {
    if !categories.iter().any(|c| c.id == id) {
        return Err(TreasurerError::UnknownCategory(id.to_string()));
    }
    Ok(categories.iter().filter(|c| c.id != id).cloned().collect())
}

/// Resolve a category by exact id, else by case-insensitive name. A name
/// shared by several categories is narrowed to `preferred` when given and
/// rejected if it still matches more than one.
pub fn find_category<'a>(
    categories: &'a [Category],
    id_or_name: &str,
    preferred: Option<CategoryType>,
) -> Result<&'a Category> {
    if let Some(found) = categories.iter().find(|c| c.id == id_or_name) {
        return Ok(found);
    }

    let mut matches: Vec<&Category> = categories
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case(id_or_name))
        .collect();
    if matches.len() > 1 {
        if let Some(kind) = preferred {
            matches.retain(|c| c.category_type == kind);
        }
    }

    match matches.as_slice() {
        [] => Err(TreasurerError::UnknownCategory(id_or_name.to_string())),
        [only] => Ok(*only),
        several => Err(TreasurerError::AmbiguousCategory {
            name: id_or_name.to_string(),
            ids: several.iter().map(|c| c.id.clone()).collect(),
        }),
    }
}
