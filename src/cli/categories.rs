use colored::Colorize;
use comfy_table::{Cell, Table};

use treasurer::categories::{default_categories, find_category, new_category, remove_category};
use treasurer::error::{Result, TreasurerError};
use treasurer::models::CategoryType;
use treasurer::storage::Storage;

pub fn list() -> Result<()> {
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let categories = storage.categories_with_defaults()?;
    let budgets = storage.budgeted_amounts()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "Colour", "Budget"]);
    for cat in &categories {
        let kind = match cat.category_type {
            CategoryType::Income => cat.category_type.as_str().green(),
            CategoryType::Expense => cat.category_type.as_str().red(),
        };
        table.add_row(vec![
            Cell::new(&cat.id),
            Cell::new(&cat.name),
            Cell::new(kind),
            Cell::new(&cat.color),
            Cell::new(
                budgets
                    .get(&cat.id)
                    .map(|b| treasurer::fmt::money(*b))
                    .unwrap_or_default(),
            ),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn add(name: &str, category_type: &str) -> Result<()> {
    let kind = CategoryType::parse(category_type).ok_or_else(|| {
        TreasurerError::Other(format!(
            "Invalid category type {category_type:?}, expected income or expense"
        ))
    })?;
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let mut categories = storage.categories_with_defaults()?;
    let category = new_category(name, kind)?;
    println!("Added category: {} ({})", category.name, category.id);
    categories.push(category);
    storage.save_categories(&categories)?;
    Ok(())
}

pub fn delete(id_or_name: &str) -> Result<()> {
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let categories = storage.categories_with_defaults()?;
    let found = find_category(&categories, id_or_name, None)?;
    let (id, name) = (found.id.clone(), found.name.clone());
    // defaults are restored on every load, so deleting one would not stick
    if default_categories().iter().any(|c| c.id == id) {
        return Err(TreasurerError::Other(format!(
            "{name} is a default category and cannot be deleted"
        )));
    }

    storage.save_categories(&remove_category(&categories, &id)?)?;
    let mut budgets = storage.budgeted_amounts()?;
    if budgets.remove(&id).is_some() {
        storage.save_budgeted_amounts(&budgets)?;
    }
    println!("Deleted category {name} ({id})");
    Ok(())
}
