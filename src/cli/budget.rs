use treasurer::categories::find_category;
use treasurer::error::{Result, TreasurerError};
use treasurer::fmt::money;
use treasurer::storage::{BudgetedAmounts, Storage};
use treasurer::store::SqliteStore;

fn resolve(storage: &Storage<'_, SqliteStore>, category: &str) -> Result<(String, String)> {
    let categories = storage.categories_with_defaults()?;
    let found = find_category(&categories, category, None)?;
    Ok((found.id.clone(), found.name.clone()))
}

pub fn set(category: &str, amount: f64) -> Result<()> {
    if amount < 0.0 {
        return Err(TreasurerError::Other("Budgeted amount cannot be negative".to_string()));
    }
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let (id, name) = resolve(&storage, category)?;
    let mut budgets = storage.budgeted_amounts()?;
    budgets.insert(id, amount);
    storage.save_budgeted_amounts(&budgets)?;
    println!("Budget for {name} set to {}", money(amount));
    Ok(())
}

pub fn clear(category: Option<&str>) -> Result<()> {
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    match category {
        Some(category) => {
            let (id, name) = resolve(&storage, category)?;
            let mut budgets = storage.budgeted_amounts()?;
            budgets.remove(&id);
            storage.save_budgeted_amounts(&budgets)?;
            println!("Cleared budget for {name}");
        }
        None => {
            storage.save_budgeted_amounts(&BudgetedAmounts::new())?;
            println!("Cleared all budgeted amounts");
        }
    }
    Ok(())
}

pub fn starting_balance(amount: f64) -> Result<()> {
    let store = super::open_store()?;
    Storage::new(&store).save_starting_balance(amount)?;
    println!("Starting balance set to {}", money(amount));
    Ok(())
}
