use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use treasurer::error::Result;
use treasurer::fmt::{money, money_or_blank, month_label};
use treasurer::grouping::{categorization_stats, group_by_month};
use treasurer::models::Category;
use treasurer::storage::Storage;

fn category_cell(categories: &[Category], id: Option<&str>) -> Cell {
    match id {
        Some(id) => {
            let name = categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("{id} (deleted)"));
            Cell::new(name)
        }
        None => Cell::new("uncategorized".dimmed()),
    }
}

pub fn list(month: Option<String>, uncategorized: bool) -> Result<()> {
    let month = super::parse_month_opt(&month)?;
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let categories = storage.categories_with_defaults()?;
    let groups = group_by_month(&storage.transactions()?);

    if groups.is_empty() {
        println!("No transactions. Run `treasurer import <file>` first.");
        return Ok(());
    }

    for (key, txns) in groups.iter().rev() {
        if month.as_deref().is_some_and(|m| m != key) {
            continue;
        }
        let shown: Vec<_> = txns
            .iter()
            .filter(|t| !uncategorized || !t.is_categorized())
            .collect();
        if shown.is_empty() {
            continue;
        }

        let mut table = Table::new();
        table.set_header(vec!["Date", "Type", "Description", "Debit", "Credit", "Balance", "Category"]);
        for txn in &shown {
            table.add_row(vec![
                Cell::new(&txn.transaction_date),
                Cell::new(&txn.transaction_type),
                Cell::new(&txn.transaction_description),
                Cell::new(money_or_blank(txn.debit_amount.unwrap_or(0.0))).set_alignment(CellAlignment::Right),
                Cell::new(money_or_blank(txn.credit_amount.unwrap_or(0.0))).set_alignment(CellAlignment::Right),
                Cell::new(money(txn.balance)).set_alignment(CellAlignment::Right),
                category_cell(&categories, txn.category_id()),
            ]);
        }
        let stats = categorization_stats(txns.iter());
        println!(
            "{}  {}/{} categorized\n{table}\n",
            month_label(key).bold(),
            stats.categorized,
            stats.total
        );
    }
    Ok(())
}
