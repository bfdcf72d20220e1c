use treasurer::categorizer::auto_categorize;
use treasurer::error::Result;
use treasurer::grouping::{categorization_stats, flatten, group_by_month, parse_uk_date};
use treasurer::mappings::MappingStore;
use treasurer::storage::Storage;

pub fn run() -> Result<()> {
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let transactions = storage.transactions()?;
    if transactions.is_empty() {
        println!("No transactions. Run `treasurer import <file>` first.");
        return Ok(());
    }

    let categories = storage.categories_with_defaults()?;
    let groups = group_by_month(&transactions);
    let outcome = auto_categorize(&groups, &categories, &MappingStore::new(&store))?;

    if outcome.changed {
        let mut updated = flatten(&outcome.groups);
        // rows that grouping skipped are kept as they were
        updated.extend(
            transactions
                .iter()
                .filter(|t| parse_uk_date(&t.transaction_date).is_none())
                .cloned(),
        );
        storage.save_transactions(&updated)?;
    }

    let stats = categorization_stats(outcome.groups.values().flatten());
    println!(
        "{} categorized, {} still uncategorized",
        outcome.categorized, outcome.uncategorized
    );
    println!(
        "{}/{} transactions categorized ({:.0}%)",
        stats.categorized, stats.total, stats.percentage
    );
    Ok(())
}
