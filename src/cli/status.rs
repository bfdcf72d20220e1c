use treasurer::error::Result;
use treasurer::fmt::money;
use treasurer::grouping::categorization_stats;
use treasurer::mappings::MappingStore;
use treasurer::settings::{get_data_dir, store_path_in};
use treasurer::storage::Storage;
use treasurer::store::SqliteStore;

pub fn run() -> Result<()> {
    let data_dir = get_data_dir();
    let store_path = store_path_in(&data_dir);

    println!("Data dir:   {}", data_dir.display());
    println!("Store:      {}", store_path.display());

    if !store_path.exists() {
        println!();
        println!("Store not found. Run `treasurer init` to set up.");
        return Ok(());
    }

    let store = SqliteStore::open(&store_path)?;
    let storage = Storage::new(&store);
    let transactions = storage.transactions()?;
    let stats = categorization_stats(&transactions);
    let latest_balance = transactions.first().map(|t| t.balance);

    println!();
    println!("Transactions:      {}", stats.total);
    println!(
        "Categorized:       {} ({:.0}%)",
        stats.categorized, stats.percentage
    );
    println!("Uncategorized:     {}", stats.remaining);
    println!("Categories:        {}", storage.categories()?.len());
    println!("Mappings:          {}", MappingStore::new(&store).get_all()?.len());
    println!("Budgets set:       {}", storage.budgeted_amounts()?.len());
    println!("Starting balance:  {}", money(storage.starting_balance()?));
    if let Some(balance) = latest_balance {
        println!("Latest balance:    {}", money(balance));
    }
    println!("Stored keys:       {}", store.keys()?.join(", "));
    Ok(())
}
