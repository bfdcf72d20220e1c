use treasurer::error::Result;
use treasurer::settings::{expand_home, get_data_dir, load_settings, save_settings, store_path_in};
use treasurer::storage::Storage;
use treasurer::store::SqliteStore;

pub fn run(data_dir: Option<String>) -> Result<()> {
    if let Some(dir) = data_dir {
        let mut settings = load_settings();
        settings.data_dir = expand_home(&dir);
        save_settings(&settings)?;
    }

    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let store_path = store_path_in(&data_dir);
    let store = SqliteStore::open(&store_path)?;
    let categories = Storage::new(&store).categories_with_defaults()?;

    println!("Data directory: {}", data_dir.display());
    println!("Store:          {}", store_path.display());
    println!("Categories:     {}", categories.len());
    Ok(())
}

pub fn clear_cache(yes: bool) -> Result<()> {
    if !yes {
        println!("This removes all transactions, categories, budgets and mappings.");
        println!("Run `treasurer clear-cache --yes` to confirm.");
        return Ok(());
    }
    let store = super::open_store()?;
    Storage::new(&store).clear_all()?;
    println!("All stored data cleared.");
    Ok(())
}
