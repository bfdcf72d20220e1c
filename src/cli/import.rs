use std::path::PathBuf;

use treasurer::error::Result;
use treasurer::grouping::categorization_stats;
use treasurer::importer::import_file;
use treasurer::storage::Storage;

pub fn run(file: &str) -> Result<()> {
    let file_path = PathBuf::from(file);
    let store = super::open_store()?;
    let storage = Storage::new(&store);

    let result = import_file(&storage, &file_path)?;

    if result.duplicate_file {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }

    let stats = categorization_stats(&storage.transactions()?);
    println!("{} imported", result.imported);
    println!(
        "{} categorized from saved mappings, {} uncategorized",
        stats.categorized, stats.remaining
    );
    if stats.remaining > 0 {
        println!("Run `treasurer categorize` to auto-categorize the rest.");
    }
    Ok(())
}
