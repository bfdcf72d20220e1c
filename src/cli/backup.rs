use std::path::PathBuf;

use treasurer::backup::{create_backup, default_file_name, read_backup, restore_backup, write_backup};
use treasurer::error::Result;
use treasurer::storage::Storage;

pub fn export(output: Option<String>) -> Result<()> {
    let store = super::open_store()?;
    let storage = Storage::new(&store);

    let today = chrono::Local::now().date_naive();
    let dest_path = match output {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(default_file_name(today)),
    };

    let backup = create_backup(&storage, today)?;
    write_backup(&dest_path, &backup)?;

    println!("Backup saved to {}", dest_path.display());
    println!(
        "{} transactions, {} categories",
        backup.transactions.len(),
        backup.categories.len()
    );
    Ok(())
}

pub fn restore(file: &str) -> Result<()> {
    let backup = read_backup(&PathBuf::from(file))?;
    let store = super::open_store()?;
    restore_backup(&Storage::new(&store), &backup)?;
    println!(
        "Restored {} transactions from {file}",
        backup.transactions.len()
    );
    Ok(())
}
