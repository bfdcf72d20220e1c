use comfy_table::{Cell, Table};

use treasurer::error::Result;
use treasurer::mappings::MappingStore;
use treasurer::storage::Storage;

pub fn list() -> Result<()> {
    let store = super::open_store()?;
    let categories = Storage::new(&store).categories()?;
    let mappings = MappingStore::new(&store).get_all()?;
    if mappings.is_empty() {
        println!("No saved mappings.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Original description", "Name", "Reference", "Category"]);
    for mapping in mappings.values() {
        let category = mapping
            .category
            .as_deref()
            .map(|id| {
                categories
                    .iter()
                    .find(|c| c.id == id)
                    .map_or(id.to_string(), |c| c.name.clone())
            })
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&mapping.original_description),
            Cell::new(&mapping.name),
            Cell::new(&mapping.reference),
            Cell::new(category),
        ]);
    }
    println!("Mappings\n{table}");
    Ok(())
}

pub fn clear() -> Result<()> {
    let store = super::open_store()?;
    let mappings = MappingStore::new(&store);
    let count = mappings.get_all()?.len();
    mappings.clear()?;
    println!("Cleared {count} mapping(s)");
    Ok(())
}
