use treasurer::categories::find_category;
use treasurer::error::{Result, TreasurerError};
use treasurer::mappings::MappingStore;
use treasurer::parser::parse_description;
use treasurer::storage::Storage;

pub fn run(
    description: &str,
    name: Option<&str>,
    reference: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let mut transactions = storage.transactions()?;
    let Some(first) = transactions
        .iter()
        .find(|t| t.transaction_description == description)
    else {
        return Err(TreasurerError::Other(format!(
            "No transaction with description {description:?}"
        )));
    };

    let categories = storage.categories_with_defaults()?;
    let category_id = category
        .map(|c| {
            find_category(&categories, c, Some(first.direction())).map(|found| found.id.clone())
        })
        .transpose()?;

    let parsed = parse_description(&first.transaction_description, &first.transaction_type);
    let name = name.unwrap_or(&parsed.name).to_string();
    let reference = reference.unwrap_or(&parsed.reference).to_string();

    let mappings = MappingStore::new(&store);
    let mut updated = 0usize;
    let mut shown = String::new();
    for txn in transactions.iter_mut() {
        if txn.transaction_description != description {
            continue;
        }
        *txn = mappings.record_edit(txn, &name, &reference, category_id.as_deref())?;
        shown = txn.transaction_description.clone();
        updated += 1;
    }
    storage.save_transactions(&transactions)?;

    println!("Updated {updated} transaction(s): {shown}");
    Ok(())
}
