use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use sha2::{Digest, Sha256};

use crate::error::{Result, TreasurerError};
use crate::grouping::parse_uk_date;
use crate::mappings::MappingStore;
use crate::models::Transaction;
use crate::storage::Storage;
use crate::store::KeyValueStore;

const DATE_COLUMN: &str = "Transaction Date";
const TYPE_COLUMN: &str = "Transaction Type";
const SORT_CODE_COLUMN: &str = "Sort Code";
const ACCOUNT_NUMBER_COLUMN: &str = "Account Number";
const DESCRIPTION_COLUMN: &str = "Transaction Description";
const DEBIT_COLUMN: &str = "Debit Amount";
const CREDIT_COLUMN: &str = "Credit Amount";
const BALANCE_COLUMN: &str = "Balance";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a statement amount. An empty field is `None`; anything else that is
/// not a number is an error. Thousands separators and `£` are tolerated.
pub fn parse_amount(raw: &str, row: usize) -> Result<Option<f64>> {
    let s = raw.replace([',', '£', '"'], "");
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| TreasurerError::InvalidAmount {
            row,
            value: raw.to_string(),
        })
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

struct Columns {
    date: usize,
    kind: usize,
    sort_code: Option<usize>,
    account_number: Option<usize>,
    description: usize,
    debit: usize,
    credit: usize,
    balance: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| TreasurerError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            date: require(DATE_COLUMN)?,
            kind: require(TYPE_COLUMN)?,
            sort_code: find(SORT_CODE_COLUMN),
            account_number: find(ACCOUNT_NUMBER_COLUMN),
            description: require(DESCRIPTION_COLUMN)?,
            debit: require(DEBIT_COLUMN)?,
            credit: require(CREDIT_COLUMN)?,
            balance: require(BALANCE_COLUMN)?,
        })
    }
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("").trim()
}

// ---------------------------------------------------------------------------
// parse_csv
// ---------------------------------------------------------------------------

/// Read a bank statement export. Rows are numbered from 1 after the header
/// in error messages.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::locate(rdr.headers()?)?;

    let mut transactions = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let date = field(&record, columns.date);
        if parse_uk_date(date).is_none() {
            return Err(TreasurerError::InvalidDate {
                row,
                value: date.to_string(),
            });
        }
        let debit_amount = parse_amount(field(&record, columns.debit), row)?;
        let credit_amount = parse_amount(field(&record, columns.credit), row)?;
        if debit_amount.is_none() && credit_amount.is_none() {
            return Err(TreasurerError::MissingAmount(row));
        }
        let balance = parse_amount(field(&record, columns.balance), row)?.unwrap_or(0.0);

        transactions.push(Transaction {
            transaction_date: date.to_string(),
            transaction_type: field(&record, columns.kind).to_string(),
            sort_code: columns
                .sort_code
                .map(|c| field(&record, c).to_string())
                .unwrap_or_default(),
            account_number: columns
                .account_number
                .map(|c| field(&record, c).to_string())
                .unwrap_or_default(),
            // untrimmed: mappings are keyed on the exact text
            transaction_description: record
                .get(columns.description)
                .unwrap_or("")
                .to_string(),
            debit_amount,
            credit_amount,
            balance,
            category: None,
        });
    }
    Ok(transactions)
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicate_file: bool,
}

/// Replace the stored transaction list with the statement at `file_path`,
/// then apply saved mappings. Importing the same file twice in a row is
/// reported as a duplicate and leaves the store untouched.
pub fn import_file<S: KeyValueStore>(storage: &Storage<'_, S>, file_path: &Path) -> Result<ImportResult> {
    let checksum = compute_checksum(file_path)?;
    if storage.import_checksum()?.as_deref() == Some(checksum.as_str()) {
        tracing::info!("{} was already imported", file_path.display());
        return Ok(ImportResult {
            imported: 0,
            duplicate_file: true,
        });
    }

    let file = std::fs::File::open(file_path)?;
    let parsed = parse_csv(std::io::BufReader::new(file))?;
    let mapped = MappingStore::new(storage.store()).apply_stored_mappings(&parsed)?;

    storage.save_transactions(&mapped)?;
    storage.save_import_checksum(&checksum)?;
    tracing::info!("imported {} transactions from {}", mapped.len(), file_path.display());

    Ok(ImportResult {
        imported: mapped.len(),
        duplicate_file: false,
    })
}
