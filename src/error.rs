use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreasurerError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing CSV column: {0}")]
    MissingColumn(String),

    #[error("Invalid date on row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    #[error("Invalid amount on row {row}: {value}")]
    InvalidAmount { row: usize, value: String },

    #[error("Row {0} has neither a debit nor a credit amount")]
    MissingAmount(usize),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Category name {name} is ambiguous, use an id: {}", .ids.join(", "))]
    AmbiguousCategory { name: String, ids: Vec<String> },

    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TreasurerError>;
