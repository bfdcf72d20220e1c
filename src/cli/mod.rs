pub mod backup;
pub mod budget;
pub mod categories;
pub mod categorize;
pub mod edit;
pub mod import;
pub mod init;
pub mod mappings;
pub mod parse;
pub mod report;
pub mod status;
pub mod transactions;

use clap::{Parser, Subcommand};

use treasurer::error::{Result, TreasurerError};
use treasurer::settings::{get_data_dir, store_path_in};
use treasurer::store::SqliteStore;

/// Open the store in the configured data directory, creating both if needed.
pub(crate) fn open_store() -> Result<SqliteStore> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    SqliteStore::open(&store_path_in(&data_dir))
}

/// Validate a `YYYY-MM` month argument.
pub(crate) fn parse_month_opt(month: &Option<String>) -> Result<Option<String>> {
    let Some(m) = month else {
        return Ok(None);
    };
    let valid = m
        .split_once('-')
        .and_then(|(y, mo)| Some((y.parse::<i32>().ok()?, mo.parse::<u32>().ok()?)))
        .is_some_and(|(_, mo)| (1..=12).contains(&mo));
    if !valid {
        return Err(TreasurerError::Other(format!("Invalid month {m:?}, expected YYYY-MM")));
    }
    Ok(Some(m.clone()))
}

#[derive(Parser)]
#[command(
    name = "treasurer",
    version,
    about = "Categorize bank statements and track budgets for a student sports club."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and set up the store with default categories.
    Init {
        /// Path for treasurer data (default: ~/Documents/treasurer)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a bank statement CSV, replacing the current transactions.
    Import {
        /// Path to the CSV export
        file: String,
    },
    /// Show the name and reference extracted from a raw description.
    Parse {
        /// Raw transaction description
        description: String,
        /// Transaction type code: DD, BP, FPO, FPI
        #[arg(long = "type", default_value = "")]
        transaction_type: String,
    },
    /// Auto-categorize uncategorized transactions.
    Categorize,
    /// List transactions, newest month first.
    Transactions {
        /// Only this month: YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Only transactions without a category
        #[arg(long)]
        uncategorized: bool,
    },
    /// Correct the name, reference or category for a raw description.
    Edit {
        /// Description exactly as shown by `treasurer transactions`
        description: String,
        /// Corrected payee name
        #[arg(long)]
        name: Option<String>,
        /// Corrected reference
        #[arg(long)]
        reference: Option<String>,
        /// Category id or name
        #[arg(long)]
        category: Option<String>,
    },
    /// Manage saved description mappings.
    Mappings {
        #[command(subcommand)]
        command: MappingsCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Set budgeted amounts.
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Export or restore a JSON backup.
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
    /// Remove all stored data, including mappings and budgets.
    ClearCache {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
    /// Show the data location and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum MappingsCommands {
    /// List saved mappings.
    List,
    /// Delete every saved mapping.
    Clear,
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List all categories.
    List,
    /// Add a category.
    Add {
        /// Category name
        name: String,
        /// income or expense
        #[arg(long = "type")]
        category_type: String,
    },
    /// Delete a category by id or name.
    Delete {
        /// Category id (shown in `treasurer categories list`) or name
        category: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the budgeted amount for a category.
    Set {
        /// Category id or name
        category: String,
        /// Amount for the year
        amount: f64,
    },
    /// Clear one category's budget, or every budget when none is given.
    Clear {
        /// Category id or name
        category: Option<String>,
    },
    /// Set the account balance before the first statement.
    StartingBalance {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Monthly income and expenses by category for an academic year.
    Yearly {
        /// Academic year, e.g. 2024 or 2024/25 (default: most recent)
        #[arg(long)]
        year: Option<String>,
    },
    /// Budgeted against actual amounts per category.
    Budget,
}

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Write a backup file.
    Export {
        /// Output path (default: ./treasurer-backup-YYYY-MM-DD.json)
        #[arg(long)]
        output: Option<String>,
    },
    /// Replace transactions, categories and budgets from a backup file.
    Restore {
        /// Backup file to read
        file: String,
    },
}
