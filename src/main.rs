mod cli;

use clap::Parser;

use cli::{
    BackupCommands, BudgetCommands, CategoriesCommands, Cli, Commands, MappingsCommands,
    ReportCommands,
};

fn main() {
    treasurer::logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file } => cli::import::run(&file),
        Commands::Parse {
            description,
            transaction_type,
        } => cli::parse::run(&description, &transaction_type),
        Commands::Categorize => cli::categorize::run(),
        Commands::Transactions {
            month,
            uncategorized,
        } => cli::transactions::list(month, uncategorized),
        Commands::Edit {
            description,
            name,
            reference,
            category,
        } => cli::edit::run(
            &description,
            name.as_deref(),
            reference.as_deref(),
            category.as_deref(),
        ),
        Commands::Mappings { command } => match command {
            MappingsCommands::List => cli::mappings::list(),
            MappingsCommands::Clear => cli::mappings::clear(),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Add {
                name,
                category_type,
            } => cli::categories::add(&name, &category_type),
            CategoriesCommands::Delete { category } => cli::categories::delete(&category),
        },
        Commands::Budget { command } => match command {
            BudgetCommands::Set { category, amount } => cli::budget::set(&category, amount),
            BudgetCommands::Clear { category } => cli::budget::clear(category.as_deref()),
            BudgetCommands::StartingBalance { amount } => cli::budget::starting_balance(amount),
        },
        Commands::Report { command } => match command {
            ReportCommands::Yearly { year } => cli::report::yearly(year),
            ReportCommands::Budget => cli::report::budget(),
        },
        Commands::Backup { command } => match command {
            BackupCommands::Export { output } => cli::backup::export(output),
            BackupCommands::Restore { file } => cli::backup::restore(&file),
        },
        Commands::ClearCache { yes } => cli::init::clear_cache(yes),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
