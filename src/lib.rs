pub mod backup;
pub mod categories;
pub mod categorizer;
pub mod error;
pub mod fmt;
pub mod grouping;
pub mod importer;
pub mod logging;
pub mod mappings;
pub mod models;
pub mod parser;
pub mod reports;
pub mod settings;
pub mod storage;
pub mod store;
