//! Database module - provides SQLite database access via NAPI

mod database;
mod options;
mod statement;

pub use database::Database;
pub use options::OpenOptions;
pub use statement::Statement;
