use napi_derive::napi;

pub mod db;
mod error;
pub mod marshal;
mod models;

pub use db::{Database, OpenOptions, Statement};
pub use marshal::{ColumnType, StatusCode};
pub use models::QueryResult;

#[napi]
pub fn get_sqlite_version() -> String {
    rusqlite::version().to_string()
}

/// English description of a SQLite status code
#[napi]
pub fn status_name(code: i32) -> String {
    StatusCode::from(code).name().to_string()
}
