use napi::Error;
use rusqlite::Error as SqliteError;

use crate::marshal;

pub fn to_napi_error(err: SqliteError) -> Error {
    Error::from_reason(format!("SQLite Error: {}", err))
}

pub fn marshal_to_napi(err: marshal::Error) -> Error {
    Error::from_reason(format!("SQLite Error: {}", err))
}

pub fn lock_failed() -> Error {
    Error::from_reason("DB Lock failed")
}
