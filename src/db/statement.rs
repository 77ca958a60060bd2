//! Statement module - exposes a prepared statement's binding and column API
//!
//! Bind, step and reset return the engine's status code as a number, the
//! way the C API does. Column readers return `null` for SQL NULL.

use crate::error::{lock_failed, marshal_to_napi};
use crate::marshal::{self, RawStatement};
use napi::bindgen_prelude::*;
use napi::JsString;
use napi_derive::napi;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// Statement struct - represents a prepared SQL statement
#[napi]
pub struct Statement {
    // declared before `conn` so it is finalized while the connection is still open
    raw: Option<RawStatement>,
    conn: Arc<Mutex<Connection>>,
}

impl Statement {
    /// Create a new Statement (internal use)
    pub(crate) fn new(raw: RawStatement, conn: Arc<Mutex<Connection>>) -> Self {
        Statement {
            raw: Some(raw),
            conn,
        }
    }

    /// Lock the owning connection and borrow the live statement
    fn live(&self) -> Result<(MutexGuard<'_, Connection>, &RawStatement)> {
        let guard = self.conn.lock().map_err(|_| lock_failed())?;
        let raw = self
            .raw
            .as_ref()
            .ok_or_else(|| Error::from_reason("Statement already finalized"))?;
        Ok((guard, raw))
    }
}

#[napi]
impl Statement {
    #[napi]
    pub fn bind_bytes(&self, index: i32, data: Buffer) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::bind_bytes(raw, index, &data).code())
    }

    #[napi]
    pub fn bind_blob(&self, index: i32, data: Buffer) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::bind_blob(raw, index, &data).code())
    }

    /// Bind UTF-8 bytes as TEXT
    #[napi]
    pub fn bind_text(&self, index: i32, data: Buffer) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::bind_text(raw, index, &data).code())
    }

    #[napi]
    pub fn bind_null(&self, index: i32) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::bind_null(raw, index).code())
    }

    #[napi]
    pub fn bind_int64(&self, index: i32, value: i64) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::bind_int64(raw, index, value).code())
    }

    #[napi]
    pub fn bind_double(&self, index: i32, value: f64) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::bind_double(raw, index, value).code())
    }

    #[napi]
    pub fn bind_parameter_count(&self) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::bind_parameter_count(raw))
    }

    /// 1-based index of a named parameter, 0 if the statement has none by that name
    #[napi]
    pub fn bind_parameter_index(&self, name: String) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        marshal::bind_parameter_index(raw, &name).map_err(marshal_to_napi)
    }

    #[napi]
    pub fn step(&self) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(raw.step().code())
    }

    #[napi]
    pub fn reset(&self) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(raw.reset().code())
    }

    #[napi]
    pub fn clear_bindings(&self) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(raw.clear_bindings().code())
    }

    #[napi]
    pub fn column_count(&self) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::column_count(raw))
    }

    /// `SQLITE_INTEGER`..`SQLITE_NULL` code of a column in the current row
    #[napi]
    pub fn column_type(&self, col: i32) -> Result<i32> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::column_type_code(raw, col))
    }

    /// Datatype name ("INTEGER", "REAL", "TEXT", "BLOB" or "NULL") of a column
    #[napi]
    pub fn column_type_name(&self, col: i32) -> Result<String> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::column_type(raw, col).as_str().to_string())
    }

    #[napi]
    pub fn column_name(&self, col: i32) -> Result<Buffer> {
        let (_conn, raw) = self.live()?;
        let name = marshal::column_name(raw, col).map_err(marshal_to_napi)?;
        Ok(name.into())
    }

    #[napi]
    pub fn column_bytes(&self, col: i32) -> Result<Option<Buffer>> {
        let (_conn, raw) = self.live()?;
        let bytes = marshal::extract_bytes(raw, col).map_err(marshal_to_napi)?;
        Ok(bytes.map(Buffer::from))
    }

    /// Column as UTF-8 bytes
    #[napi]
    pub fn column_string(&self, col: i32) -> Result<Option<Buffer>> {
        let (_conn, raw) = self.live()?;
        let bytes = marshal::extract_string(raw, col).map_err(marshal_to_napi)?;
        Ok(bytes.map(Buffer::from))
    }

    /// Column as a JS string, built directly from UTF-16 code units
    #[napi]
    pub fn column_text<'env>(&self, env: &'env Env, col: i32) -> Result<Option<JsString<'env>>> {
        let units = {
            let (_conn, raw) = self.live()?;
            marshal::extract_text16(raw, col).map_err(marshal_to_napi)?
        };
        units
            .map(|units| env.create_string_utf16(&units))
            .transpose()
    }

    #[napi]
    pub fn column_int64(&self, col: i32) -> Result<Option<i64>> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::extract_int64(raw, col))
    }

    #[napi]
    pub fn column_double(&self, col: i32) -> Result<Option<f64>> {
        let (_conn, raw) = self.live()?;
        Ok(marshal::extract_double(raw, col))
    }

    /// SQL text the statement was compiled from
    #[napi(getter)]
    pub fn source(&self) -> Result<String> {
        let (_conn, raw) = self.live()?;
        Ok(raw.sql())
    }

    #[napi(getter)]
    pub fn readonly(&self) -> Result<bool> {
        let (_conn, raw) = self.live()?;
        Ok(raw.readonly())
    }

    /// Finalize the statement, releasing resources. Later calls throw.
    #[napi]
    pub fn finalize(&mut self) -> Result<i32> {
        let _conn = self.conn.lock().map_err(|_| lock_failed())?;
        Ok(self
            .raw
            .take()
            .map(|raw| raw.finalize().code())
            .unwrap_or(0))
    }
}
