//! Database module - provides the Database struct for SQLite connections

use crate::db::{OpenOptions, Statement};
use crate::error::{lock_failed, marshal_to_napi, to_napi_error};
use crate::marshal::{self, DbHandle};
use crate::models::QueryResult;
use napi::bindgen_prelude::*;
use napi_derive::napi;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Raw handle of an open connection
///
/// The returned handle is only used while the caller holds the connection
/// lock, and the `Arc` keeps the connection open for every statement.
pub(crate) fn raw_handle(conn: &Connection) -> Result<DbHandle> {
    unsafe { DbHandle::from_raw(conn.handle()) }
        .ok_or_else(|| Error::from_reason("SQLite Error: connection handle is null"))
}

/// Database connection struct - represents an SQLite database connection
#[napi]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

#[napi]
impl Database {
    /// Open a connection; `":memory:"` opens a private in-memory database
    #[napi(constructor)]
    pub fn new(path: String, options: Option<OpenOptions>) -> Result<Self> {
        let options = options.unwrap_or_default();
        let conn = if path == ":memory:" {
            Connection::open_in_memory_with_flags(options.open_flags()).map_err(to_napi_error)?
        } else {
            Connection::open_with_flags(&path, options.open_flags()).map_err(to_napi_error)?
        };

        conn.busy_timeout(Duration::from_millis(u64::from(options.busy_timeout_ms())))
            .map_err(to_napi_error)?;
        conn.execute_batch(&options.pragma_batch()?)
            .map_err(to_napi_error)?;

        debug!(path = %path, read_only = options.is_read_only(), "opened database");
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open with options given as a JSON document, e.g. `{"readOnly": true}`
    #[napi(factory)]
    pub fn with_json_options(path: String, options_json: String) -> Result<Self> {
        Self::new(path, Some(OpenOptions::from_json(&options_json)?))
    }

    /// Compile the first statement in `sql`
    #[napi]
    pub fn prepare(&self, sql: String) -> Result<Statement> {
        let conn = self.conn.lock().map_err(|_| lock_failed())?;
        let raw = marshal::prepare(raw_handle(&conn)?, &sql).map_err(marshal_to_napi)?;
        Ok(Statement::new(raw, self.conn.clone()))
    }

    /// Execute one or more statements without parameters
    #[napi]
    pub fn exec(&self, sql: String) -> Result<QueryResult> {
        let conn = self.conn.lock().map_err(|_| lock_failed())?;
        conn.execute_batch(&sql).map_err(to_napi_error)?;
        let db = raw_handle(&conn)?;
        Ok(QueryResult {
            changes: db.changes(),
            last_insert_rowid: db.last_insert_rowid(),
        })
    }

    /// Current error text of the connection, empty when there is none
    #[napi]
    pub fn errmsg(&self) -> Result<Buffer> {
        let conn = self.conn.lock().map_err(|_| lock_failed())?;
        let bytes = marshal::read_error_message(raw_handle(&conn)?).map_err(marshal_to_napi)?;
        Ok(bytes.into())
    }

    /// Current extended error code of the connection
    #[napi]
    pub fn errcode(&self) -> Result<i32> {
        let conn = self.conn.lock().map_err(|_| lock_failed())?;
        Ok(raw_handle(&conn)?.errcode().code())
    }

    #[napi]
    pub fn changes(&self) -> Result<i64> {
        let conn = self.conn.lock().map_err(|_| lock_failed())?;
        Ok(raw_handle(&conn)?.changes())
    }

    #[napi]
    pub fn last_insert_rowid(&self) -> Result<i64> {
        let conn = self.conn.lock().map_err(|_| lock_failed())?;
        Ok(raw_handle(&conn)?.last_insert_rowid())
    }
}
