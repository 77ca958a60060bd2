//! Statement module - owned prepared-statement handle
//!
//! Preparation and stepping belong to the engine; this wrapper only carries
//! the handle, forwards status codes, and finalizes on drop.

use std::ffi::CStr;
use std::mem::ManuallyDrop;
use std::os::raw::{c_char, c_int};
use std::ptr::{self, NonNull};

use rusqlite::ffi;
use tracing::debug;

use super::cell::HandleCell;
use super::connection::DbHandle;
use super::error::{Error, Result};
use super::status::StatusCode;

/// Prepared statement owned by the caller, finalized when dropped
#[derive(Debug)]
pub struct RawStatement {
    ptr: NonNull<ffi::sqlite3_stmt>,
    db: DbHandle,
}

/// Compile the first statement in `sql` on `db`.
///
/// The statement handle comes back through a [`HandleCell`] passed as the
/// `ppStmt` out-parameter. Text after the first statement is ignored.
pub fn prepare(db: DbHandle, sql: &str) -> Result<RawStatement> {
    let len = sql_len(sql.len())?;
    let mut cell = HandleCell::<ffi::sqlite3_stmt>::allocate()?;
    let rc = cell.fill(|out| unsafe {
        ffi::sqlite3_prepare_v2(
            db.as_ptr(),
            sql.as_ptr() as *const c_char,
            len,
            out,
            ptr::null_mut(),
        )
    });
    rc.check(db)?;
    let ptr = cell
        .read_non_null()
        .ok_or(Error::NullHandle("sqlite3_prepare_v2"))?;
    debug!(sql, "prepared statement");
    Ok(RawStatement { ptr, db })
}

/// Byte count for `nByte`; rejected before the engine sees it when it
/// cannot be expressed as a C `int`
fn sql_len(len: usize) -> Result<c_int> {
    c_int::try_from(len).map_err(|_| Error::SqlTooLong { len })
}

impl RawStatement {
    pub fn as_ptr(&self) -> *mut ffi::sqlite3_stmt {
        self.ptr.as_ptr()
    }

    /// Connection the statement was prepared on
    pub fn db_handle(&self) -> DbHandle {
        self.db
    }

    pub fn step(&self) -> StatusCode {
        StatusCode::from(unsafe { ffi::sqlite3_step(self.as_ptr()) })
    }

    pub fn reset(&self) -> StatusCode {
        StatusCode::from(unsafe { ffi::sqlite3_reset(self.as_ptr()) })
    }

    pub fn clear_bindings(&self) -> StatusCode {
        StatusCode::from(unsafe { ffi::sqlite3_clear_bindings(self.as_ptr()) })
    }

    /// SQL text the statement was compiled from
    pub fn sql(&self) -> String {
        let text = unsafe { ffi::sqlite3_sql(self.as_ptr()) };
        if text.is_null() {
            return String::new();
        }
        unsafe { CStr::from_ptr(text) }
            .to_string_lossy()
            .into_owned()
    }

    pub fn readonly(&self) -> bool {
        unsafe { ffi::sqlite3_stmt_readonly(self.as_ptr()) != 0 }
    }

    /// Finalize now and report the engine's status
    pub fn finalize(self) -> StatusCode {
        let this = ManuallyDrop::new(self);
        StatusCode::from(unsafe { ffi::sqlite3_finalize(this.as_ptr()) })
    }
}

impl Drop for RawStatement {
    fn drop(&mut self) {
        let rc = StatusCode::from(unsafe { ffi::sqlite3_finalize(self.as_ptr()) });
        if !rc.is_ok() {
            // finalize repeats the last step error; the statement is gone either way
            debug!(status = rc.code(), "finalize on drop reported {rc}");
        }
    }
}
