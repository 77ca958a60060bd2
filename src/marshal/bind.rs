//! Bind module - positional parameter binding with transient lifetime
//!
//! Every byte sequence is bound with `SQLITE_TRANSIENT`, so the engine
//! copies it before returning and the caller's buffer may be dropped right
//! after the call. Status codes come back from the engine untouched.

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};

use rusqlite::ffi;
use tracing::trace;

use super::error::{Error, Result};
use super::statement::RawStatement;
use super::status::StatusCode;

fn bind_blob_transient(stmt: &RawStatement, index: i32, data: &[u8]) -> StatusCode {
    let rc = unsafe {
        ffi::sqlite3_bind_blob64(
            stmt.as_ptr(),
            index as c_int,
            data.as_ptr() as *const c_void,
            data.len() as ffi::sqlite3_uint64,
            ffi::SQLITE_TRANSIENT(),
        )
    };
    StatusCode::from(rc)
}

/// Bind raw bytes to parameter `index` (1-based)
pub fn bind_bytes(stmt: &RawStatement, index: i32, data: &[u8]) -> StatusCode {
    trace!(index, len = data.len(), "bind_bytes");
    bind_blob_transient(stmt, index, data)
}

/// Same as [`bind_bytes`]; kept for callers that distinguish the blob entry point
pub fn bind_blob(stmt: &RawStatement, index: i32, data: &[u8]) -> StatusCode {
    trace!(index, len = data.len(), "bind_blob");
    bind_blob_transient(stmt, index, data)
}

/// Bind 8-bit code units as TEXT. No encoding validation happens here.
pub fn bind_text(stmt: &RawStatement, index: i32, data: &[u8]) -> StatusCode {
    trace!(index, len = data.len(), "bind_text");
    let rc = unsafe {
        ffi::sqlite3_bind_text64(
            stmt.as_ptr(),
            index as c_int,
            data.as_ptr() as *const c_char,
            data.len() as ffi::sqlite3_uint64,
            ffi::SQLITE_TRANSIENT(),
            ffi::SQLITE_UTF8 as u8,
        )
    };
    StatusCode::from(rc)
}

pub fn bind_null(stmt: &RawStatement, index: i32) -> StatusCode {
    trace!(index, "bind_null");
    StatusCode::from(unsafe { ffi::sqlite3_bind_null(stmt.as_ptr(), index as c_int) })
}

pub fn bind_int64(stmt: &RawStatement, index: i32, value: i64) -> StatusCode {
    trace!(index, value, "bind_int64");
    StatusCode::from(unsafe { ffi::sqlite3_bind_int64(stmt.as_ptr(), index as c_int, value) })
}

pub fn bind_double(stmt: &RawStatement, index: i32, value: f64) -> StatusCode {
    trace!(index, value, "bind_double");
    StatusCode::from(unsafe { ffi::sqlite3_bind_double(stmt.as_ptr(), index as c_int, value) })
}

/// Largest parameter index used by the statement
pub fn bind_parameter_count(stmt: &RawStatement) -> i32 {
    unsafe { ffi::sqlite3_bind_parameter_count(stmt.as_ptr()) }
}

/// Index of a named parameter such as `:id` or `$name`, 0 if there is none
pub fn bind_parameter_index(stmt: &RawStatement, name: &str) -> Result<i32> {
    let name = CString::new(name).map_err(|_| Error::InteriorNul {
        what: "parameter name",
    })?;
    Ok(unsafe { ffi::sqlite3_bind_parameter_index(stmt.as_ptr(), name.as_ptr()) })
}
