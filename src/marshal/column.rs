//! Column module - result-column extraction into host-owned buffers
//!
//! Values are copied out immediately; nothing here keeps a pointer into
//! engine memory, which the next step/reset/finalize may invalidate.
//!
//! SQL NULL comes back as `None`, a zero-length value as an empty buffer.
//! The type tag is consulted before any conversion accessor is called, as
//! `sqlite3_column_type` is unreliable after one.

use std::ffi::CStr;
use std::os::raw::{c_int, c_void};

use rusqlite::ffi;
use tracing::trace;

use super::buffer::{copy_bytes, copy_code_units};
use super::error::{Error, Result};
use super::statement::RawStatement;

// libsqlite3-sys leaves every UTF-16 entry point out of its bindings; the
// symbols are still exported by the bundled library.
extern "C" {
    fn sqlite3_column_text16(stmt: *mut ffi::sqlite3_stmt, col: c_int) -> *const c_void;
    fn sqlite3_column_bytes16(stmt: *mut ffi::sqlite3_stmt, col: c_int) -> c_int;
}

/// Fundamental SQLite datatype of a result column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Blob,
    Null,
}

impl ColumnType {
    /// Map an `SQLITE_*` datatype code
    pub fn from_code(code: i32) -> Option<ColumnType> {
        match code {
            ffi::SQLITE_INTEGER => Some(ColumnType::Integer),
            ffi::SQLITE_FLOAT => Some(ColumnType::Float),
            ffi::SQLITE_TEXT => Some(ColumnType::Text),
            ffi::SQLITE_BLOB => Some(ColumnType::Blob),
            ffi::SQLITE_NULL => Some(ColumnType::Null),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ColumnType::Integer => ffi::SQLITE_INTEGER,
            ColumnType::Float => ffi::SQLITE_FLOAT,
            ColumnType::Text => ffi::SQLITE_TEXT,
            ColumnType::Blob => ffi::SQLITE_BLOB,
            ColumnType::Null => ffi::SQLITE_NULL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Blob => "BLOB",
            ColumnType::Null => "NULL",
        }
    }
}

pub fn column_count(stmt: &RawStatement) -> i32 {
    unsafe { ffi::sqlite3_column_count(stmt.as_ptr()) }
}

/// Raw datatype code, forwarded as the engine reports it
pub fn column_type_code(stmt: &RawStatement, col: i32) -> i32 {
    unsafe { ffi::sqlite3_column_type(stmt.as_ptr(), col) }
}

/// Datatype of column `col` in the current row.
///
/// The engine only reports the five fundamental codes; anything else would
/// be a broken library and is read as NULL.
pub fn column_type(stmt: &RawStatement, col: i32) -> ColumnType {
    ColumnType::from_code(column_type_code(stmt, col)).unwrap_or(ColumnType::Null)
}

/// Declared or computed label of column `col`; empty when the engine has none
pub fn column_name(stmt: &RawStatement, col: i32) -> Result<Vec<u8>> {
    let name = unsafe { ffi::sqlite3_column_name(stmt.as_ptr(), col) };
    if name.is_null() {
        return Ok(Vec::new());
    }
    let bytes = unsafe { CStr::from_ptr(name) }.to_bytes();
    unsafe { copy_bytes(bytes.as_ptr() as *const c_void, bytes.len()) }
}

/// A null data pointer on a non-NULL column means zero length, or an
/// out-of-memory condition inside the engine.
fn empty_unless_nomem<T>(stmt: &RawStatement) -> Result<Vec<T>> {
    if stmt.db_handle().errcode().primary() == ffi::SQLITE_NOMEM {
        return Err(Error::Allocation { requested: 0 });
    }
    Ok(Vec::new())
}

/// Column `col` as raw bytes
pub fn extract_bytes(stmt: &RawStatement, col: i32) -> Result<Option<Vec<u8>>> {
    if column_type(stmt, col) == ColumnType::Null {
        trace!(col, "extract_bytes: NULL");
        return Ok(None);
    }
    let blob = unsafe { ffi::sqlite3_column_blob(stmt.as_ptr(), col) };
    if blob.is_null() {
        return empty_unless_nomem(stmt).map(Some);
    }
    let len = unsafe { ffi::sqlite3_column_bytes(stmt.as_ptr(), col) } as usize;
    trace!(col, len, "extract_bytes");
    unsafe { copy_bytes(blob, len) }.map(Some)
}

/// Column `col` as 8-bit text code units, same contract as [`extract_bytes`]
pub fn extract_string(stmt: &RawStatement, col: i32) -> Result<Option<Vec<u8>>> {
    if column_type(stmt, col) == ColumnType::Null {
        trace!(col, "extract_string: NULL");
        return Ok(None);
    }
    let text = unsafe { ffi::sqlite3_column_text(stmt.as_ptr(), col) };
    if text.is_null() {
        return empty_unless_nomem(stmt).map(Some);
    }
    let len = unsafe { ffi::sqlite3_column_bytes(stmt.as_ptr(), col) } as usize;
    trace!(col, len, "extract_string");
    unsafe { copy_bytes(text as *const c_void, len) }.map(Some)
}

/// Column `col` as native-endian UTF-16 code units.
///
/// The engine's byte count must be even; an odd count fails with
/// [`Error::OddText16Length`].
pub fn extract_text16(stmt: &RawStatement, col: i32) -> Result<Option<Vec<u16>>> {
    if column_type(stmt, col) == ColumnType::Null {
        trace!(col, "extract_text16: NULL");
        return Ok(None);
    }
    let text16 = unsafe { sqlite3_column_text16(stmt.as_ptr(), col) };
    if text16.is_null() {
        return empty_unless_nomem(stmt).map(Some);
    }
    let len16 = unsafe { sqlite3_column_bytes16(stmt.as_ptr(), col) } as usize;
    trace!(col, len16, "extract_text16");
    unsafe { copy_code_units(text16, len16) }.map(Some)
}

pub fn extract_int64(stmt: &RawStatement, col: i32) -> Option<i64> {
    if column_type(stmt, col) == ColumnType::Null {
        return None;
    }
    Some(unsafe { ffi::sqlite3_column_int64(stmt.as_ptr(), col) })
}

pub fn extract_double(stmt: &RawStatement, col: i32) -> Option<f64> {
    if column_type(stmt, col) == ColumnType::Null {
        return None;
    }
    Some(unsafe { ffi::sqlite3_column_double(stmt.as_ptr(), col) })
}
