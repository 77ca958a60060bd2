//! Status module - native status codes forwarded without translation

use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_int;

use rusqlite::ffi;

use super::connection::{read_error_message, DbHandle};
use super::error::{Error, Result};

/// Integer status returned by a native engine call, kept verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(c_int);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(ffi::SQLITE_OK);
    pub const ROW: StatusCode = StatusCode(ffi::SQLITE_ROW);
    pub const DONE: StatusCode = StatusCode(ffi::SQLITE_DONE);

    /// Raw integer as reported by the engine (extended codes included)
    pub fn code(self) -> i32 {
        self.0
    }

    /// Primary result code, with any extended bits masked off
    pub fn primary(self) -> i32 {
        self.0 & 0xff
    }

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    pub fn is_row(self) -> bool {
        self == Self::ROW
    }

    pub fn is_done(self) -> bool {
        self == Self::DONE
    }

    /// `SQLITE_OK`, `SQLITE_ROW` and `SQLITE_DONE` all mean the call did what was asked
    pub fn is_success(self) -> bool {
        self.is_ok() || self.is_row() || self.is_done()
    }

    /// English description of the code from `sqlite3_errstr`
    pub fn name(self) -> &'static str {
        let ptr = unsafe { ffi::sqlite3_errstr(self.0) };
        if ptr.is_null() {
            return "unknown error";
        }
        // sqlite3_errstr points into a static table owned by the library
        unsafe { CStr::from_ptr(ptr) }
            .to_str()
            .unwrap_or("unknown error")
    }

    /// Convert a failing status into [`Error::Native`], reading the
    /// connection's current error text for the message
    pub fn check(self, db: DbHandle) -> Result<StatusCode> {
        if self.is_success() {
            return Ok(self);
        }
        let message = match read_error_message(db) {
            Ok(bytes) if !bytes.is_empty() => String::from_utf8_lossy(&bytes).into_owned(),
            _ => self.name().to_string(),
        };
        Err(Error::Native {
            code: self.0,
            message,
        })
    }
}

impl From<c_int> for StatusCode {
    fn from(code: c_int) -> Self {
        StatusCode(code)
    }
}

impl From<StatusCode> for i32 {
    fn from(status: StatusCode) -> Self {
        status.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}
