//! Connection module - borrowed native connection handle and its error state

use std::ffi::CStr;
use std::os::raw::c_void;
use std::ptr::NonNull;

use rusqlite::ffi;
use tracing::trace;

use super::buffer::copy_bytes;
use super::error::Result;
use super::status::StatusCode;

/// Non-owning handle to an open `sqlite3` connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbHandle {
    ptr: NonNull<ffi::sqlite3>,
}

impl DbHandle {
    /// Wrap a raw connection pointer, `None` if it is null.
    ///
    /// # Safety
    /// `ptr` must point to an open connection that stays open for as long as
    /// this handle, its copies, or any statement prepared through it is used.
    pub unsafe fn from_raw(ptr: *mut ffi::sqlite3) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    pub fn as_ptr(self) -> *mut ffi::sqlite3 {
        self.ptr.as_ptr()
    }

    /// Most recent extended status recorded on the connection
    pub fn errcode(self) -> StatusCode {
        StatusCode::from(unsafe { ffi::sqlite3_extended_errcode(self.as_ptr()) })
    }

    pub fn changes(self) -> i64 {
        unsafe { ffi::sqlite3_changes64(self.as_ptr()) }
    }

    pub fn last_insert_rowid(self) -> i64 {
        unsafe { ffi::sqlite3_last_insert_rowid(self.as_ptr()) }
    }
}

/// Copy the connection's current error text into a host-owned buffer.
///
/// Returns an empty buffer when no error is recorded. After a successful
/// call `sqlite3_errmsg` reports "not an error" (or "another row available"
/// after a step); those placeholders are not copied.
pub fn read_error_message(db: DbHandle) -> Result<Vec<u8>> {
    if db.errcode().is_success() {
        return Ok(Vec::new());
    }
    let msg = unsafe { ffi::sqlite3_errmsg(db.as_ptr()) };
    if msg.is_null() {
        return Ok(Vec::new());
    }
    let bytes = unsafe { CStr::from_ptr(msg) }.to_bytes();
    trace!(len = bytes.len(), "read_error_message");
    unsafe { copy_bytes(bytes.as_ptr() as *const c_void, bytes.len()) }
}
