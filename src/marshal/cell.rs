//! Cell module - single-slot out-parameter for native handles
//!
//! C APIs such as `sqlite3_open_v2` and `sqlite3_prepare_v2` hand back a
//! handle by writing through a caller-supplied `T**`. [`HandleCell`] owns
//! that slot and remembers whether a native call has filled it, so reading
//! an unwritten slot yields `None` rather than garbage.

use std::os::raw::c_int;
use std::ptr::{self, NonNull};

use super::error::{Error, Result};
use super::status::StatusCode;

pub struct HandleCell<T> {
    slot: Vec<*mut T>,
    written: bool,
}

impl<T> HandleCell<T> {
    /// Allocate one pointer-sized slot, initially null and unwritten
    pub fn allocate() -> Result<Self> {
        let mut slot = Vec::new();
        slot.try_reserve_exact(1).map_err(|_| Error::Allocation {
            requested: std::mem::size_of::<*mut T>(),
        })?;
        slot.push(ptr::null_mut());
        Ok(Self {
            slot,
            written: false,
        })
    }

    /// Hand the slot to a native call as its out-pointer.
    ///
    /// The cell counts as written once `call` returns, whatever status it
    /// reports: the engine's out-parameter calls always store into the slot,
    /// null on most failures.
    pub fn fill<F>(&mut self, call: F) -> StatusCode
    where
        F: FnOnce(*mut *mut T) -> c_int,
    {
        let rc = call(self.slot.as_mut_ptr());
        self.written = true;
        StatusCode::from(rc)
    }

    /// Stored handle, verbatim, or `None` if nothing has written the slot
    pub fn read(&self) -> Option<*mut T> {
        if self.written {
            Some(self.slot[0])
        } else {
            None
        }
    }

    /// Stored handle when the slot was written with a non-null value
    pub fn read_non_null(&self) -> Option<NonNull<T>> {
        self.read().and_then(NonNull::new)
    }

    pub fn is_written(&self) -> bool {
        self.written
    }
}
