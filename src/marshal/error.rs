//! Error module - failures raised by the marshalling layer itself
//!
//! SQL-level failures are never reinterpreted here: they travel as
//! [`Error::Native`] carrying the engine's own status code.

use thiserror::Error;

/// Result alias used across the marshalling layer
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The allocator could not provide a host-owned buffer of `requested` bytes
    #[error("allocation of {requested} bytes failed")]
    Allocation { requested: usize },

    /// The native engine returned a non-success status
    #[error("SQLite status {code}: {message}")]
    Native { code: i32, message: String },

    /// A UTF-16 column reported a byte length that is not a whole number of code units
    #[error("UTF-16 column has odd byte length {len}")]
    OddText16Length { len: usize },

    /// SQL text longer than the `int` byte count `sqlite3_prepare_v2` accepts
    #[error("SQL text of {len} bytes is too long to prepare")]
    SqlTooLong { len: usize },

    #[error("{what} contains an interior NUL byte")]
    InteriorNul { what: &'static str },

    /// A native call succeeded but left its out-handle null
    #[error("{0} returned a null handle")]
    NullHandle(&'static str),
}

impl Error {
    /// Native status code when the failure came from the engine
    pub fn native_code(&self) -> Option<i32> {
        match self {
            Error::Native { code, .. } => Some(*code),
            _ => None,
        }
    }
}
