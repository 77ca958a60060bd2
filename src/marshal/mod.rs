//! Marshalling layer between host buffers and the SQLite C API
//!
//! Stateless: each function is one synchronous native call plus the copy
//! needed to move its result into host ownership. No locking is done here;
//! callers serialize access to a connection and its statements.

mod bind;
mod buffer;
mod cell;
mod column;
mod connection;
mod error;
mod statement;
mod status;

pub use bind::{
    bind_blob, bind_bytes, bind_double, bind_int64, bind_null, bind_parameter_count,
    bind_parameter_index, bind_text,
};
pub use cell::HandleCell;
pub use column::{
    column_count, column_name, column_type, column_type_code, extract_bytes, extract_double,
    extract_int64, extract_string, extract_text16, ColumnType,
};
pub use connection::{read_error_message, DbHandle};
pub use error::{Error, Result};
pub use statement::{prepare, RawStatement};
pub use status::StatusCode;
