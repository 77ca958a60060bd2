//! Buffer module - host-owned copies of native memory
//!
//! Every value leaving the engine is copied into a freshly reserved
//! `Vec` before the call returns. Reservation is fallible so an exhausted
//! allocator surfaces as [`Error::Allocation`] instead of aborting.

use std::os::raw::c_void;
use std::ptr;

use super::error::{Error, Result};

/// Reserve an empty byte buffer able to hold `len` bytes
pub(crate) fn reserve_bytes(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { requested: len })?;
    Ok(buf)
}

/// Reserve an empty code-unit buffer able to hold `units` 16-bit units
pub(crate) fn reserve_code_units(units: usize) -> Result<Vec<u16>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(units).map_err(|_| Error::Allocation {
        requested: units.saturating_mul(2),
    })?;
    Ok(buf)
}

/// Copy `len` bytes starting at `src` into a new host-owned buffer.
///
/// # Safety
/// `src` must be valid for reads of `len` bytes, or `len` must be zero.
pub(crate) unsafe fn copy_bytes(src: *const c_void, len: usize) -> Result<Vec<u8>> {
    let mut out = reserve_bytes(len)?;
    if len > 0 {
        ptr::copy_nonoverlapping(src as *const u8, out.as_mut_ptr(), len);
        out.set_len(len);
    }
    Ok(out)
}

/// Copy `byte_len` bytes of native-endian UTF-16 into a new code-unit buffer.
///
/// The copy is done bytewise, so `src` need not be 2-byte aligned.
///
/// # Safety
/// `src` must be valid for reads of `byte_len` bytes, or `byte_len` must be zero.
pub(crate) unsafe fn copy_code_units(src: *const c_void, byte_len: usize) -> Result<Vec<u16>> {
    if byte_len % 2 != 0 {
        return Err(Error::OddText16Length { len: byte_len });
    }
    let units = byte_len / 2;
    let mut out = reserve_code_units(units)?;
    if units > 0 {
        ptr::copy_nonoverlapping(src as *const u8, out.as_mut_ptr() as *mut u8, byte_len);
        out.set_len(units);
    }
    Ok(out)
}
