//! Options module - connection settings applied right after open

use napi::{Error, Result};
use napi_derive::napi;
use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};

const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];
const SYNCHRONOUS_MODES: &[&str] = &["OFF", "NORMAL", "FULL", "EXTRA"];

/// Options accepted by the `Database` constructor
///
/// Every field is optional; omitted fields take the defaults below.
#[napi(object)]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenOptions {
    /// Open read-only (default false)
    pub read_only: Option<bool>,
    /// `PRAGMA journal_mode` (default "WAL")
    pub journal_mode: Option<String>,
    /// `PRAGMA synchronous` (default "NORMAL")
    pub synchronous: Option<String>,
    /// `PRAGMA foreign_keys` (default true)
    pub foreign_keys: Option<bool>,
    /// Busy handler timeout in milliseconds (default 5000)
    pub busy_timeout_ms: Option<u32>,
    /// `PRAGMA extended_result_codes` (default true)
    pub extended_result_codes: Option<bool>,
}

fn checked_mode(value: &str, allowed: &[&str], pragma: &str) -> Result<String> {
    let upper = value.to_uppercase();
    if allowed.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(Error::from_reason(format!(
            "Invalid {pragma} '{value}', expected one of {}",
            allowed.join(", ")
        )))
    }
}

impl OpenOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::from_reason(format!("Invalid database options: {}", e)))
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn busy_timeout_ms(&self) -> u32 {
        self.busy_timeout_ms.unwrap_or(5000)
    }

    pub fn open_flags(&self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.is_read_only() {
            base | OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        }
    }

    /// PRAGMA batch for these options.
    ///
    /// Mode values are checked against the engine's keywords before being
    /// spliced into SQL.
    pub fn pragma_batch(&self) -> Result<String> {
        let extended = self.extended_result_codes.unwrap_or(true);
        let foreign_keys = self.foreign_keys.unwrap_or(true);
        let synchronous = checked_mode(
            self.synchronous.as_deref().unwrap_or("NORMAL"),
            SYNCHRONOUS_MODES,
            "synchronous",
        )?;

        let mut batch = format!(
            "PRAGMA extended_result_codes = {};\nPRAGMA foreign_keys = {};\nPRAGMA synchronous = {};",
            if extended { "ON" } else { "OFF" },
            if foreign_keys { "ON" } else { "OFF" },
            synchronous,
        );

        // journal mode changes need write access
        if !self.is_read_only() {
            let journal = checked_mode(
                self.journal_mode.as_deref().unwrap_or("WAL"),
                JOURNAL_MODES,
                "journal_mode",
            )?;
            batch.push_str(&format!("\nPRAGMA journal_mode = {};", journal));
        }

        Ok(batch)
    }
}
