//! Error types for AtlasDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::storage::PageNum;

/// Result type alias using AtlasError
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Unified error type for AtlasDB operations
#[derive(Debug, Error)]
pub enum AtlasError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Capacity Errors
    // -------------------------------------------------------------------------
    #[error("Table full")]
    TableFull,

    #[error("Page {page} out of range (max {max} pages)")]
    PageOutOfRange { page: PageNum, max: u32 },

    // -------------------------------------------------------------------------
    // Integrity Errors
    // -------------------------------------------------------------------------
    #[error("Duplicate key: {0}")]
    DuplicateKey(u32),

    #[error("Key {0} does not fit in a 32-bit cell key")]
    KeyOutOfRange(u64),

    #[error("Field '{field}' too long: {len} bytes (max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Node is full")]
    NodeFull,

    // -------------------------------------------------------------------------
    // Corruption Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt page {page}: {reason}")]
    CorruptPage { page: PageNum, reason: String },

    #[error("Corrupt database file: {0}")]
    CorruptFile(String),

    // -------------------------------------------------------------------------
    // Cursor Errors
    // -------------------------------------------------------------------------
    #[error("Cursor is past the end of the table")]
    EndOfSequence,

    // -------------------------------------------------------------------------
    // Front-end Errors
    // -------------------------------------------------------------------------
    #[error("Syntax error: {0}")]
    Syntax(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AtlasError {
    /// Shorthand for a `CorruptPage` error
    pub(crate) fn corrupt(page: PageNum, reason: impl Into<String>) -> Self {
        AtlasError::CorruptPage {
            page,
            reason: reason.into(),
        }
    }
}
