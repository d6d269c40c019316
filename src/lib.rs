//! # AtlasDB
//!
//! A single-table, single-file database with:
//! - Fixed-width rows (`id`, `name`, `email`) keyed by id
//! - A paged B+tree with sibling-linked leaves for ordered scans
//! - A bounded page cache with LRU eviction
//! - Durability on close (every cached page flushed and synced)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Shell (bin/atlasdb)                        │
//! │             statements + meta-commands                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │                  (Mutex<Table>)                              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Table / B+Tree                               │
//! │      search, insert, split, cursor over leaf chain           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Node::decode / Node::encode
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Pager                                  │
//! │           page cache (LRU) over the db file                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod row;
pub mod node;
pub mod btree;
pub mod table;
pub mod command;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AtlasError, Result};
pub use config::Config;
pub use engine::Engine;
pub use row::Row;
pub use table::Table;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AtlasDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
