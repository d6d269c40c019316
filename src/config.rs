//! Configuration for AtlasDB
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{AtlasError, Result};
use crate::node::{INTERNAL_NODE_MAX_KEYS, LEAF_NODE_MAX_CELLS};

/// Default page budget for a single table file
pub const TABLE_MAX_PAGES: u32 = 1024;

/// Main configuration for an AtlasDB table
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the database file (a sequence of 4096-byte pages)
    pub path: PathBuf,

    /// Maximum number of pages the file may grow to
    pub max_pages: u32,

    // -------------------------------------------------------------------------
    // Pager Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of pages held in the page cache.
    /// When full, the least recently used page is flushed and evicted.
    pub cache_capacity: usize,

    // -------------------------------------------------------------------------
    // B+Tree Configuration
    // -------------------------------------------------------------------------
    /// Cells per leaf before it splits (at most `LEAF_NODE_MAX_CELLS`)
    pub leaf_max_cells: usize,

    /// Keys per internal node before it splits (at most `INTERNAL_NODE_MAX_KEYS`)
    pub internal_max_keys: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./atlas.db"),
            max_pages: TABLE_MAX_PAGES,
            cache_capacity: TABLE_MAX_PAGES as usize,
            leaf_max_cells: LEAF_NODE_MAX_CELLS,
            internal_max_keys: INTERNAL_NODE_MAX_KEYS,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that every limit is usable
    ///
    /// Node limits below 2 cannot split into two non-empty halves, and
    /// limits above the page-derived maximum would not fit in a page.
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(AtlasError::Config("max_pages must be at least 1".to_string()));
        }
        if self.cache_capacity == 0 {
            return Err(AtlasError::Config(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if !(2..=LEAF_NODE_MAX_CELLS).contains(&self.leaf_max_cells) {
            return Err(AtlasError::Config(format!(
                "leaf_max_cells must be between 2 and {}, got {}",
                LEAF_NODE_MAX_CELLS, self.leaf_max_cells
            )));
        }
        if !(2..=INTERNAL_NODE_MAX_KEYS).contains(&self.internal_max_keys) {
            return Err(AtlasError::Config(format!(
                "internal_max_keys must be between 2 and {}, got {}",
                INTERNAL_NODE_MAX_KEYS, self.internal_max_keys
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the maximum number of pages in the file
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.config.max_pages = pages;
        self
    }

    /// Set the page cache capacity (in pages)
    pub fn cache_capacity(mut self, pages: usize) -> Self {
        self.config.cache_capacity = pages;
        self
    }

    /// Set the leaf split threshold
    pub fn leaf_max_cells(mut self, cells: usize) -> Self {
        self.config.leaf_max_cells = cells;
        self
    }

    /// Set the internal node split threshold
    pub fn internal_max_keys(mut self, keys: usize) -> Self {
        self.config.internal_max_keys = keys;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
