//! Table tests

mod open_tests;

use std::path::{Path, PathBuf};

use atlasdb::{Config, Row};

// =============================================================================
// Helper Functions
// =============================================================================

pub fn db_path(dir: &Path) -> PathBuf {
    dir.join("table.db")
}

pub fn config(dir: &Path) -> Config {
    Config::builder().path(db_path(dir)).build()
}

/// Small node limits so a few dozen rows build a multi-level tree
pub fn small_config(dir: &Path) -> Config {
    Config::builder()
        .path(db_path(dir))
        .leaf_max_cells(3)
        .internal_max_keys(2)
        .build()
}

pub fn row(id: u32) -> Row {
    Row::new(
        u64::from(id),
        &format!("user{}", id),
        &format!("user{}@example.com", id),
    )
    .unwrap()
}
