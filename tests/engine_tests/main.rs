//! Engine tests


use atlasdb::{Config, Engine, Row};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

pub fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("engine.db"))
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

pub fn setup_temp_engine_with_small_nodes() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp_dir.path().join("engine.db"))
        .leaf_max_cells(4)
        .internal_max_keys(3)
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

pub fn row(id: u32) -> Row {
    Row::new(
        u64::from(id),
        &format!("user{}", id),
        &format!("user{}@example.com", id),
    )
    .unwrap()
}
