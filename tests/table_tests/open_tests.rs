//! Tests for Table::open
//!
//! These tests verify:
//! - A new file starts with an empty root leaf on page 0
//! - Invalid configuration is rejected
//! - Corrupt files are rejected

use std::fs;

use atlasdb::node::Node;
use atlasdb::storage::PAGE_SIZE;
use atlasdb::{AtlasError, Config, Table};
use tempfile::TempDir;

use crate::{config, db_path};

#[test]
fn test_open_new_table() {
    let temp = TempDir::new().unwrap();

    let mut table = Table::open(config(temp.path())).unwrap();

    assert_eq!(table.root_page(), 0);
    assert_eq!(table.num_pages(), 1);
    assert_eq!(table.height().unwrap(), 0);
    assert!(table.select_all().unwrap().is_empty());

    let Node::Leaf(leaf) = table.load_node(0).unwrap() else {
        panic!("page 0 should be a leaf");
    };
    assert!(leaf.cells().is_empty());
}

#[test]
fn test_close_empty_table_writes_one_page() {
    let temp = TempDir::new().unwrap();

    let table = Table::open(config(temp.path())).unwrap();
    table.close().unwrap();

    assert_eq!(
        fs::metadata(db_path(temp.path())).unwrap().len(),
        PAGE_SIZE as u64
    );
}

#[test]
fn test_open_rejects_invalid_config() {
    let temp = TempDir::new().unwrap();

    for config in [
        Config::builder().path(db_path(temp.path())).leaf_max_cells(1).build(),
        Config::builder().path(db_path(temp.path())).leaf_max_cells(31).build(),
        Config::builder().path(db_path(temp.path())).internal_max_keys(511).build(),
        Config::builder().path(db_path(temp.path())).max_pages(0).build(),
        Config::builder().path(db_path(temp.path())).cache_capacity(0).build(),
    ] {
        assert!(matches!(Table::open(config), Err(AtlasError::Config(_))));
    }
}

#[test]
fn test_open_rejects_partial_page_file() {
    let temp = TempDir::new().unwrap();
    fs::write(db_path(temp.path()), vec![0u8; 100]).unwrap();

    let result = Table::open(config(temp.path()));

    assert!(matches!(result, Err(AtlasError::CorruptFile(_))));
}

#[test]
fn test_open_rejects_zeroed_file() {
    let temp = TempDir::new().unwrap();
    fs::write(db_path(temp.path()), vec![0u8; PAGE_SIZE]).unwrap();

    let result = Table::open(config(temp.path()));

    assert!(matches!(
        result,
        Err(AtlasError::CorruptPage { page: 0, .. })
    ));
}

#[test]
fn test_default_config_limits() {
    let config = Config::default();

    assert_eq!(config.max_pages, 1024);
    assert_eq!(config.cache_capacity, 1024);
    assert_eq!(config.leaf_max_cells, 30);
    assert_eq!(config.internal_max_keys, 510);
    assert!(config.validate().is_ok());
}
