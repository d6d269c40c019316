//! B+tree tests

mod insert_tests;

use std::path::Path;

use atlasdb::btree::BTree;
use atlasdb::row::Row;
use atlasdb::storage::Pager;

// =============================================================================
// Helper Functions
// =============================================================================

/// A fresh tree in `dir` with the given split limits
pub fn open_tree(dir: &Path, leaf_max_cells: usize, internal_max_keys: usize) -> BTree {
    open_tree_with_budget(dir, leaf_max_cells, internal_max_keys, 1024)
}

pub fn open_tree_with_budget(
    dir: &Path,
    leaf_max_cells: usize,
    internal_max_keys: usize,
    max_pages: u32,
) -> BTree {
    let pager = Pager::open(&dir.join("tree.db"), max_pages, max_pages as usize).unwrap();
    let mut tree = BTree::new(pager, 0, leaf_max_cells, internal_max_keys);
    tree.init_empty().unwrap();
    tree
}

pub fn row(id: u32) -> Row {
    Row::new(
        u64::from(id),
        &format!("user{}", id),
        &format!("user{}@example.com", id),
    )
    .unwrap()
}

pub fn scan_ids(tree: &mut BTree) -> Vec<u64> {
    tree.start()
        .unwrap()
        .map(|row| row.unwrap().id())
        .collect()
}

/// Deterministic shuffle of `1..=n` (multiplicative step, coprime with n)
pub fn shuffled_keys(n: u32) -> Vec<u32> {
    let step = (1..)
        .map(|i| 7919 * i)
        .find(|s| gcd(*s, n) == 1)
        .unwrap_or(1);
    (0..n).map(|i| (i * step) % n + 1).collect()
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
