//! Tests for BTree::insert
//!
//! These tests verify:
//! - Sorted storage regardless of insertion order
//! - Duplicate rejection without modifying the tree
//! - Leaf splits and root promotion
//! - Internal node splits up to a height-2 tree
//! - TableFull leaves the tree intact

use atlasdb::btree::BTree;
use atlasdb::node::{BTreeNode, Node};
use atlasdb::AtlasError;
use tempfile::TempDir;

use crate::{open_tree, open_tree_with_budget, row, scan_ids, shuffled_keys};

/// Decode every allocated page
fn snapshot(tree: &mut BTree) -> Vec<Node> {
    (0..tree.pager().num_pages())
        .map(|page_num| tree.load_node(page_num).unwrap())
        .collect()
}

// =============================================================================
// Basic Insert Tests
// =============================================================================

#[test]
fn test_empty_tree() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 30, 510);

    assert_eq!(tree.root_page(), 0);
    assert_eq!(tree.height().unwrap(), 0);
    assert!(scan_ids(&mut tree).is_empty());
}

#[test]
fn test_insert_single_row() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 30, 510);

    tree.insert(row(1)).unwrap();

    let cursor = tree.find(1).unwrap();
    assert_eq!(cursor.value().unwrap().value, row(1));
}

#[test]
fn test_insert_out_of_order_is_sorted() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 30, 510);

    for id in [5, 1, 4, 2, 3] {
        tree.insert(row(id)).unwrap();
    }

    assert_eq!(scan_ids(&mut tree), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_duplicate_key_rejected() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 30, 510);
    tree.insert(row(1)).unwrap();

    let result = tree.insert(row(1));

    assert!(matches!(result, Err(AtlasError::DuplicateKey(1))));
    assert_eq!(scan_ids(&mut tree), vec![1]);
}

#[test]
fn test_duplicate_in_split_tree_leaves_pages_unchanged() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 3, 2);
    for id in 1..=20 {
        tree.insert(row(id)).unwrap();
    }
    let before = snapshot(&mut tree);

    for id in [1, 7, 20] {
        assert!(matches!(
            tree.insert(row(id)),
            Err(AtlasError::DuplicateKey(_))
        ));
    }

    assert_eq!(snapshot(&mut tree), before);
}

#[test]
fn test_key_out_of_range_rejected() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 30, 510);
    let big = atlasdb::row::Row::new(u64::from(u32::MAX) + 1, "big", "big@example.com").unwrap();

    let result = tree.insert(big);

    assert!(matches!(result, Err(AtlasError::KeyOutOfRange(_))));
    assert!(scan_ids(&mut tree).is_empty());
}

// =============================================================================
// Split Tests
// =============================================================================

#[test]
fn test_full_leaf_splits_into_new_root() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 30, 510);

    for id in 1..=31 {
        tree.insert(row(id)).unwrap();
    }

    assert_eq!(tree.height().unwrap(), 1);
    assert_eq!(tree.root_page(), 2);
    assert_eq!(tree.pager().num_pages(), 3);

    let Node::Internal(root) = tree.load_node(2).unwrap() else {
        panic!("root should be internal");
    };
    assert!(root.is_root());
    assert_eq!(root.len(), 1);
    assert_eq!(root.key(0), Some(16));
    assert_eq!(root.children().collect::<Vec<_>>(), vec![0, 1]);

    let Node::Leaf(left) = tree.load_node(0).unwrap() else {
        panic!("page 0 should stay a leaf");
    };
    assert!(!left.is_root());
    assert_eq!(left.parent(), 2);
    assert_eq!(left.len(), 16);
    assert_eq!(left.sibling(), Some(1));

    let Node::Leaf(right) = tree.load_node(1).unwrap() else {
        panic!("page 1 should be a leaf");
    };
    assert_eq!(right.parent(), 2);
    assert_eq!(right.len(), 15);
    assert_eq!(right.sibling(), None);

    assert_eq!(scan_ids(&mut tree), (1..=31).collect::<Vec<u64>>());
}

#[test]
fn test_internal_split_grows_height_two() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 3, 2);

    for id in 1..=8 {
        tree.insert(row(id)).unwrap();
    }

    assert_eq!(tree.height().unwrap(), 2);
    assert_eq!(tree.root_page(), 6);

    let Node::Internal(root) = tree.load_node(6).unwrap() else {
        panic!("root should be internal");
    };
    assert_eq!(root.len(), 1);
    assert_eq!(root.key(0), Some(4));
    assert_eq!(root.children().collect::<Vec<_>>(), vec![2, 5]);

    for (page, key, children) in [(2, 2, vec![0, 1]), (5, 6, vec![3, 4])] {
        let Node::Internal(node) = tree.load_node(page).unwrap() else {
            panic!("page {} should be internal", page);
        };
        assert_eq!(node.parent(), 6);
        assert_eq!(node.key(0), Some(key));
        assert_eq!(node.children().collect::<Vec<_>>(), children);
    }

    assert_eq!(scan_ids(&mut tree), (1..=8).collect::<Vec<u64>>());
}

#[test]
fn test_no_loss_across_many_splits() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 3, 2);
    let keys = shuffled_keys(300);

    for &id in &keys {
        tree.insert(row(id)).unwrap();
    }

    assert_eq!(scan_ids(&mut tree), (1..=300).collect::<Vec<u64>>());
    for &id in &keys {
        let cursor = tree.find(id).unwrap();
        assert_eq!(cursor.value().unwrap().key, id);
    }
}

#[test]
fn test_descending_inserts() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree(temp.path(), 4, 3);

    for id in (1..=200).rev() {
        tree.insert(row(id)).unwrap();
    }

    assert_eq!(scan_ids(&mut tree), (1..=200).collect::<Vec<u64>>());
    assert!(tree.height().unwrap() >= 3);
}

// =============================================================================
// Capacity Tests
// =============================================================================

#[test]
fn test_table_full_leaves_tree_intact() {
    let temp = TempDir::new().unwrap();
    let mut tree = open_tree_with_budget(temp.path(), 3, 2, 3);

    for id in 1..=5 {
        tree.insert(row(id)).unwrap();
    }
    let before = snapshot(&mut tree);

    let result = tree.insert(row(6));

    assert!(matches!(result, Err(AtlasError::TableFull)));
    assert_eq!(tree.pager().num_pages(), 3);
    assert_eq!(snapshot(&mut tree), before);
    assert_eq!(scan_ids(&mut tree), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_table_full_on_root_split() {
    let temp = TempDir::new().unwrap();
    // A root split needs two fresh pages
    let mut tree = open_tree_with_budget(temp.path(), 3, 2, 2);

    for id in 1..=3 {
        tree.insert(row(id)).unwrap();
    }

    assert!(matches!(tree.insert(row(4)), Err(AtlasError::TableFull)));
    assert_eq!(tree.pager().num_pages(), 1);
    assert_eq!(tree.height().unwrap(), 0);
}
