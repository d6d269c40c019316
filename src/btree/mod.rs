//! B+Tree Module
//!
//! Search, ordered insertion and node splitting over pages from the pager.
//!
//! ## Responsibilities
//! - Descend from the root to the leaf covering a key (binary search per node)
//! - Insert cells in key order, rejecting duplicates
//! - Split full leaves and internal nodes, propagating separators upward
//! - Promote a new root when the old root splits (the only way height grows)
//!
//! ## Split Shape
//! ```text
//!            before                               after
//!
//!          [ .. K .. ]                        [ .. m | K .. ]
//!               │                                 │    │
//!        [ a b c d e + x ]               [ a b c ] ──▶ [ d e x ]
//!          old leaf (full)                 old leaf     new leaf
//!                                          max = m
//! ```
//! The old page keeps the lower `ceil((n + 1) / 2)` entries, the new page
//! gets the rest, and the parent gains `{old, m}` with the new page taking
//! the slot that used to point at the old one.

mod cursor;
mod verify;

pub use cursor::Cursor;
pub use verify::TreeStats;

use crate::error::{AtlasError, Result};
use crate::node::{BTreeNode, Cell, InternalCell, InternalNode, LeafNode, Node};
use crate::row::Row;
use crate::storage::{PageNum, Pager};

/// A cell position inside a specific leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub page_num: PageNum,
    pub cell_num: usize,
}

/// A paged B+tree keyed by `u32`
///
/// ## Concurrency
/// All methods take `&mut self`: a split passes through states that are not
/// individually consistent, so callers must serialize access (see `Engine`).
pub struct BTree {
    /// Page cache and file
    pager: Pager,

    /// Current root (leaf or internal)
    root_page: PageNum,

    /// Split threshold for leaves
    leaf_max_cells: usize,

    /// Split threshold for internal nodes
    internal_max_keys: usize,
}

impl BTree {
    /// Wrap a pager whose tree is rooted at `root_page`
    pub fn new(
        pager: Pager,
        root_page: PageNum,
        leaf_max_cells: usize,
        internal_max_keys: usize,
    ) -> Self {
        Self {
            pager,
            root_page,
            leaf_max_cells,
            internal_max_keys,
        }
    }

    /// Write an empty root leaf into a brand new file
    pub fn init_empty(&mut self) -> Result<()> {
        let page_num = self.pager.allocate_page()?;
        self.store(page_num, &Node::Leaf(LeafNode::new_root()))?;
        self.root_page = page_num;
        Ok(())
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Locate the leaf position for `key`
    ///
    /// Internal nodes route to the first key >= `key` (or the rightmost
    /// child); the leaf position is the first cell whose key is >= `key`,
    /// which is one past the last cell when `key` is larger than all of them.
    pub fn locate(&mut self, key: u32) -> Result<Position> {
        let mut page_num = self.root_page;

        // A well-formed tree reaches a leaf long before visiting every page.
        for _ in 0..=self.pager.num_pages() {
            match self.load_node(page_num)? {
                Node::Internal(internal) => page_num = internal.child_for(key),
                Node::Leaf(leaf) => {
                    return Ok(Position {
                        page_num,
                        cell_num: leaf.search(key),
                    })
                }
            }
        }

        Err(AtlasError::corrupt(
            page_num,
            "descent from the root never reached a leaf",
        ))
    }

    /// Cursor positioned at the first row with id >= `key`
    pub fn find(&mut self, key: u32) -> Result<Cursor<'_>> {
        let position = self.locate(key)?;
        Cursor::new(self, position)
    }

    /// Cursor positioned at the smallest row
    pub fn start(&mut self) -> Result<Cursor<'_>> {
        self.find(u32::MIN)
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert a row keyed by its id
    ///
    /// Fails without touching the tree on `KeyOutOfRange`, `DuplicateKey`,
    /// or `TableFull` (the split chain would need more pages than remain).
    pub fn insert(&mut self, row: Row) -> Result<()> {
        let key = row.key()?;
        let Position { page_num, cell_num } = self.locate(key)?;
        let mut leaf = self.load_leaf(page_num)?;

        if leaf.cell(cell_num).is_some_and(|cell| cell.key == key) {
            return Err(AtlasError::DuplicateKey(key));
        }

        let cell = Cell::new(key, row);
        if leaf.len() < self.leaf_max_cells {
            leaf.insert_entry(cell_num, cell)?;
            return self.store(page_num, &Node::Leaf(leaf));
        }

        self.ensure_split_capacity(&leaf)?;
        self.split_leaf_and_insert(page_num, leaf, cell_num, cell)
    }

    /// Make sure the whole split chain can allocate its pages
    ///
    /// One page per splitting node, plus one if the root splits.
    fn ensure_split_capacity(&mut self, leaf: &LeafNode) -> Result<()> {
        let mut needed: u32 = 1;
        let mut splitting_root = leaf.is_root();
        let mut parent = leaf.parent();

        for _ in 0..=self.pager.num_pages() {
            if splitting_root {
                break;
            }
            let node = self.load_internal(parent)?;
            if node.len() < self.internal_max_keys {
                break;
            }
            needed += 1;
            splitting_root = node.is_root();
            parent = node.parent();
        }
        if splitting_root {
            needed += 1;
        }

        let available = self.pager.max_pages().saturating_sub(self.pager.num_pages());
        if needed > available {
            tracing::debug!(
                "Insert needs {} new pages but only {} remain",
                needed,
                available
            );
            return Err(AtlasError::TableFull);
        }
        Ok(())
    }

    /// Split a full leaf around a new cell
    fn split_leaf_and_insert(
        &mut self,
        page_num: PageNum,
        mut old: LeafNode,
        index: usize,
        cell: Cell,
    ) -> Result<()> {
        let new_page = self.pager.allocate_page()?;

        let mut cells = old.take_cells();
        cells.insert(index, cell);
        let left_count = cells.len().div_ceil(2);
        let right_cells = cells.split_off(left_count);
        let separator = cells[left_count - 1].key;

        let mut new_leaf = LeafNode::new();
        new_leaf.set_parent(old.parent());
        new_leaf.set_sibling(old.sibling());
        new_leaf.set_cells(right_cells)?;

        old.set_cells(cells)?;
        old.set_sibling(Some(new_page));

        tracing::debug!(
            "Split leaf {} ({} cells) and new leaf {} ({} cells) at key {}",
            page_num,
            old.len(),
            new_page,
            new_leaf.len(),
            separator
        );

        let was_root = old.is_root();
        let parent = old.parent();
        self.store(page_num, &Node::Leaf(old))?;
        self.store(new_page, &Node::Leaf(new_leaf))?;

        if was_root {
            self.create_new_root(separator, new_page)
        } else {
            self.insert_into_parent(parent, page_num, separator, new_page)
        }
    }

    /// Record that `left_child` split into `left_child` (keys <= `separator`)
    /// and `right_child` (the keys above it)
    fn insert_into_parent(
        &mut self,
        parent_page: PageNum,
        left_child: PageNum,
        separator: u32,
        right_child: PageNum,
    ) -> Result<()> {
        let mut parent = self.load_internal(parent_page)?;

        let index = parent.search(separator);
        if parent.child(index) != Some(left_child) {
            return Err(AtlasError::corrupt(
                parent_page,
                format!("child {} is not in slot {}", left_child, index),
            ));
        }

        if parent.len() < self.internal_max_keys {
            parent.insert_entry(index, InternalCell::new(left_child, separator))?;
            parent.set_child(index + 1, right_child);
            return self.store(parent_page, &Node::Internal(parent));
        }

        self.split_internal_and_insert(parent_page, parent, index, left_child, separator, right_child)
    }

    /// Split a full internal node around a new separator
    ///
    /// The last key of the left half moves up to the grandparent; its child
    /// becomes the left node's rightmost child.
    fn split_internal_and_insert(
        &mut self,
        page_num: PageNum,
        mut old: InternalNode,
        index: usize,
        left_child: PageNum,
        separator: u32,
        right_child: PageNum,
    ) -> Result<()> {
        let new_page = self.pager.allocate_page()?;

        let mut cells = old.take_cells();
        cells.insert(index, InternalCell::new(left_child, separator));
        let rightmost = if index + 1 == cells.len() {
            right_child
        } else {
            cells[index + 1].left_child = right_child;
            old.rightmost_child()
        };

        let left_count = cells.len().div_ceil(2);
        let right_cells = cells.split_off(left_count);
        let promoted = cells
            .pop()
            .ok_or_else(|| AtlasError::corrupt(page_num, "split left an empty left half"))?;

        old.set_cells(cells)?;
        old.set_rightmost_child(promoted.left_child);

        let mut new_node = InternalNode::new(rightmost);
        new_node.set_parent(old.parent());
        new_node.set_cells(right_cells)?;

        tracing::debug!(
            "Split internal {} ({} keys) and new internal {} ({} keys), promoting key {}",
            page_num,
            old.len(),
            new_page,
            new_node.len(),
            promoted.key
        );

        let moved: Vec<PageNum> = new_node.children().collect();
        let was_root = old.is_root();
        let parent = old.parent();
        self.store(page_num, &Node::Internal(old))?;
        self.store(new_page, &Node::Internal(new_node))?;

        for child in moved {
            let mut node = self.load_node(child)?;
            node.set_parent(new_page);
            self.store(child, &node)?;
        }

        if was_root {
            self.create_new_root(promoted.key, new_page)
        } else {
            self.insert_into_parent(parent, page_num, promoted.key, new_page)
        }
    }

    /// Put a new internal root above the split old root
    ///
    /// The new root holds `{old_root, separator}` and `right_child` as its
    /// rightmost child. Height grows by one.
    fn create_new_root(&mut self, separator: u32, right_child: PageNum) -> Result<()> {
        let old_root = self.root_page;
        let new_root = self.pager.allocate_page()?;

        let mut left = self.load_node(old_root)?;
        left.set_root(false);
        left.set_parent(new_root);
        self.store(old_root, &left)?;

        let mut right = self.load_node(right_child)?;
        right.set_parent(new_root);
        self.store(right_child, &right)?;

        let mut root = InternalNode::new(right_child);
        root.set_root(true);
        root.insert_entry(0, InternalCell::new(old_root, separator))?;
        self.store(new_root, &Node::Internal(root))?;

        self.root_page = new_root;
        tracing::debug!(
            "Promoted page {} to root above {} and {}",
            new_root,
            old_root,
            right_child
        );
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn root_page(&self) -> PageNum {
        self.root_page
    }

    pub(crate) fn set_root_page(&mut self, root_page: PageNum) {
        self.root_page = root_page;
    }

    /// Number of internal levels above the leaves (0 for a leaf root)
    pub fn height(&mut self) -> Result<usize> {
        let mut height = 0;
        let mut page_num = self.root_page;
        loop {
            match self.load_node(page_num)? {
                Node::Leaf(_) => return Ok(height),
                Node::Internal(internal) => {
                    height += 1;
                    if height > self.pager.num_pages() as usize {
                        return Err(AtlasError::corrupt(page_num, "tree height exceeds page count"));
                    }
                    page_num = internal.child(0).unwrap_or(internal.rightmost_child());
                }
            }
        }
    }

    pub fn leaf_max_cells(&self) -> usize {
        self.leaf_max_cells
    }

    pub fn internal_max_keys(&self) -> usize {
        self.internal_max_keys
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }

    /// Give the pager back (for closing)
    pub fn into_pager(self) -> Pager {
        self.pager
    }

    // =========================================================================
    // Page <-> Node
    // =========================================================================

    /// Decode the node stored in a page
    pub fn load_node(&mut self, page_num: PageNum) -> Result<Node> {
        let page = self.pager.get_page(page_num)?;
        Node::decode(page_num, page)
    }

    pub(crate) fn load_leaf(&mut self, page_num: PageNum) -> Result<LeafNode> {
        match self.load_node(page_num)? {
            Node::Leaf(leaf) => Ok(leaf),
            Node::Internal(_) => Err(AtlasError::corrupt(page_num, "expected a leaf node")),
        }
    }

    pub(crate) fn load_internal(&mut self, page_num: PageNum) -> Result<InternalNode> {
        match self.load_node(page_num)? {
            Node::Internal(internal) => Ok(internal),
            Node::Leaf(_) => Err(AtlasError::corrupt(page_num, "expected an internal node")),
        }
    }

    fn store(&mut self, page_num: PageNum, node: &Node) -> Result<()> {
        let page = self.pager.get_page(page_num)?;
        node.encode(page);
        Ok(())
    }
}
