//! Leaf nodes
//!
//! Leaves hold the rows, sorted by key, plus a link to the next leaf.

use bytes::{Buf, BufMut};

use crate::error::{AtlasError, Result};
use crate::row::Row;
use crate::storage::PageNum;

use super::{BTreeNode, LEAF_NODE_MAX_CELLS};

/// One `{key, row}` entry of a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub key: u32,
    pub value: Row,
}

impl Cell {
    pub fn new(key: u32, value: Row) -> Self {
        Self { key, value }
    }
}

/// A decoded leaf page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafNode {
    is_root: bool,
    parent: PageNum,
    /// Next leaf in key order (0 on disk when there is none)
    sibling: Option<PageNum>,
    /// Strictly ascending by key, at most `LEAF_NODE_MAX_CELLS`
    cells: Vec<Cell>,
}

impl LeafNode {
    /// An empty, non-root leaf
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty root leaf (a brand new table)
    pub fn new_root() -> Self {
        Self {
            is_root: true,
            ..Self::default()
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn sibling(&self) -> Option<PageNum> {
        self.sibling
    }

    pub fn set_sibling(&mut self, sibling: Option<PageNum>) {
        self.sibling = sibling;
    }

    /// Replace every cell at once
    ///
    /// Fails with `NodeFull` if `cells` would not fit in a page.
    pub fn set_cells(&mut self, cells: Vec<Cell>) -> Result<()> {
        if cells.len() > LEAF_NODE_MAX_CELLS {
            return Err(AtlasError::NodeFull);
        }
        self.cells = cells;
        Ok(())
    }

    /// Remove and return every cell
    pub fn take_cells(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.cells)
    }

    pub(super) fn decode_cells<B: Buf>(
        buf: &mut B,
        is_root: bool,
        parent: PageNum,
        sibling: PageNum,
        count: usize,
    ) -> Self {
        let mut cells = Vec::with_capacity(count);
        for _ in 0..count {
            let key = buf.get_u32_le();
            let value = Row::decode(buf);
            cells.push(Cell { key, value });
        }
        Self {
            is_root,
            parent,
            sibling: (sibling != 0).then_some(sibling),
            cells,
        }
    }

    /// Everything after the common header
    pub(super) fn encode_cells<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.cells.len() as u32);
        buf.put_u32_le(self.sibling.unwrap_or(0));
        for cell in &self.cells {
            buf.put_u32_le(cell.key);
            cell.value.encode(buf);
        }
    }
}

impl BTreeNode for LeafNode {
    type Entry = Cell;

    fn search(&self, key: u32) -> usize {
        self.cells.partition_point(|cell| cell.key < key)
    }

    fn max_key(&self) -> Option<u32> {
        self.cells.last().map(|cell| cell.key)
    }

    fn insert_entry(&mut self, index: usize, entry: Cell) -> Result<()> {
        if self.cells.len() >= LEAF_NODE_MAX_CELLS {
            return Err(AtlasError::NodeFull);
        }
        self.cells.insert(index, entry);
        Ok(())
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn is_root(&self) -> bool {
        self.is_root
    }

    fn set_root(&mut self, is_root: bool) {
        self.is_root = is_root;
    }

    fn parent(&self) -> PageNum {
        self.parent
    }

    fn set_parent(&mut self, parent: PageNum) {
        self.parent = parent;
    }
}
