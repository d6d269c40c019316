//! Internal nodes
//!
//! Internal nodes route a key search to the child that covers it.
//! `{left_child, key}` means every key under `left_child` is <= `key`;
//! `rightmost_child` covers everything above the last key.

use bytes::{Buf, BufMut};

use crate::error::{AtlasError, Result};
use crate::storage::PageNum;

use super::{BTreeNode, INTERNAL_NODE_MAX_KEYS};

/// One `{left_child, key}` entry of an internal node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalCell {
    pub left_child: PageNum,
    pub key: u32,
}

impl InternalCell {
    pub fn new(left_child: PageNum, key: u32) -> Self {
        Self { left_child, key }
    }
}

/// A decoded internal page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode {
    is_root: bool,
    parent: PageNum,
    rightmost_child: PageNum,
    /// Strictly ascending by key, at most `INTERNAL_NODE_MAX_KEYS`
    cells: Vec<InternalCell>,
}

impl InternalNode {
    /// A non-root internal node with no keys, only a rightmost child
    pub fn new(rightmost_child: PageNum) -> Self {
        Self {
            is_root: false,
            parent: 0,
            rightmost_child,
            cells: Vec::new(),
        }
    }

    pub fn cells(&self) -> &[InternalCell] {
        &self.cells
    }

    pub fn key(&self, index: usize) -> Option<u32> {
        self.cells.get(index).map(|cell| cell.key)
    }

    pub fn rightmost_child(&self) -> PageNum {
        self.rightmost_child
    }

    pub fn set_rightmost_child(&mut self, child: PageNum) {
        self.rightmost_child = child;
    }

    /// Child pointer in slot `index`; slot `len()` is the rightmost child
    pub fn child(&self, index: usize) -> Option<PageNum> {
        match index.cmp(&self.cells.len()) {
            std::cmp::Ordering::Less => Some(self.cells[index].left_child),
            std::cmp::Ordering::Equal => Some(self.rightmost_child),
            std::cmp::Ordering::Greater => None,
        }
    }

    /// Repoint slot `index` (slot `len()` is the rightmost child)
    ///
    /// # Panics
    /// If `index > len()`.
    pub fn set_child(&mut self, index: usize, child: PageNum) {
        if index == self.cells.len() {
            self.rightmost_child = child;
        } else {
            self.cells[index].left_child = child;
        }
    }

    /// Child whose subtree covers `key`
    pub fn child_for(&self, key: u32) -> PageNum {
        let index = self.search(key);
        match self.cells.get(index) {
            Some(cell) => cell.left_child,
            None => self.rightmost_child,
        }
    }

    /// Every child pointer, left to right
    pub fn children(&self) -> impl Iterator<Item = PageNum> + '_ {
        self.cells
            .iter()
            .map(|cell| cell.left_child)
            .chain(std::iter::once(self.rightmost_child))
    }

    /// Replace every cell at once
    ///
    /// Fails with `NodeFull` if `cells` would not fit in a page.
    pub fn set_cells(&mut self, cells: Vec<InternalCell>) -> Result<()> {
        if cells.len() > INTERNAL_NODE_MAX_KEYS {
            return Err(AtlasError::NodeFull);
        }
        self.cells = cells;
        Ok(())
    }

    /// Remove and return every cell
    pub fn take_cells(&mut self) -> Vec<InternalCell> {
        std::mem::take(&mut self.cells)
    }

    pub(super) fn decode_cells<B: Buf>(
        buf: &mut B,
        is_root: bool,
        parent: PageNum,
        rightmost_child: PageNum,
        count: usize,
    ) -> Self {
        let mut cells = Vec::with_capacity(count);
        for _ in 0..count {
            let left_child = buf.get_u32_le();
            let key = buf.get_u32_le();
            cells.push(InternalCell { left_child, key });
        }
        Self {
            is_root,
            parent,
            rightmost_child,
            cells,
        }
    }

    /// Everything after the common header
    pub(super) fn encode_cells<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.cells.len() as u32);
        buf.put_u32_le(self.rightmost_child);
        for cell in &self.cells {
            buf.put_u32_le(cell.left_child);
            buf.put_u32_le(cell.key);
        }
    }
}

impl BTreeNode for InternalNode {
    type Entry = InternalCell;

    fn search(&self, key: u32) -> usize {
        self.cells.partition_point(|cell| cell.key < key)
    }

    fn max_key(&self) -> Option<u32> {
        self.cells.last().map(|cell| cell.key)
    }

    fn insert_entry(&mut self, index: usize, entry: InternalCell) -> Result<()> {
        if self.cells.len() >= INTERNAL_NODE_MAX_KEYS {
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
