//! Cursor
//!
//! Forward-only traversal over the leaf chain.

use crate::error::{AtlasError, Result};
use crate::node::{BTreeNode, Cell, LeafNode};
use crate::row::Row;
use crate::storage::PageNum;

use super::{BTree, Position};

/// A position in the table, walking leaves through their sibling links
///
/// The current leaf is decoded once on entry, so each step is O(1) and a
/// full scan touches every leaf exactly once regardless of tree height.
pub struct Cursor<'a> {
    tree: &'a mut BTree,
    page_num: PageNum,
    cell_num: usize,
    end_of_table: bool,
    /// Decoded copy of `page_num`
    leaf: LeafNode,
    /// Error hit while advancing, reported by the next `Iterator::next`
    pending: Option<AtlasError>,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(tree: &'a mut BTree, position: Position) -> Result<Self> {
        let leaf = tree.load_leaf(position.page_num)?;
        let mut cursor = Self {
            tree,
            page_num: position.page_num,
            cell_num: position.cell_num,
            end_of_table: false,
            leaf,
            pending: None,
        };
        cursor.settle()?;
        Ok(cursor)
    }

    /// The cell under the cursor
    pub fn value(&self) -> Result<&Cell> {
        if self.end_of_table {
            return Err(AtlasError::EndOfSequence);
        }
        self.leaf.cell(self.cell_num).ok_or(AtlasError::EndOfSequence)
    }

    /// Step to the next cell, crossing into the sibling leaf when needed
    pub fn advance(&mut self) -> Result<()> {
        if self.end_of_table {
            return Ok(());
        }
        self.cell_num += 1;
        self.settle()
    }

    pub fn is_end(&self) -> bool {
        self.end_of_table
    }

    pub fn page_num(&self) -> PageNum {
        self.page_num
    }

    pub fn cell_num(&self) -> usize {
        self.cell_num
    }

    /// Move past exhausted leaves; set `end_of_table` after the last one
    fn settle(&mut self) -> Result<()> {
        let mut hops: u32 = 0;
        while self.cell_num >= self.leaf.len() {
            match self.leaf.sibling() {
                Some(next) => {
                    hops += 1;
                    if hops > self.tree.pager().num_pages() {
                        return Err(AtlasError::corrupt(next, "sibling chain loops"));
                    }
                    self.leaf = self.tree.load_leaf(next)?;
                    self.page_num = next;
                    self.cell_num = 0;
                }
                None => {
                    self.end_of_table = true;
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Iterator for Cursor<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.pending.take() {
            self.end_of_table = true;
            return Some(Err(e));
        }
        if self.end_of_table {
            return None;
        }

        let row = match self.value() {
            Ok(cell) => cell.value,
            Err(e) => {
                self.end_of_table = true;
                return Some(Err(e));
            }
        };

        if let Err(e) = self.advance() {
            self.pending = Some(e);
        }
        Some(Ok(row))
    }
}
