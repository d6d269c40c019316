//! Node Module
//!
//! Byte layout of B+tree nodes and the codec between pages and nodes.
//!
//! ## Leaf Node
//! ```text
//! ┌──────────┬────────────┬────────────┬────────────────┬─────────────┐
//! │ Type (1) │ IsRoot (1) │ Parent (4) │ CellCount (4)  │ Sibling (4) │
//! ├──────────┴────────────┴────────────┴────────────────┴─────────────┤
//! │ [Key (4)][Row (128)]  ... repeated CellCount times                │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Internal Node
//! ```text
//! ┌──────────┬────────────┬────────────┬────────────────┬────────────────────┐
//! │ Type (1) │ IsRoot (1) │ Parent (4) │ KeyCount (4)   │ RightmostChild (4) │
//! ├──────────┴────────────┴────────────┴────────────────┴────────────────────┤
//! │ [LeftChild (4)][Key (4)]  ... repeated KeyCount times                    │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Cells are contiguous with no padding and
//! the unused tail of the page is zeroed.

mod internal;
mod leaf;

use bytes::{Buf, BufMut};

use crate::error::{AtlasError, Result};
use crate::row::ROW_SIZE;
use crate::storage::{Page, PageNum, PAGE_SIZE};

pub use internal::{InternalCell, InternalNode};
pub use leaf::{Cell, LeafNode};

// =============================================================================
// Common Node Header Layout
// =============================================================================

pub const NODE_TYPE_SIZE: usize = std::mem::size_of::<u8>();
pub const IS_ROOT_SIZE: usize = std::mem::size_of::<u8>();
pub const PARENT_POINTER_SIZE: usize = std::mem::size_of::<u32>();
pub const COMMON_NODE_HEADER_SIZE: usize = NODE_TYPE_SIZE + IS_ROOT_SIZE + PARENT_POINTER_SIZE;

// =============================================================================
// Leaf Node Layout
// =============================================================================

pub const LEAF_NODE_NUM_CELLS_SIZE: usize = std::mem::size_of::<u32>();
pub const LEAF_NODE_SIBLING_SIZE: usize = std::mem::size_of::<u32>();
pub const LEAF_NODE_HEADER_SIZE: usize =
    COMMON_NODE_HEADER_SIZE + LEAF_NODE_NUM_CELLS_SIZE + LEAF_NODE_SIBLING_SIZE;

pub const LEAF_NODE_KEY_SIZE: usize = std::mem::size_of::<u32>();
pub const LEAF_NODE_CELL_SIZE: usize = LEAF_NODE_KEY_SIZE + ROW_SIZE;
pub const LEAF_NODE_MAX_CELLS: usize = (PAGE_SIZE - LEAF_NODE_HEADER_SIZE) / LEAF_NODE_CELL_SIZE;

// =============================================================================
// Internal Node Layout
// =============================================================================

pub const INTERNAL_NODE_NUM_KEYS_SIZE: usize = std::mem::size_of::<u32>();
pub const INTERNAL_NODE_RIGHT_CHILD_SIZE: usize = std::mem::size_of::<u32>();
pub const INTERNAL_NODE_HEADER_SIZE: usize =
    COMMON_NODE_HEADER_SIZE + INTERNAL_NODE_NUM_KEYS_SIZE + INTERNAL_NODE_RIGHT_CHILD_SIZE;

pub const INTERNAL_NODE_CHILD_SIZE: usize = std::mem::size_of::<u32>();
pub const INTERNAL_NODE_KEY_SIZE: usize = std::mem::size_of::<u32>();
pub const INTERNAL_NODE_CELL_SIZE: usize = INTERNAL_NODE_CHILD_SIZE + INTERNAL_NODE_KEY_SIZE;
pub const INTERNAL_NODE_MAX_KEYS: usize =
    (PAGE_SIZE - INTERNAL_NODE_HEADER_SIZE) / INTERNAL_NODE_CELL_SIZE;

// =============================================================================
// Node Kind
// =============================================================================

/// Type tag stored in the first byte of every node page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeKind {
    Leaf = 1,
    Internal = 2,
}

impl TryFrom<u8> for NodeKind {
    type Error = u8;

    fn try_from(tag: u8) -> std::result::Result<Self, u8> {
        match tag {
            1 => Ok(NodeKind::Leaf),
            2 => Ok(NodeKind::Internal),
            other => Err(other),
        }
    }
}

// =============================================================================
// Capability Interface
// =============================================================================

/// Operations shared by leaf and internal nodes
pub trait BTreeNode {
    /// What one slot of this node holds
    type Entry;

    /// Index of the first entry whose key is >= `key`
    ///
    /// Returns `len()` when `key` is greater than every key.
    fn search(&self, key: u32) -> usize;

    /// Largest key stored directly in this node
    fn max_key(&self) -> Option<u32>;

    /// Insert an entry at `index`, shifting later entries right
    ///
    /// Fails with `NodeFull` (and leaves the node untouched) when the node
    /// already holds as many entries as fit in a page.
    ///
    /// # Panics
    /// If `index > len()`.
    fn insert_entry(&mut self, index: usize, entry: Self::Entry) -> Result<()>;

    /// Number of entries (cells or keys)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_root(&self) -> bool;
    fn set_root(&mut self, is_root: bool);

    /// Parent page number (meaningless for the root)
    fn parent(&self) -> PageNum;
    fn set_parent(&mut self, parent: PageNum);
}

// =============================================================================
// Node
// =============================================================================

/// A decoded B+tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(LeafNode),
    Internal(InternalNode),
}

impl Node {
    /// Decode the node stored in `page`
    ///
    /// Fails with `CorruptPage` on an unknown type tag, a bad root flag,
    /// or a count that cannot fit in one page.
    pub fn decode(page_num: PageNum, page: &Page) -> Result<Self> {
        let mut buf = page.as_bytes();

        let tag = buf.get_u8();
        let kind = NodeKind::try_from(tag)
            .map_err(|tag| AtlasError::corrupt(page_num, format!("unknown node type {}", tag)))?;

        let is_root = match buf.get_u8() {
            0 => false,
            1 => true,
            other => {
                return Err(AtlasError::corrupt(
                    page_num,
                    format!("invalid root flag {}", other),
                ))
            }
        };
        let parent = buf.get_u32_le();
        let count = buf.get_u32_le() as usize;
        let link = buf.get_u32_le();

        match kind {
            NodeKind::Leaf => {
                if count > LEAF_NODE_MAX_CELLS {
                    return Err(AtlasError::corrupt(
                        page_num,
                        format!("leaf cell count {} exceeds {}", count, LEAF_NODE_MAX_CELLS),
                    ));
                }
                Ok(Node::Leaf(LeafNode::decode_cells(
                    &mut buf, is_root, parent, link, count,
                )))
            }
            NodeKind::Internal => {
                if count > INTERNAL_NODE_MAX_KEYS {
                    return Err(AtlasError::corrupt(
                        page_num,
                        format!(
                            "internal key count {} exceeds {}",
                            count, INTERNAL_NODE_MAX_KEYS
                        ),
                    ));
                }
                Ok(Node::Internal(InternalNode::decode_cells(
                    &mut buf, is_root, parent, link, count,
                )))
            }
        }
    }

    /// Encode this node over `page`, zeroing whatever it does not use
    pub fn encode(&self, page: &mut Page) {
        let bytes = page.as_bytes_mut();
        bytes.fill(0);
        let mut buf = bytes;

        buf.put_u8(self.kind() as u8);
        buf.put_u8(u8::from(self.is_root()));
        buf.put_u32_le(self.parent());

        match self {
            Node::Leaf(leaf) => leaf.encode_cells(&mut buf),
            Node::Internal(internal) => internal.encode_cells(&mut buf),
        }
    }

    /// Encode into a fresh page
    pub fn to_page(&self) -> Page {
        let mut page = Page::zeroed();
        self.encode(&mut page);
        page
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Internal(_) => NodeKind::Internal,
        }
    }

    pub fn is_root(&self) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.is_root(),
            Node::Internal(internal) => internal.is_root(),
        }
    }

    pub fn set_root(&mut self, is_root: bool) {
        match self {
            Node::Leaf(leaf) => leaf.set_root(is_root),
            Node::Internal(internal) => internal.set_root(is_root),
        }
    }

    pub fn parent(&self) -> PageNum {
        match self {
            Node::Leaf(leaf) => leaf.parent(),
            Node::Internal(internal) => internal.parent(),
        }
    }

    pub fn set_parent(&mut self, parent: PageNum) {
        match self {
            Node::Leaf(leaf) => leaf.set_parent(parent),
            Node::Internal(internal) => internal.set_parent(parent),
        }
    }

    pub fn max_key(&self) -> Option<u32> {
        match self {
            Node::Leaf(leaf) => leaf.max_key(),
            Node::Internal(internal) => internal.max_key(),
        }
    }

    /// Number of cells (leaf) or keys (internal)
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.len(),
            Node::Internal(internal) => internal.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
