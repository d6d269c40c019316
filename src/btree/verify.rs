//! Structural checks and debug dumps of the tree.

use crate::error::{AtlasError, Result};
use crate::node::{BTreeNode, Node};
use crate::storage::PageNum;

use super::BTree;

/// Shape of a verified tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Internal levels above the leaves
    pub height: usize,
    pub leaf_pages: usize,
    pub internal_pages: usize,
    pub rows: usize,
}

/// Key range a subtree must respect: (lower, upper]
#[derive(Clone, Copy)]
struct Bounds {
    lower: Option<u32>,
    upper: Option<u32>,
}

impl Bounds {
    fn contains(&self, key: u32) -> bool {
        self.lower.map_or(true, |lower| key > lower) && self.upper.map_or(true, |upper| key <= upper)
    }
}

/// Accumulated while walking the tree
#[derive(Default)]
struct Walk {
    stats: TreeStats,
    leaf_depth: Option<usize>,
    /// Leaves in key order, as reached from the root
    leaves: Vec<PageNum>,
}

impl BTree {
    /// Walk the whole tree and check every structural invariant
    ///
    /// - keys strictly ascending in every node, and inside the range the
    ///   parent's separators allow
    /// - node sizes within the page-derived maximum
    /// - every child's parent pointer names the node that references it
    /// - only the root carries the root flag; all leaves at the same depth
    /// - the sibling chain visits every leaf in key order, then ends
    pub fn verify(&mut self) -> Result<TreeStats> {
        let mut walk = Walk::default();
        let root = self.root_page;
        let bounds = Bounds {
            lower: None,
            upper: None,
        };
        self.verify_node(root, None, bounds, 0, &mut walk)?;
        self.verify_leaf_chain(&walk.leaves)?;

        walk.stats.height = walk.leaf_depth.unwrap_or(0);
        Ok(walk.stats)
    }

    fn verify_node(
        &mut self,
        page_num: PageNum,
        parent: Option<PageNum>,
        bounds: Bounds,
        depth: usize,
        walk: &mut Walk,
    ) -> Result<()> {
        if depth > self.pager.num_pages() as usize {
            return Err(AtlasError::corrupt(page_num, "tree deeper than its page count"));
        }

        let node = self.load_node(page_num)?;

        if node.is_root() != (page_num == self.root_page) {
            return Err(AtlasError::corrupt(
                page_num,
                format!("root flag is {} but the root is page {}", node.is_root(), self.root_page),
            ));
        }
        if let Some(parent) = parent {
            if node.parent() != parent {
                return Err(AtlasError::corrupt(
                    page_num,
                    format!("parent pointer {} should be {}", node.parent(), parent),
                ));
            }
        }

        match node {
            Node::Leaf(leaf) => {
                let keys: Vec<u32> = leaf.cells().iter().map(|cell| cell.key).collect();
                check_keys(page_num, &keys, bounds)?;
                if leaf.is_empty() && !leaf.is_root() {
                    return Err(AtlasError::corrupt(page_num, "non-root leaf is empty"));
                }

                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(AtlasError::corrupt(
                            page_num,
                            format!("leaf at depth {} but others at depth {}", depth, expected),
                        ))
                    }
                    Some(_) => {}
                }

                walk.stats.leaf_pages += 1;
                walk.stats.rows += leaf.len();
                walk.leaves.push(page_num);
            }
            Node::Internal(internal) => {
                let keys: Vec<u32> = internal.cells().iter().map(|cell| cell.key).collect();
                check_keys(page_num, &keys, bounds)?;
                walk.stats.internal_pages += 1;

                let mut lower = bounds.lower;
                for cell in internal.cells() {
                    let child_bounds = Bounds {
                        lower,
                        upper: Some(cell.key),
                    };
                    self.verify_node(cell.left_child, Some(page_num), child_bounds, depth + 1, walk)?;
                    lower = Some(cell.key);
                }

                let last_bounds = Bounds {
                    lower,
                    upper: bounds.upper,
                };
                self.verify_node(
                    internal.rightmost_child(),
                    Some(page_num),
                    last_bounds,
                    depth + 1,
                    walk,
                )?;
            }
        }

        Ok(())
    }

    fn verify_leaf_chain(&mut self, leaves: &[PageNum]) -> Result<()> {
        for (i, &page_num) in leaves.iter().enumerate() {
            let leaf = self.load_leaf(page_num)?;
            let expected = leaves.get(i + 1).copied();
            if leaf.sibling() != expected {
                return Err(AtlasError::corrupt(
                    page_num,
                    format!("sibling is {:?}, expected {:?}", leaf.sibling(), expected),
                ));
            }
        }
        Ok(())
    }

    /// Indented dump of the tree, one line per node and key
    ///
    /// ```text
    /// - internal (page 2, size 1)
    ///   - leaf (page 0, size 2)
    ///     - 1
    ///     - 2
    ///   - key 2
    ///   - leaf (page 1, size 1)
    ///     - 3
    /// ```
    pub fn describe(&mut self) -> Result<String> {
        let mut out = String::new();
        let root = self.root_page;
        self.describe_node(root, 0, &mut out)?;
        Ok(out)
    }

    fn describe_node(&mut self, page_num: PageNum, depth: usize, out: &mut String) -> Result<()> {
        if depth > self.pager.num_pages() as usize {
            return Err(AtlasError::corrupt(page_num, "tree deeper than its page count"));
        }

        let indent = "  ".repeat(depth);
        match self.load_node(page_num)? {
            Node::Leaf(leaf) => {
                out.push_str(&format!("{}- leaf (page {}, size {})\n", indent, page_num, leaf.len()));
                for cell in leaf.cells() {
                    out.push_str(&format!("{}  - {}\n", indent, cell.key));
                }
            }
            Node::Internal(internal) => {
                out.push_str(&format!(
                    "{}- internal (page {}, size {})\n",
                    indent,
                    page_num,
                    internal.len()
                ));
                for cell in internal.cells() {
                    self.describe_node(cell.left_child, depth + 1, out)?;
                    out.push_str(&format!("{}  - key {}\n", indent, cell.key));
                }
                self.describe_node(internal.rightmost_child(), depth + 1, out)?;
            }
        }
        Ok(())
    }
}

/// Strictly ascending and inside `bounds`
fn check_keys(page_num: PageNum, keys: &[u32], bounds: Bounds) -> Result<()> {
    if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(AtlasError::corrupt(
            page_num,
            format!("keys out of order: {} then {}", pair[0], pair[1]),
        ));
    }
    if let Some(key) = keys.iter().find(|&&key| !bounds.contains(key)) {
        return Err(AtlasError::corrupt(
            page_num,
            format!("key {} outside its parent's range", key),
        ));
    }
    Ok(())
}
