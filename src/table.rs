//! Table Module
//!
//! One table of rows stored in one database file.
//!
//! ## Responsibilities
//! - Open the file, initialising an empty root leaf for a new database
//! - Recover the current root of an existing database
//! - Expose insert, ordered scans and point lookups
//! - Flush every page on close

use crate::btree::{BTree, Cursor, TreeStats};
use crate::config::Config;
use crate::error::{AtlasError, Result};
use crate::node::Node;
use crate::row::Row;
use crate::storage::{PageNum, Pager};

/// Page 0 is the first root ever written and stays the leftmost leaf
const FIRST_LEAF: PageNum = 0;

/// A table of rows keyed by id
pub struct Table {
    tree: BTree,
    config: Config,
}

impl Table {
    /// Open or create the table described by `config`
    ///
    /// A new (empty) file gets an empty root leaf on page 0. An existing
    /// file is walked from page 0 up through the parent pointers until the
    /// node flagged as root is reached.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let pager = Pager::open(&config.path, config.max_pages, config.cache_capacity)?;
        let existing = pager.num_pages();

        let mut tree = BTree::new(
            pager,
            FIRST_LEAF,
            config.leaf_max_cells,
            config.internal_max_keys,
        );

        if existing == 0 {
            tree.init_empty()?;
            tracing::info!("Created new table at {}", config.path.display());
        } else {
            let root = find_root(&mut tree)?;
            tree.set_root_page(root);
            tracing::info!(
                "Opened table at {} ({} pages, root page {})",
                config.path.display(),
                existing,
                root
            );
        }

        Ok(Self { tree, config })
    }

    /// Insert a row keyed by its id
    pub fn insert(&mut self, row: Row) -> Result<()> {
        self.tree.insert(row)
    }

    /// Cursor at the smallest row
    pub fn scan(&mut self) -> Result<Cursor<'_>> {
        self.tree.start()
    }

    /// Cursor at the first row whose id is >= `key`
    pub fn find(&mut self, key: u32) -> Result<Cursor<'_>> {
        self.tree.find(key)
    }

    /// Every row, in id order
    pub fn select_all(&mut self) -> Result<Vec<Row>> {
        self.scan()?.collect()
    }

    /// Flush every page, sync and release the file
    pub fn close(self) -> Result<()> {
        let path = self.config.path;
        self.tree.into_pager().close()?;
        tracing::info!("Closed table at {}", path.display());
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn root_page(&self) -> PageNum {
        self.tree.root_page()
    }

    /// Internal levels above the leaves
    pub fn height(&mut self) -> Result<usize> {
        self.tree.height()
    }

    /// Pages allocated so far
    pub fn num_pages(&self) -> u32 {
        self.tree.pager().num_pages()
    }

    pub fn load_node(&mut self, page_num: PageNum) -> Result<Node> {
        self.tree.load_node(page_num)
    }

    pub fn verify(&mut self) -> Result<TreeStats> {
        self.tree.verify()
    }

    pub fn describe(&mut self) -> Result<String> {
        self.tree.describe()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Follow parent pointers from the first leaf up to the root
fn find_root(tree: &mut BTree) -> Result<PageNum> {
    let mut page_num = FIRST_LEAF;
    let mut node = tree.load_node(page_num)?;

    if !matches!(node, Node::Leaf(_)) {
        return Err(AtlasError::corrupt(page_num, "first page is not a leaf"));
    }

    for _ in 0..tree.pager().num_pages() {
        if node.is_root() {
            return Ok(page_num);
        }

        let parent = node.parent();
        node = tree.load_node(parent)?;
        if !matches!(node, Node::Internal(_)) {
            return Err(AtlasError::corrupt(
                parent,
                format!("parent of page {} is not an internal node", page_num),
            ));
        }
        page_num = parent;
    }

    Err(AtlasError::corrupt(
        page_num,
        "parent chain from page 0 never reaches a root",
    ))
}
