//! Engine Module
//!
//! Thread-safe handle around one table.
//!
//! ## Responsibilities
//! - Open the table from a `Config`
//! - Serialize every table operation behind one lock
//! - Route parsed statements to the table
//! - Close the table (flush + sync) on shutdown

use std::path::Path;

use parking_lot::Mutex;

use crate::btree::TreeStats;
use crate::command::Statement;
use crate::config::Config;
use crate::error::Result;
use crate::row::Row;
use crate::storage::PageNum;
use crate::table::Table;

/// The main database handle
///
/// ## Concurrency Model: one lock for everything
///
/// Inserts rewrite several pages per split, and even a scan mutates the
/// pager (cache fills and evictions), so reads and writes alike take the
/// table lock for their whole duration. Scans collect their rows under the
/// lock and hand back an owned `Vec`.
pub struct Engine {
    /// The only table, guarded by the engine lock
    table: Mutex<Table>,
}

impl Engine {
    /// Open or create the table described by `config`
    pub fn open(config: Config) -> Result<Self> {
        let table = Table::open(config)?;
        Ok(Self {
            table: Mutex::new(table),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses the default config with the specified database file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// Execute a statement
    ///
    /// `select` returns its rows; `insert` returns `None`.
    pub fn execute(&self, statement: Statement) -> Result<Option<Vec<Row>>> {
        match statement {
            Statement::Insert(row) => {
                self.insert(row)?;
                Ok(None)
            }
            Statement::Select => self.scan().map(Some),
        }
    }

    /// Insert a row keyed by its id
    pub fn insert(&self, row: Row) -> Result<()> {
        let mut table = self.table.lock();
        table.insert(row)?;
        tracing::trace!("Inserted row {}", row.id());
        Ok(())
    }

    /// Every row in id order
    pub fn scan(&self) -> Result<Vec<Row>> {
        self.table.lock().select_all()
    }

    /// Rows with id >= `start`, in id order, at most `limit` of them
    pub fn scan_from(&self, start: u32, limit: usize) -> Result<Vec<Row>> {
        let mut table = self.table.lock();
        let rows = table.find(start)?.take(limit).collect();
        rows
    }

    /// Check every structural invariant of the tree
    pub fn verify(&self) -> Result<TreeStats> {
        self.table.lock().verify()
    }

    /// Indented dump of the tree
    pub fn describe(&self) -> Result<String> {
        self.table.lock().describe()
    }

    /// Close the engine gracefully
    ///
    /// Flushes every page and syncs the file
    pub fn close(self) -> Result<()> {
        self.table.into_inner().close()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn root_page(&self) -> PageNum {
        self.table.lock().root_page()
    }

    pub fn height(&self) -> Result<usize> {
        self.table.lock().height()
    }

    pub fn num_pages(&self) -> u32 {
        self.table.lock().num_pages()
    }

    /// Get the configuration
    pub fn config(&self) -> Config {
        self.table.lock().config().clone()
    }
}
