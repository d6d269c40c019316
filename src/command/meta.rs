//! Meta-commands
//!
//! Shell directives starting with `.`; they never touch rows.

use std::fmt::Write;

use crate::error::{AtlasError, Result};
use crate::node::{
    COMMON_NODE_HEADER_SIZE, INTERNAL_NODE_CELL_SIZE, INTERNAL_NODE_HEADER_SIZE,
    INTERNAL_NODE_MAX_KEYS, LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS,
};
use crate::row::ROW_SIZE;
use crate::storage::PAGE_SIZE;

/// A parsed meta-command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    /// Close the table and leave the shell
    Exit,

    /// Print the tree structure
    Btree,

    /// Print the on-disk layout constants
    Constants,
}

impl MetaCommand {
    pub fn parse(line: &str) -> Result<Self> {
        match line.trim() {
            ".exit" => Ok(MetaCommand::Exit),
            ".btree" => Ok(MetaCommand::Btree),
            ".constants" => Ok(MetaCommand::Constants),
            other => Err(AtlasError::Syntax(format!(
                "unrecognized command '{}'",
                other
            ))),
        }
    }
}

/// Layout constants, one `NAME: value` per line
pub fn constants_report() -> String {
    let constants = [
        ("PAGE_SIZE", PAGE_SIZE),
        ("ROW_SIZE", ROW_SIZE),
        ("COMMON_NODE_HEADER_SIZE", COMMON_NODE_HEADER_SIZE),
        ("LEAF_NODE_HEADER_SIZE", LEAF_NODE_HEADER_SIZE),
        ("LEAF_NODE_CELL_SIZE", LEAF_NODE_CELL_SIZE),
        ("LEAF_NODE_MAX_CELLS", LEAF_NODE_MAX_CELLS),
        ("INTERNAL_NODE_HEADER_SIZE", INTERNAL_NODE_HEADER_SIZE),
        ("INTERNAL_NODE_CELL_SIZE", INTERNAL_NODE_CELL_SIZE),
        ("INTERNAL_NODE_MAX_KEYS", INTERNAL_NODE_MAX_KEYS),
    ];

    let mut out = String::new();
    for (name, value) in constants {
        let _ = writeln!(out, "{}: {}", name, value);
    }
    out
}
