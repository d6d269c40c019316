//! Command Module
//!
//! Text front end: one line of input becomes either a statement run
//! against the table or a meta-command handled by the shell.
//!
//! ```text
//!   ">>> insert 1 alice alice@example.com"   -> Statement::Insert(row)
//!   ">>> select"                             -> Statement::Select
//!   ">>> .btree"                             -> MetaCommand::Btree
//! ```

mod meta;
mod statement;

pub use meta::{constants_report, MetaCommand};
pub use statement::{Statement, StatementKind};

/// Lines starting with this character are meta-commands
pub const META_PREFIX: char = '.';

/// A classified input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Meta(MetaCommand),
    Statement(Statement),
    /// Blank line
    Empty,
}

impl Input {
    /// Classify and parse one line of input
    pub fn parse(line: &str) -> crate::Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            Ok(Input::Empty)
        } else if line.starts_with(META_PREFIX) {
            MetaCommand::parse(line).map(Input::Meta)
        } else {
            Statement::parse(line).map(Input::Statement)
        }
    }
}
