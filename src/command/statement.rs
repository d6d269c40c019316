//! Statements
//!
//! `insert <id> <name> <email>` and `select`.

use std::fmt;
use std::str::FromStr;

use crate::error::{AtlasError, Result};
use crate::row::Row;

/// Statement types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Insert,
    Select,
}

/// A parsed statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Insert one row
    Insert(Row),

    /// Every row in id order
    Select,
}

impl Statement {
    /// Parse one statement line
    ///
    /// Keywords are case-insensitive. `insert` takes exactly three
    /// arguments; the id must fit in a `u32` and the text fields must fit
    /// their columns. Anything after `select` is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = tokens.first() else {
            return Err(AtlasError::Syntax("empty statement".to_string()));
        };

        if keyword.eq_ignore_ascii_case("insert") {
            let [_, id, name, email] = tokens[..] else {
                return Err(AtlasError::Syntax(
                    "expected: insert <id> <name> <email>".to_string(),
                ));
            };
            let id: u32 = id
                .parse()
                .map_err(|_| AtlasError::Syntax(format!("invalid id '{}'", id)))?;
            Ok(Statement::Insert(Row::new(u64::from(id), name, email)?))
        } else if keyword.eq_ignore_ascii_case("select") {
            Ok(Statement::Select)
        } else {
            Err(AtlasError::Syntax(format!(
                "unrecognized statement '{}'",
                keyword
            )))
        }
    }

    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Select => StatementKind::Select,
        }
    }
}

impl FromStr for Statement {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Insert(row) => {
                write!(f, "insert {} {} {}", row.id(), row.name(), row.email())
            }
            Statement::Select => f.write_str("select"),
        }
    }
}
