//! Tests for Statement parsing
//!
//! These tests verify:
//! - insert with exactly three arguments
//! - id validation (u32 only)
//! - Field width limits surface as FieldTooLong
//! - Case-insensitive keywords
//! - Unknown statements are syntax errors

use atlasdb::command::{Input, Statement, StatementKind};
use atlasdb::AtlasError;

#[test]
fn test_parse_insert() {
    let statement = Statement::parse("insert 1 alice alice@example.com").unwrap();

    let Statement::Insert(row) = statement else {
        panic!("expected an insert");
    };
    assert_eq!(row.id(), 1);
    assert_eq!(row.name(), "alice");
    assert_eq!(row.email(), "alice@example.com");
}

#[test]
fn test_parse_insert_extra_whitespace() {
    let statement: Statement = "  insert   7  bob   bob@example.com ".parse().unwrap();

    assert_eq!(statement.kind(), StatementKind::Insert);
    assert_eq!(statement.to_string(), "insert 7 bob bob@example.com");
}

#[test]
fn test_parse_insert_wrong_arity() {
    for line in ["insert", "insert 1 alice", "insert 1 alice a@b.c extra"] {
        assert!(
            matches!(Statement::parse(line), Err(AtlasError::Syntax(_))),
            "{:?} should be rejected",
            line
        );
    }
}

#[test]
fn test_parse_insert_bad_id() {
    for id in ["-1", "abc", "4294967296", "1.5"] {
        let line = format!("insert {} alice a@b.c", id);
        assert!(
            matches!(Statement::parse(&line), Err(AtlasError::Syntax(_))),
            "{:?} should be rejected",
            id
        );
    }
}

#[test]
fn test_parse_insert_max_id() {
    let Statement::Insert(row) = Statement::parse("insert 4294967295 max m@x").unwrap() else {
        panic!("expected an insert");
    };

    assert_eq!(row.key().unwrap(), u32::MAX);
}

#[test]
fn test_parse_insert_field_too_long() {
    let line = format!("insert 1 {} a@b.c", "n".repeat(57));

    assert!(matches!(
        Statement::parse(&line),
        Err(AtlasError::FieldTooLong { field: "name", .. })
    ));
}

#[test]
fn test_parse_select() {
    assert_eq!(Statement::parse("select").unwrap(), Statement::Select);
    assert_eq!(Statement::parse("SELECT").unwrap(), Statement::Select);
    assert_eq!(Statement::parse("Select").unwrap().kind(), StatementKind::Select);
}

#[test]
fn test_parse_keyword_case_insensitive() {
    assert!(matches!(
        Statement::parse("INSERT 2 carol c@example.com"),
        Ok(Statement::Insert(_))
    ));
}

#[test]
fn test_parse_unknown_statement() {
    assert!(matches!(
        Statement::parse("delete 1"),
        Err(AtlasError::Syntax(_))
    ));
    assert!(matches!(Statement::parse(""), Err(AtlasError::Syntax(_))));
}

#[test]
fn test_input_classification() {
    assert_eq!(Input::parse("   ").unwrap(), Input::Empty);
    assert_eq!(
        Input::parse("select").unwrap(),
        Input::Statement(Statement::Select)
    );
    assert!(matches!(Input::parse(".exit").unwrap(), Input::Meta(_)));
    assert!(matches!(Input::parse(".nope"), Err(AtlasError::Syntax(_))));
}
