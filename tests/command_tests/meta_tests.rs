//! Tests for MetaCommand

use atlasdb::command::{constants_report, MetaCommand};
use atlasdb::AtlasError;

#[test]
fn test_parse_meta_commands() {
    assert_eq!(MetaCommand::parse(".exit").unwrap(), MetaCommand::Exit);
    assert_eq!(MetaCommand::parse(".btree").unwrap(), MetaCommand::Btree);
    assert_eq!(
        MetaCommand::parse(" .constants ").unwrap(),
        MetaCommand::Constants
    );
}

#[test]
fn test_unknown_meta_command() {
    let result = MetaCommand::parse(".tables");

    let Err(AtlasError::Syntax(message)) = result else {
        panic!("expected a syntax error");
    };
    assert!(message.contains(".tables"));
}

#[test]
fn test_constants_report() {
    let report = constants_report();

    assert!(report.contains("ROW_SIZE: 128\n"));
    assert!(report.contains("LEAF_NODE_HEADER_SIZE: 14\n"));
    assert!(report.contains("LEAF_NODE_CELL_SIZE: 132\n"));
    assert!(report.contains("LEAF_NODE_MAX_CELLS: 30\n"));
    assert!(report.contains("INTERNAL_NODE_MAX_KEYS: 510\n"));
}
