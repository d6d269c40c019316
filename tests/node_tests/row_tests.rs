//! Tests for Row
//!
//! These tests verify:
//! - Field width limits
//! - Zero padding and text extraction
//! - The 128-byte encoding
//! - Display format

use atlasdb::row::{Row, EMAIL_SIZE, NAME_SIZE, ROW_SIZE};
use atlasdb::AtlasError;

#[test]
fn test_row_size() {
    assert_eq!(ROW_SIZE, 128);
}

#[test]
fn test_new_row_fields() {
    let row = Row::new(7, "alice", "alice@example.com").unwrap();

    assert_eq!(row.id(), 7);
    assert_eq!(row.name(), "alice");
    assert_eq!(row.email(), "alice@example.com");
    assert!(row.name_bytes()[5..].iter().all(|&b| b == 0));
}

#[test]
fn test_full_width_fields_accepted() {
    let name = "n".repeat(NAME_SIZE);
    let email = "e".repeat(EMAIL_SIZE);

    let row = Row::new(1, &name, &email).unwrap();

    assert_eq!(row.name(), name);
    assert_eq!(row.email(), email);
}

#[test]
fn test_name_too_long() {
    let name = "n".repeat(NAME_SIZE + 1);

    let result = Row::new(1, &name, "a@b.c");

    assert!(matches!(
        result,
        Err(AtlasError::FieldTooLong {
            field: "name",
            len: 57,
            max: 56
        })
    ));
}

#[test]
fn test_email_too_long() {
    let email = "e".repeat(EMAIL_SIZE + 1);

    let result = Row::new(1, "bob", &email);

    assert!(matches!(
        result,
        Err(AtlasError::FieldTooLong { field: "email", .. })
    ));
}

#[test]
fn test_key_out_of_range() {
    let row = Row::new(u64::from(u32::MAX) + 1, "big", "big@example.com").unwrap();

    assert!(matches!(row.key(), Err(AtlasError::KeyOutOfRange(_))));
    assert_eq!(
        Row::new(u64::from(u32::MAX), "max", "m").unwrap().key().unwrap(),
        u32::MAX
    );
}

#[test]
fn test_encoding_layout() {
    let row = Row::new(0x0102030405060708, "ab", "cd").unwrap();
    let mut buf = Vec::new();

    row.encode(&mut buf);

    assert_eq!(buf.len(), ROW_SIZE);
    // id is little-endian
    assert_eq!(&buf[..8], &[8, 7, 6, 5, 4, 3, 2, 1]);
    assert_eq!(&buf[8..10], b"ab");
    assert_eq!(&buf[8 + NAME_SIZE..8 + NAME_SIZE + 2], b"cd");

    let decoded = Row::decode(&mut &buf[..]);
    assert_eq!(decoded, row);
}

#[test]
fn test_display() {
    let row = Row::new(3, "carol", "carol@example.com").unwrap();

    assert_eq!(row.to_string(), "(3, carol, carol@example.com)");
}
