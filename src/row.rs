//! Row definitions
//!
//! The fixed row schema stored in leaf cells.
//!
//! ## Encoding (128 bytes)
//! ```text
//! ┌──────────┬────────────────┬─────────────────┐
//! │ id: u64  │ name: [u8; 56] │ email: [u8; 64] │
//! │ (LE, 8)  │                │                 │
//! └──────────┴────────────────┴─────────────────┘
//! ```

use std::borrow::Cow;
use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{AtlasError, Result};

/// Encoded size of the `id` field
pub const ID_SIZE: usize = std::mem::size_of::<u64>();

/// Width of the `name` field
pub const NAME_SIZE: usize = 56;

/// Width of the `email` field
pub const EMAIL_SIZE: usize = 64;

/// Encoded size of a row
pub const ROW_SIZE: usize = ID_SIZE + NAME_SIZE + EMAIL_SIZE;

/// A fixed-width table record
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Row {
    id: u64,
    name: [u8; NAME_SIZE],
    email: [u8; EMAIL_SIZE],
}

impl Row {
    /// Build a row from text fields, zero-padding them to their width
    pub fn new(id: u64, name: &str, email: &str) -> Result<Self> {
        Self::from_bytes(id, name.as_bytes(), email.as_bytes())
    }

    /// Build a row from raw field bytes
    pub fn from_bytes(id: u64, name: &[u8], email: &[u8]) -> Result<Self> {
        Ok(Self {
            id,
            name: pad_field("name", name)?,
            email: pad_field("email", email)?,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The cell key for this row
    ///
    /// Cell keys are 32 bits wide; larger ids are rejected.
    pub fn key(&self) -> Result<u32> {
        u32::try_from(self.id).map_err(|_| AtlasError::KeyOutOfRange(self.id))
    }

    /// Name text, up to the first zero byte
    pub fn name(&self) -> Cow<'_, str> {
        field_text(&self.name)
    }

    /// Email text, up to the first zero byte
    pub fn email(&self) -> Cow<'_, str> {
        field_text(&self.email)
    }

    pub fn name_bytes(&self) -> &[u8; NAME_SIZE] {
        &self.name
    }

    pub fn email_bytes(&self) -> &[u8; EMAIL_SIZE] {
        &self.email
    }

    /// Write the 128-byte encoding
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u64_le(self.id);
        buf.put_slice(&self.name);
        buf.put_slice(&self.email);
    }

    /// Read a row from its 128-byte encoding
    ///
    /// The caller guarantees at least `ROW_SIZE` remaining bytes.
    pub fn decode<B: Buf>(buf: &mut B) -> Self {
        let id = buf.get_u64_le();
        let mut name = [0u8; NAME_SIZE];
        buf.copy_to_slice(&mut name);
        let mut email = [0u8; EMAIL_SIZE];
        buf.copy_to_slice(&mut email);
        Self { id, name, email }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.name(), self.email())
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("email", &self.email())
            .finish()
    }
}

fn pad_field<const N: usize>(field: &'static str, value: &[u8]) -> Result<[u8; N]> {
    if value.len() > N {
        return Err(AtlasError::FieldTooLong {
            field,
            len: value.len(),
            max: N,
        });
    }
    let mut out = [0u8; N];
    out[..value.len()].copy_from_slice(value);
    Ok(out)
}

fn field_text(bytes: &[u8]) -> Cow<'_, str> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end])
}
