//! Page buffer
//!
//! The unit of disk I/O and caching.

/// Zero-based page number within the database file
pub type PageNum = u32;

/// Size of every page, in bytes
pub const PAGE_SIZE: usize = 4096;

/// A single page-sized byte buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    data: Box<[u8; PAGE_SIZE]>,
}

impl Page {
    /// Create a page filled with zeroes
    pub fn zeroed() -> Self {
        Self {
            data: Box::new([0u8; PAGE_SIZE]),
        }
    }

    /// Raw page bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }

    /// Raw page bytes, writable
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only the header is worth printing; the body is mostly cells.
        f.debug_struct("Page")
            .field("header", &&self.data[..16])
            .finish_non_exhaustive()
    }
}
