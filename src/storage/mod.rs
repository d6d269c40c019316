//! Storage Module
//!
//! Fixed-size pages backed by a single file, cached by the pager.
//!
//! ## Responsibilities
//! - Address the file as consecutive 4096-byte pages
//! - Cache pages in memory (bounded, least-recently-used eviction)
//! - Hand out new page numbers (monotonic, never reused)
//! - Write pages back on flush, eviction and close
//!
//! ## File Format
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────┐
//! │ Page 0       │ Page 1       │ Page 2       │ ... │
//! │ (4096 bytes) │ (4096 bytes) │ (4096 bytes) │     │
//! └──────────────┴──────────────┴──────────────┴─────┘
//!   offset = page_num * PAGE_SIZE
//! ```
//!
//! The file length is always a multiple of `PAGE_SIZE`. Page 0 is the
//! first root leaf and stays the leftmost leaf of the tree forever.

mod page;
mod pager;

pub use page::{Page, PageNum, PAGE_SIZE};
pub use pager::Pager;
