//! Pager
//!
//! Bounded page cache between the B+tree and the database file.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{AtlasError, Result};

use super::{Page, PageNum, PAGE_SIZE};

/// A cached page plus its last access tick (for LRU eviction)
#[derive(Default)]
struct CachedPage {
    page: Page,
    last_used: u64,
}

/// Mediates every page access for one database file
///
/// ## Page numbers
/// - `num_pages`: allocation counter, one past the highest page handed out
/// - `file_pages`: pages physically present in the file
///
/// A page below `file_pages` is read from disk on a cache miss; anything
/// above is brand new and starts zeroed.
pub struct Pager {
    /// Database file handle
    file: File,

    /// Path the file was opened from
    path: PathBuf,

    /// Cached pages keyed by page number
    cache: HashMap<PageNum, CachedPage>,

    /// Maximum pages held in `cache`
    cache_capacity: usize,

    /// Next unused page number
    num_pages: u32,

    /// Pages currently backed by the file
    file_pages: u32,

    /// Hard page budget for the file
    max_pages: u32,

    /// Monotonic access counter
    clock: u64,
}

impl Pager {
    /// Open or create the database file
    ///
    /// Fails with `CorruptFile` if the file length is not a whole number
    /// of pages or exceeds the page budget.
    pub fn open(path: &Path, max_pages: u32, cache_capacity: usize) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let file_len = file.metadata()?.len();
        if file_len % PAGE_SIZE as u64 != 0 {
            return Err(AtlasError::CorruptFile(format!(
                "file length {} is not a multiple of the page size {}",
                file_len, PAGE_SIZE
            )));
        }

        let file_pages = file_len / PAGE_SIZE as u64;
        if file_pages > max_pages as u64 {
            return Err(AtlasError::CorruptFile(format!(
                "file holds {} pages, more than the maximum of {}",
                file_pages, max_pages
            )));
        }
        let file_pages = file_pages as u32;

        tracing::debug!(
            "Opened {} ({} pages on disk, cache capacity {})",
            path.display(),
            file_pages,
            cache_capacity
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            cache: HashMap::new(),
            cache_capacity: cache_capacity.max(1),
            num_pages: file_pages,
            file_pages,
            max_pages,
            clock: 0,
        })
    }

    /// Get a page, loading or creating it on a cache miss
    ///
    /// - Cached: returned as is
    /// - Within the file: read from disk
    /// - Past the end of the file: zeroed, and the allocation counter
    ///   is extended to cover it
    pub fn get_page(&mut self, page_num: PageNum) -> Result<&mut Page> {
        if page_num >= self.max_pages {
            return Err(AtlasError::PageOutOfRange {
                page: page_num,
                max: self.max_pages,
            });
        }

        if !self.cache.contains_key(&page_num) {
            self.make_room()?;
            let page = self.read_or_zero(page_num)?;
            self.cache.insert(page_num, CachedPage { page, last_used: 0 });
        }

        self.clock += 1;
        let slot = self.cache.entry(page_num).or_default();
        slot.last_used = self.clock;
        Ok(&mut slot.page)
    }

    /// Hand out the next unused page number
    ///
    /// The page itself is created lazily by the first `get_page` call.
    pub fn allocate_page(&mut self) -> Result<PageNum> {
        if self.num_pages >= self.max_pages {
            return Err(AtlasError::TableFull);
        }
        let page_num = self.num_pages;
        self.num_pages += 1;
        Ok(page_num)
    }

    /// Write a cached page back to the file and evict it
    ///
    /// No-op if the page is not cached. On error the page stays cached.
    pub fn flush_page(&mut self, page_num: PageNum) -> Result<()> {
        let Some(slot) = self.cache.get(&page_num) else {
            return Ok(());
        };

        let offset = page_num as u64 * PAGE_SIZE as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(slot.page.as_bytes())?;

        tracing::trace!("Flushed page {} to {}", page_num, self.path.display());

        self.cache.remove(&page_num);
        self.file_pages = self.file_pages.max(page_num + 1);
        Ok(())
    }

    /// Flush every cached page, lowest page number first
    pub fn flush_all(&mut self) -> Result<()> {
        let mut pages: Vec<PageNum> = self.cache.keys().copied().collect();
        pages.sort_unstable();
        for page_num in pages {
            self.flush_page(page_num)?;
        }
        Ok(())
    }

    /// Flush everything, sync the file and release the handle
    pub fn close(mut self) -> Result<()> {
        self.flush_all()?;
        self.file.sync_all()?;
        tracing::debug!("Closed {} ({} pages)", self.path.display(), self.num_pages);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// One past the highest page number in use
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Page budget for this file
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Number of pages currently cached
    pub fn cached_pages(&self) -> usize {
        self.cache.len()
    }

    /// Whether a page is currently cached
    pub fn is_cached(&self, page_num: PageNum) -> bool {
        self.cache.contains_key(&page_num)
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Evict least recently used pages until a new one fits
    fn make_room(&mut self) -> Result<()> {
        while self.cache.len() >= self.cache_capacity {
            let victim = self
                .cache
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(&page_num, _)| page_num);

            match victim {
                Some(page_num) => {
                    tracing::debug!("Evicting page {} from cache", page_num);
                    self.flush_page(page_num)?;
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Read a page from disk, or start a fresh one past end-of-file
    fn read_or_zero(&mut self, page_num: PageNum) -> Result<Page> {
        let mut page = Page::zeroed();

        if page_num < self.file_pages {
            let offset = page_num as u64 * PAGE_SIZE as u64;
            self.file.seek(SeekFrom::Start(offset))?;
            self.file.read_exact(page.as_bytes_mut())?;
            tracing::trace!("Read page {} from {}", page_num, self.path.display());
        }

        self.num_pages = self.num_pages.max(page_num + 1);
        Ok(page)
    }
}

impl Drop for Pager {
    fn drop(&mut self) {
        if self.cache.is_empty() {
            return;
        }
        if let Err(e) = self.flush_all() {
            tracing::warn!(
                "Failed to flush {} cached pages of {}: {}",
                self.cache.len(),
                self.path.display(),
                e
            );
        }
    }
}
