//! Page window over a filtered record sequence.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Zero-based page index plus a non-zero page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    page_index: usize,
    page_size: NonZeroUsize,
}

impl PageState {
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// First page of the given size.
    pub fn new(page_size: usize) -> Result<Self> {
        let page_size = NonZeroUsize::new(page_size).ok_or(ModelError::ZeroPageSize)?;
        Ok(Self {
            page_index: 0,
            page_size,
        })
    }

    #[must_use]
    pub fn with_page_index(self, page_index: usize) -> Self {
        Self { page_index, ..self }
    }

    #[must_use]
    pub fn first(self) -> Self {
        self.with_page_index(0)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Index of the first row on this page; saturates instead of overflowing.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size.get())
    }

    /// Number of pages needed for `total` rows (zero when there are none).
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.get())
    }

    /// Largest index that still shows rows, or 0 for an empty set.
    pub fn last_index(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    /// Clamp the index into the valid range for `total` rows.
    #[must_use]
    pub fn clamp(self, total: usize) -> Self {
        let last = self.last_index(total);
        self.with_page_index(self.page_index.min(last))
    }

    /// Change the page size and clamp the index against `total` rows.
    pub fn resize(self, page_size: usize, total: usize) -> Result<Self> {
        let resized = Self::new(page_size)?.with_page_index(self.page_index);
        Ok(resized.clamp(total))
    }

    pub fn is_in_range(&self, total: usize) -> bool {
        self.offset() < total
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: NonZeroUsize::new(Self::DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}
