//! Page windowing over an already-filtered sequence.

use tdv_model::PageState;

/// Rows `[offset, offset + size)` clipped to the input. Out-of-range
/// indices yield an empty slice. Input order is preserved.
pub fn paginate<T>(items: &[T], page: PageState) -> &[T] {
    let start = page.offset();
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page.page_size()).min(items.len());
    &items[start..end]
}

/// What a rendered page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// The filtered set is empty; render a "no results" message.
    NoResults,
    /// The index points past the last page of a non-empty set.
    OutOfRange,
    Rows,
}

/// A materialized page plus the totals needed to render pagination controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub state: PageState,
    pub total: usize,
}

impl<T: Clone> Page<T> {
    pub fn build(items: &[T], state: PageState) -> Self {
        Self {
            rows: paginate(items, state).to_vec(),
            state,
            total: items.len(),
        }
    }
}

impl<T> Page<T> {
    pub fn status(&self) -> PageStatus {
        if self.total == 0 {
            PageStatus::NoResults
        } else if self.rows.is_empty() {
            PageStatus::OutOfRange
        } else {
            PageStatus::Rows
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.state.page_count(self.total)
    }

    /// One-based, inclusive row range shown on this page (`None` when empty).
    pub fn row_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }
        let first = self.state.offset() + 1;
        Some((first, first + self.rows.len() - 1))
    }
}
