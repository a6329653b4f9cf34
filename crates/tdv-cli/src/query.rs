//! Filter and page selection given on the command line.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use tdv_core::TableView;
use tdv_model::FilterState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub filters: Vec<(String, String)>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// One-based page number.
    pub page: usize,
    pub page_size: Option<usize>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: Vec::new(),
            from: None,
            to: None,
            page: 1,
            page_size: None,
        }
    }
}

impl Query {
    /// Filter state starting from the view's initial one, so fields not
    /// named on the command line stay at "all".
    pub fn filter_state(&self, view: &TableView) -> FilterState {
        self.filters
            .iter()
            .fold(
                view.config().initial_filter().with_search(self.search.trim()),
                |state, (field, value)| state.with_filter(field.as_str(), value.as_str()),
            )
            .with_date_range(self.from, self.to)
    }

    pub fn apply(&self, view: &mut TableView) -> Result<()> {
        let state = self.filter_state(view);
        view.set_filter(state)
            .with_context(|| format!("invalid filter for {}", view.config().name))?;
        if let Some(page_size) = self.page_size {
            view.set_page_size(page_size).context("invalid page size")?;
        }
        view.set_page_index(self.page.saturating_sub(1));
        debug!(
            view = %view.config().name,
            matches = view.filtered_count(),
            page = self.page,
            "query applied"
        );
        Ok(())
    }
}
