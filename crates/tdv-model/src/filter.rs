//! Filter state for one table view.
//!
//! A [`FilterState`] is a plain value: it is replaced as a whole on every
//! user input (the builder methods take and return it by value) and compared
//! by equality to decide whether the page index must be reset.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel selection that disables a field filter.
pub const ALL: &str = "all";

/// Selected value of one field filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Exact(String),
}

impl Selection {
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Exact(value) => Some(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Exact(value)
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => ALL.to_string(),
            Selection::Exact(value) => value,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value().unwrap_or(ALL))
    }
}

/// Search term, exact-match field filters and an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub search_term: String,
    pub field_filters: BTreeMap<String, Selection>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, selection: impl Into<Selection>) -> Self {
        self.field_filters.insert(field.into(), selection.into());
        self
    }

    #[must_use]
    pub fn with_date_from(mut self, date: Option<NaiveDate>) -> Self {
        self.date_from = date;
        self
    }

    #[must_use]
    pub fn with_date_to(mut self, date: Option<NaiveDate>) -> Self {
        self.date_to = date;
        self
    }

    #[must_use]
    pub fn with_date_range(self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.with_date_from(from).with_date_to(to)
    }

    /// Filters whose selection is not [`ALL`].
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.field_filters
            .iter()
            .filter_map(|(field, selection)| selection.value().map(|value| (field.as_str(), value)))
    }

    pub fn has_date_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// True when nothing narrows the record set.
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.is_empty() && self.active_filters().next().is_none() && !self.has_date_range()
    }
}
