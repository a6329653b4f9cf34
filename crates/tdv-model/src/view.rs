//! Declarative per-screen configuration.
//!
//! A [`ViewConfig`] tells the shared predicate, paginator and exporter which
//! fields are searchable, which are exact-match filterable, which one holds
//! the record date, and how exports are labelled.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::filter::{FilterState, Selection};
use crate::page::PageState;
use crate::record::Record;

/// A field offered as an exact-match filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterField {
    pub field: String,
    /// Allowed selections besides `all`. Empty means any value is accepted.
    #[serde(default)]
    pub choices: Vec<String>,
}

impl FilterField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.choices.is_empty() || self.choices.iter().any(|choice| choice == value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub name: String,
    #[serde(default)]
    pub search_fields: Vec<String>,
    #[serde(default)]
    pub filter_fields: Vec<FilterField>,
    #[serde(default)]
    pub date_field: Option<String>,
    pub page_size: usize,
    pub export_label: String,
    /// Append `-YYYY-MM-DD` to export filenames.
    #[serde(default)]
    pub date_suffix: bool,
    /// Fields a submission form must fill in.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Values a submission gets for fields it leaves absent or null.
    #[serde(default)]
    pub submit_defaults: Record,
    /// Set to the submission day on every new record.
    #[serde(default)]
    pub created_stamp: Option<String>,
    /// Set to the edit day on every form edit.
    #[serde(default)]
    pub updated_stamp: Option<String>,
}

impl ViewConfig {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            export_label: name.clone(),
            name,
            search_fields: Vec::new(),
            filter_fields: Vec::new(),
            date_field: None,
            page_size: PageState::DEFAULT_PAGE_SIZE,
            date_suffix: false,
            required_fields: Vec::new(),
            submit_defaults: Record::new(),
            created_stamp: None,
            updated_stamp: None,
        }
    }

    #[must_use]
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_filter_field(mut self, field: FilterField) -> Self {
        self.filter_fields.push(field);
        self
    }

    #[must_use]
    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_export_label(mut self, label: impl Into<String>) -> Self {
        self.export_label = label.into();
        self
    }

    #[must_use]
    pub fn with_date_suffix(mut self, enabled: bool) -> Self {
        self.date_suffix = enabled;
        self
    }

    #[must_use]
    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_submit_default(
        mut self,
        field: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.submit_defaults.insert(field, value);
        self
    }

    #[must_use]
    pub fn with_created_stamp(mut self, field: impl Into<String>) -> Self {
        self.created_stamp = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_updated_stamp(mut self, field: impl Into<String>) -> Self {
        self.updated_stamp = Some(field.into());
        self
    }

    pub fn filter_field(&self, field: &str) -> Option<&FilterField> {
        self.filter_fields.iter().find(|candidate| candidate.field == field)
    }

    /// Default filter state: empty search, every filter field set to `all`.
    pub fn initial_filter(&self) -> FilterState {
        self.filter_fields
            .iter()
            .fold(FilterState::new(), |state, field| {
                state.with_filter(field.field.clone(), Selection::All)
            })
    }

    pub fn initial_page(&self) -> Result<PageState> {
        PageState::new(self.page_size)
    }

    /// Check that every field filter targets a declared filter field with an
    /// accepted value.
    pub fn validate_filter(&self, state: &FilterState) -> Result<()> {
        for (field, selection) in &state.field_filters {
            let Some(declared) = self.filter_field(field) else {
                return Err(ModelError::UnknownFilterField {
                    view: self.name.clone(),
                    field: field.clone(),
                });
            };
            if let Some(value) = selection.value()
                && !declared.accepts(value)
            {
                return Err(ModelError::InvalidChoice {
                    field: field.clone(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}
