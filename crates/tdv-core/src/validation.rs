//! Submission form validation.
//!
//! Forms check required fields and constrained choices before a record is
//! handed to the store. Errors are keyed by field so each input can show
//! its own message.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use tdv_model::{Record, ViewConfig};

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.errors.len())?;
        for (field, message) in &self.errors {
            write!(f, "; {field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Rules applied to a submitted record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionRules {
    pub required: Vec<String>,
    pub choices: BTreeMap<String, Vec<String>>,
}

impl SubmissionRules {
    /// Required fields plus the constrained filter fields of a view.
    pub fn from_config(config: &ViewConfig) -> Self {
        let choices = config
            .filter_fields
            .iter()
            .filter(|field| !field.choices.is_empty())
            .map(|field| (field.field.clone(), field.choices.clone()))
            .collect();
        Self {
            required: config.required_fields.clone(),
            choices,
        }
    }

    #[must_use]
    pub fn with_choices<I, S>(mut self, field: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices
            .insert(field.into(), choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self, record: &Record) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in &self.required {
            if is_blank(record.get(field)) {
                errors.add(field.clone(), "is required");
            }
        }
        for (field, allowed) in &self.choices {
            // Absent optional fields are fine; required ones were flagged above.
            let Some(value) = record.text(field) else {
                continue;
            };
            if !allowed.iter().any(|choice| choice == value.as_ref()) {
                errors.add(field.clone(), format!("must be one of: {}", allowed.join(", ")));
            }
        }
        errors.into_result()
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}
