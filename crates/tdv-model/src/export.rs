//! Export job description.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::record::Record;

pub const CSV_MIME: &str = "text/csv;charset=utf-8";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME,
            Self::Pdf => PDF_MIME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Pdf => "PDF",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            other => Err(ModelError::UnknownFormat(other.to_string())),
        }
    }
}

/// An extra titled table rendered after the main records in a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBlock {
    pub title: String,
    pub records: Vec<Record>,
}

impl DataBlock {
    pub fn new(title: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            title: title.into(),
            records,
        }
    }
}

/// Snapshot of the filtered records plus everything needed to name and
/// title the artifact. Built, consumed and dropped within one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub format: ExportFormat,
    pub label: String,
    pub title: String,
    pub records: Vec<Record>,
    /// Only PDF exports render these; CSV carries the main records alone.
    pub blocks: Vec<DataBlock>,
    pub requested_at: NaiveDateTime,
    pub date_suffix: bool,
}

impl ExportJob {
    pub fn new(
        format: ExportFormat,
        label: impl Into<String>,
        records: Vec<Record>,
        requested_at: NaiveDateTime,
    ) -> Self {
        let label = label.into();
        Self {
            format,
            title: label.clone(),
            label,
            records,
            blocks: Vec::new(),
            requested_at,
            date_suffix: false,
        }
    }

    #[must_use]
    pub fn with_block(mut self, block: DataBlock) -> Self {
        self.blocks.push(block);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_date_suffix(mut self, enabled: bool) -> Self {
        self.date_suffix = enabled;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.requested_at.date()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
