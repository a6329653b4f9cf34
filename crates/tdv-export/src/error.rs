//! Export error types.
//!
//! Every export failure is returned as a structured error with a
//! user-facing message; the exporter turns it into an error notice.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a chart bitmap.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The chart's source no longer exists.
    #[error("chart '{chart}' is not attached to any source")]
    Detached { chart: String },

    #[error("chart '{chart}' has zero width or height")]
    ZeroSize { chart: String },

    #[error("chart '{chart}' is not a readable PNG")]
    Decode {
        chart: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read chart '{chart}' from {path}")]
    Io {
        chart: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to store a finished artifact.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to {operation}: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact filename: {0:?}")]
    InvalidFilename(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    /// Another export on the same exporter has not finished yet.
    #[error("an export is already in progress")]
    Busy,

    #[error("nothing to export for {label}")]
    Empty { label: String },

    #[error("failed to write CSV")]
    Csv(#[from] csv::Error),

    #[error("failed to render PDF: {reason}")]
    Pdf { reason: String },

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ExportError {
    pub(crate) fn pdf(error: impl std::fmt::Display) -> Self {
        Self::Pdf {
            reason: error.to_string(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Busy => "Please wait for the current export to finish.".to_string(),
            Self::Empty { .. } => "There are no records to export. Adjust the filters and try again.".to_string(),
            Self::Csv(_) => "An error occurred while writing the CSV data.".to_string(),
            Self::Pdf { .. } => "An error occurred while building the PDF document.".to_string(),
            Self::Capture(error) => format!("A chart could not be captured: {error}"),
            Self::Sink(SinkError::AtomicWriteFailed { target_path, .. }) => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::Sink(SinkError::Io { operation, path, .. }) => {
                format!("Could not {} at {}", operation, path.display())
            }
            Self::Sink(SinkError::InvalidFilename(name)) => {
                format!("'{name}' cannot be used as a file name.")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
