//! Error types for screen presets.

use thiserror::Error;

use tdv_core::ViewError;
use tdv_model::ModelError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScreenError {
    /// No preset with this name.
    #[error("unknown screen '{name}' (expected one of: {expected})")]
    UnknownScreen { name: String, expected: String },

    /// Bundled or user-supplied sample data is not a JSON array of objects.
    #[error("invalid sample data for {screen}: {source}")]
    SampleData {
        screen: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    View(#[from] ViewError),

    /// Observation ratings run from 1 to 5.
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(f64),
}

pub type Result<T> = std::result::Result<T, ScreenError>;
