//! Quality assurance dashboard screens built on the shared table view.

pub mod embedded;
pub mod error;
pub mod screen;
pub mod trainers;

pub use error::{Result, ScreenError};
pub use screen::Screen;
pub use trainers::{Observation, TrainerStatus, compliance_score, record_observation};
