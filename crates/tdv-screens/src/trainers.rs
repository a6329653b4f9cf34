//! Trainer observations.
//!
//! Recording an observation derives the trainer's compliance status from the
//! rating and the observer's notes, then updates the trainer record in place.

use std::fmt;

use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::info;

use tdv_core::TableView;
use tdv_model::{Notice, RecordId};

use crate::error::{Result, ScreenError};

/// Notes mentioning any of these always escalate to action required.
pub const URGENT_KEYWORDS: [&str; 4] = ["safeguarding", "violation", "emergency", "immediate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainerStatus {
    Exemplary,
    Compliant,
    NeedsImprovement,
    ActionRequired,
}

impl TrainerStatus {
    pub fn from_observation(rating: f64, notes: &str) -> Self {
        let notes = notes.to_lowercase();
        if URGENT_KEYWORDS.iter().any(|keyword| notes.contains(keyword)) {
            return Self::ActionRequired;
        }
        if rating >= 4.5 {
            Self::Exemplary
        } else if rating >= 3.5 {
            Self::Compliant
        } else if rating >= 2.5 {
            Self::NeedsImprovement
        } else {
            Self::ActionRequired
        }
    }

    /// Value stored in the record's `status` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exemplary => "exemplary",
            Self::Compliant => "compliant",
            Self::NeedsImprovement => "needs_improvement",
            Self::ActionRequired => "action_required",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Exemplary => "Exemplary",
            Self::Compliant => "Compliant",
            Self::NeedsImprovement => "Needs Improvement",
            Self::ActionRequired => "Action Required",
        }
    }

    /// What the status triggers downstream.
    pub fn consequence(self) -> &'static str {
        match self {
            Self::Exemplary => "Trainer will be flagged as top performer",
            Self::Compliant => "No action needed - meets all standards",
            Self::NeedsImprovement => "Will trigger improvement plan",
            Self::ActionRequired => "Immediate supervisor notification",
        }
    }
}

impl fmt::Display for TrainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rating scaled to 0..=100.
pub fn compliance_score(rating: f64) -> i64 {
    (rating * 20.0).round().clamp(0.0, 100.0) as i64
}

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub rating: f64,
    pub notes: String,
    pub observer: String,
}

impl Observation {
    pub fn new(date: NaiveDate, rating: f64, notes: impl Into<String>, observer: impl Into<String>) -> Self {
        Self {
            date,
            rating,
            notes: notes.into(),
            observer: observer.into(),
        }
    }

    pub fn status(&self) -> TrainerStatus {
        TrainerStatus::from_observation(self.rating, &self.notes)
    }

    fn to_value(&self) -> Value {
        json!({
            "date": self.date.to_string(),
            "rating": rating_value(self.rating),
            "notes": self.notes,
            "observer": self.observer,
        })
    }
}

// Whole ratings are stored as integers, matching the bundled data.
fn rating_value(rating: f64) -> Value {
    if rating.fract() == 0.0 {
        Value::from(rating as i64)
    } else {
        Value::from(rating)
    }
}

/// Append an observation to a trainer and refresh its status, last
/// observation date and compliance score.
pub fn record_observation(
    view: &mut TableView,
    id: &RecordId,
    observation: &Observation,
) -> Result<(TrainerStatus, Notice)> {
    if !(1.0..=5.0).contains(&observation.rating) {
        return Err(ScreenError::RatingOutOfRange(observation.rating));
    }
    let status = observation.status();
    let entry = observation.to_value();
    let date = observation.date.to_string();
    let score = compliance_score(observation.rating);

    view.modify(id, |trainer| {
        trainer.insert("status", status.as_str());
        match trainer.get_mut("observations") {
            Some(Value::Array(history)) => history.push(entry),
            _ => {
                trainer.insert("observations", Value::Array(vec![entry]));
            }
        }
        trainer.insert("lastObservation", date);
        trainer.insert("complianceScore", score);
    })?;

    info!(%id, status = status.as_str(), score, "observation recorded");
    let notice = Notice::success(format!("Feedback submitted! Status updated to: {}", status.label()));
    Ok((status, notice))
}
