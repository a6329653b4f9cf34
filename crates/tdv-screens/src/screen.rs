//! Dashboard screen presets.
//!
//! Each screen used to carry its own copy of the search, filter, paginate and
//! export code. Here a screen is only a [`ViewConfig`] plus sample records;
//! the shared pipeline in `tdv-core` does the rest.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use tdv_core::{SubmissionRules, TableView};
use tdv_model::{FilterField, Record, ViewConfig};

use crate::embedded;
use crate::error::{Result, ScreenError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Users,
    Feedback,
    Trainers,
    Assessments,
    Audit,
    Standards,
    Evidence,
}

impl Screen {
    pub const ALL: [Screen; 7] = [
        Screen::Users,
        Screen::Feedback,
        Screen::Trainers,
        Screen::Assessments,
        Screen::Audit,
        Screen::Standards,
        Screen::Evidence,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Screen::Users => "users",
            Screen::Feedback => "feedback",
            Screen::Trainers => "trainers",
            Screen::Assessments => "assessments",
            Screen::Audit => "audit",
            Screen::Standards => "standards",
            Screen::Evidence => "evidence",
        }
    }

    /// Human label, also used for export filenames and document titles.
    pub fn label(self) -> &'static str {
        match self {
            Screen::Users => "User Management",
            Screen::Feedback => "Feedback Report",
            Screen::Trainers => "Trainer Monitoring",
            Screen::Assessments => "Assessment Sampling",
            Screen::Audit => "Audit Trail",
            Screen::Standards => "Quality Standards",
            Screen::Evidence => "Evidence Submissions",
        }
    }

    pub fn config(self) -> ViewConfig {
        let config = ViewConfig::new(self.name()).with_export_label(self.label());
        match self {
            Screen::Users => config
                .with_search_fields(["name", "email"])
                .with_filter_field(FilterField::new("role").with_choices(["admin", "vendor", "customer"]))
                .with_filter_field(
                    FilterField::new("status").with_choices(["active", "pending", "suspended"]),
                )
                .with_date_field("signupDate")
                .with_page_size(5)
                .with_required_fields(["name", "email", "role", "status"]),
            Screen::Feedback => config
                .with_search_fields(["trainer", "course", "comments"])
                .with_filter_field(
                    FilterField::new("status").with_choices(["Pending", "In Progress", "Resolved"]),
                )
                .with_filter_field(
                    FilterField::new("type").with_choices(["Assessment", "Observation", "Learner Feedback"]),
                )
                .with_date_field("date")
                .with_page_size(5)
                .with_date_suffix(true)
                .with_required_fields(["trainer", "course", "type", "comments"]),
            Screen::Trainers => config
                .with_search_fields(["name"])
                .with_filter_field(FilterField::new("status").with_choices([
                    "exemplary",
                    "compliant",
                    "needs_improvement",
                    "action_required",
                ]))
                .with_date_field("lastObservation")
                .with_page_size(5)
                .with_required_fields(["name"]),
            Screen::Assessments => config
                .with_search_fields(["course", "trainer"])
                .with_filter_field(
                    FilterField::new("status").with_choices(["pending", "in_progress", "completed"]),
                )
                .with_date_field("date")
                .with_page_size(5)
                .with_date_suffix(true)
                .with_required_fields(["course", "trainer"]),
            Screen::Audit => config
                .with_search_fields(["action", "description", "entity", "user.name"])
                .with_filter_field(FilterField::new("entity"))
                .with_filter_field(
                    FilterField::new("status").with_choices(["completed", "pending", "in-progress"]),
                )
                .with_date_field("timestamp")
                .with_page_size(10)
                .with_date_suffix(true)
                .with_required_fields(["action", "entity"]),
            Screen::Standards => config
                .with_search_fields(["name", "description"])
                .with_filter_field(FilterField::new("category"))
                .with_filter_field(
                    FilterField::new("complianceLevel").with_choices(["required", "recommended", "optional"]),
                )
                .with_date_field("lastUpdated")
                .with_page_size(10)
                .with_required_fields(["name", "description", "category"])
                .with_created_stamp("lastUpdated")
                .with_updated_stamp("lastUpdated"),
            Screen::Evidence => config
                .with_search_fields(["name", "description"])
                .with_filter_field(
                    FilterField::new("status").with_choices(["approved", "pending", "rejected"]),
                )
                .with_date_field("date")
                .with_page_size(10)
                .with_required_fields(["name", "description"])
                .with_submit_default("status", "pending")
                .with_submit_default("files", vec!["evidence.pdf"])
                .with_created_stamp("date"),
        }
    }

    pub fn sample_json(self) -> &'static str {
        match self {
            Screen::Users => embedded::USERS,
            Screen::Feedback => embedded::FEEDBACK,
            Screen::Trainers => embedded::TRAINERS,
            Screen::Assessments => embedded::ASSESSMENTS,
            Screen::Audit => embedded::AUDIT,
            Screen::Standards => embedded::STANDARDS,
            Screen::Evidence => embedded::EVIDENCE,
        }
    }

    pub fn sample_records(self) -> Result<Vec<Record>> {
        self.parse_records(self.sample_json())
    }

    /// Parse a JSON array of record objects for this screen.
    pub fn parse_records(self, json: &str) -> Result<Vec<Record>> {
        serde_json::from_str(json).map_err(|source| ScreenError::SampleData {
            screen: self.name(),
            source,
        })
    }

    /// Submission rules: the config's required fields and choices, plus
    /// reference entities where the form offers a fixed list.
    pub fn rules(self) -> Result<SubmissionRules> {
        let rules = SubmissionRules::from_config(&self.config());
        match self {
            Screen::Feedback => {
                let trainers = Screen::Trainers.sample_records()?;
                let names = trainers
                    .iter()
                    .filter_map(|trainer| trainer.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect::<Vec<_>>();
                Ok(rules.with_choices("trainer", names))
            }
            _ => Ok(rules),
        }
    }

    /// A table view over the bundled sample data.
    pub fn sample_view(self) -> Result<TableView> {
        self.view(self.sample_records()?)
    }

    /// A table view over caller-supplied records.
    pub fn view(self, records: Vec<Record>) -> Result<TableView> {
        debug!(screen = self.name(), records = records.len(), "building view");
        let view = TableView::new(self.config(), records)?.with_rules(self.rules()?);
        Ok(view)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Screen {
    type Err = ScreenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Screen::ALL
            .into_iter()
            .find(|screen| screen.name() == wanted)
            .ok_or_else(|| ScreenError::UnknownScreen {
                name: s.to_string(),
                expected: Screen::ALL.map(Screen::name).join(", "),
            })
    }
}
