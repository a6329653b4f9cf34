//! Embedded sample data.
//!
//! Every screen ships a JSON array of records, embedded at compile time with
//! `include_str!()` so the CLI works without any input files.

// =============================================================================
// Administration
// =============================================================================

/// User Management sample accounts.
pub const USERS: &str = include_str!("../data/users.json");

// =============================================================================
// IQA management
// =============================================================================

/// Feedback raised against trainers and courses.
pub const FEEDBACK: &str = include_str!("../data/feedback.json");

/// Trainers with their observation history.
pub const TRAINERS: &str = include_str!("../data/trainers.json");

/// Sampled assessments with nested learner results.
pub const ASSESSMENTS: &str = include_str!("../data/assessments.json");

// =============================================================================
// Quality assurance
// =============================================================================

/// Audit trail entries; `user` is a nested object.
pub const AUDIT: &str = include_str!("../data/audit.json");

pub const STANDARDS: &str = include_str!("../data/standards.json");

// =============================================================================
// EQA management
// =============================================================================

pub const EVIDENCE: &str = include_str!("../data/evidence.json");
