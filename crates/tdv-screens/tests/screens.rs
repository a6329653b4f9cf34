//! Screen presets against their bundled data.

use chrono::NaiveDate;
use serde_json::json;

use tdv_core::{PageStatus, ViewError};
use tdv_model::{FilterState, Record, RecordId};
use tdv_screens::{Observation, Screen, ScreenError, TrainerStatus, record_observation};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date")
}

#[test]
fn every_screen_loads_its_sample_data() {
    for screen in Screen::ALL {
        let view = screen.sample_view().expect("sample view");
        assert!(!view.store().is_empty(), "{screen} has no sample records");
        assert_eq!(view.config().export_label, screen.label());
        assert_eq!(view.page().status(), PageStatus::Rows);
    }
}

#[test]
fn sample_records_satisfy_their_filter_choices() {
    for screen in Screen::ALL {
        let config = screen.config();
        for record in screen.sample_records().unwrap() {
            for field in &config.filter_fields {
                if let Some(value) = record.text(&field.field) {
                    assert!(field.accepts(&value), "{screen}: {} = {value}", field.field);
                }
            }
        }
    }
}

#[test]
fn screen_names_parse() {
    assert_eq!("Audit".parse::<Screen>().unwrap(), Screen::Audit);
    let err = "reports".parse::<Screen>().unwrap_err();
    assert!(matches!(err, ScreenError::UnknownScreen { .. }));
    insta::assert_snapshot!(
        err.to_string(),
        @"unknown screen 'reports' (expected one of: users, feedback, trainers, assessments, audit, standards, evidence)"
    );
}

#[test]
fn audit_search_reaches_the_nested_user() {
    let mut view = Screen::Audit.sample_view().unwrap();
    view.set_filter(FilterState::new().with_search("compliance manager"))
        .unwrap();
    let ids: Vec<_> = view.filtered().iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec![RecordId::Int(3)]);
}

#[test]
fn user_status_filter_and_signup_range() {
    let mut view = Screen::Users.sample_view().unwrap();
    let state = Screen::Users
        .config()
        .initial_filter()
        .with_filter("status", "active")
        .with_date_range(NaiveDate::from_ymd_opt(2023, 2, 1), NaiveDate::from_ymd_opt(2023, 12, 31));
    view.set_filter(state).unwrap();
    let names: Vec<_> = view
        .filtered()
        .iter()
        .filter_map(|r| r.text("name").map(|name| name.into_owned()))
        .collect();
    assert_eq!(names, vec!["Sarah Williams", "David Wilson"]);
}

#[test]
fn feedback_trainer_must_be_known() {
    let mut view = Screen::Feedback.sample_view().unwrap();
    let submission = Record::new()
        .with("trainer", "Nobody")
        .with("course", "Rust")
        .with("type", "Observation")
        .with("comments", "Great")
        .with("status", "Pending");
    let err = view.submit(submission.clone(), today()).unwrap_err();
    assert!(matches!(err, ViewError::Invalid(ref errors) if errors.get("trainer").is_some()));

    let id = view
        .submit(
            submission.with("trainer", "John Smith").with("date", "2023-06-20"),
            today(),
        )
        .unwrap();
    assert_eq!(id, RecordId::Int(7));
}

#[test]
fn observation_updates_trainer_in_place() {
    let mut view = Screen::Trainers.sample_view().unwrap();
    let date = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
    let observation = Observation::new(date, 4.0, "Well structured session", "Current User");
    let (status, notice) = record_observation(&mut view, &RecordId::Int(2), &observation).unwrap();
    assert_eq!(status, TrainerStatus::Compliant);
    assert_eq!(notice.message, "Feedback submitted! Status updated to: Compliant");

    let trainer = view.store().get(&RecordId::Int(2)).unwrap();
    assert_eq!(trainer.get("status"), Some(&json!("compliant")));
    assert_eq!(trainer.get("lastObservation"), Some(&json!("2023-07-01")));
    assert_eq!(trainer.get("complianceScore"), Some(&json!(80)));
    assert_eq!(
        trainer.get("observations").and_then(|o| o.as_array()).map(Vec::len),
        Some(2)
    );
    assert_eq!(
        trainer.get("observations").and_then(|o| o.get(1)),
        Some(&json!({
            "date": "2023-07-01",
            "rating": 4,
            "notes": "Well structured session",
            "observer": "Current User"
        }))
    );
}

#[test]
fn observation_rating_is_bounded() {
    let mut view = Screen::Trainers.sample_view().unwrap();
    let date = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
    let err = record_observation(&mut view, &RecordId::Int(1), &Observation::new(date, 0.5, "", "QA"))
        .unwrap_err();
    assert!(matches!(err, ScreenError::RatingOutOfRange(_)));
}

#[test]
fn custom_records_use_the_screen_config() {
    let records = Screen::Evidence
        .parse_records(r#"[{"id": "E1", "name": "Policy", "description": "d", "status": "approved", "date": "2024-01-02"}]"#)
        .unwrap();
    let view = Screen::Evidence.view(records).unwrap();
    assert_eq!(view.store().len(), 1);
    assert_eq!(view.config(), &Screen::Evidence.config());

    let err = Screen::Evidence.parse_records(r#"{"id": 1}"#).unwrap_err();
    assert!(matches!(err, ScreenError::SampleData { screen: "evidence", .. }));
}

#[test]
fn new_evidence_is_pending_and_dated_today() {
    let mut view = Screen::Evidence.sample_view().unwrap();
    let id = view
        .submit(
            Record::new()
                .with("name", "New policy")
                .with("description", "Uploaded"),
            today(),
        )
        .unwrap();
    assert_eq!(id, RecordId::Int(5));

    let stored = view.store().get(&id).unwrap();
    assert_eq!(stored.get("status"), Some(&json!("pending")));
    assert_eq!(stored.get("date"), Some(&json!("2024-03-05")));
    assert_eq!(stored.get("files"), Some(&json!(["evidence.pdf"])));

    let pending_today = FilterState::new()
        .with_filter("status", "pending")
        .with_date_range(Some(today()), Some(today()));
    view.set_filter(pending_today).unwrap();
    assert_eq!(view.filtered_count(), 1);
}

#[test]
fn evidence_keeps_submitted_status_and_files() {
    let mut view = Screen::Evidence.sample_view().unwrap();
    let id = view
        .submit(
            Record::new()
                .with("name", "Audit pack")
                .with("description", "Annual")
                .with("status", "approved")
                .with("files", json!(["pack.zip"])),
            today(),
        )
        .unwrap();
    let stored = view.store().get(&id).unwrap();
    assert_eq!(stored.get("status"), Some(&json!("approved")));
    assert_eq!(stored.get("files"), Some(&json!(["pack.zip"])));
}

#[test]
fn standards_are_stamped_on_create_and_edit() {
    let mut view = Screen::Standards.sample_view().unwrap();
    let edited = view
        .update(
            &RecordId::Int(1),
            Record::new().with("description", "Graded against the published rubric"),
            today(),
        )
        .unwrap();
    assert_eq!(edited.get("lastUpdated"), Some(&json!("2024-03-05")));

    let id = view
        .submit(
            Record::new()
                .with("name", "Learner Support")
                .with("description", "Every learner has a named mentor")
                .with("category", "Support")
                .with("complianceLevel", "recommended")
                .with("lastUpdated", "2020-01-01"),
            today(),
        )
        .unwrap();
    let stored = view.store().get(&id).unwrap();
    assert_eq!(stored.get("lastUpdated"), Some(&json!("2024-03-05")));
}
