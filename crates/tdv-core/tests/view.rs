//! Table view behaviour: filter resets, page clamping and store mutations.

use chrono::NaiveDate;
use serde_json::json;

use tdv_core::{PageStatus, StoreError, TableView, ViewError};
use tdv_model::{ExportFormat, FilterField, FilterState, ModelError, Record, RecordId, ViewConfig};

fn config() -> ViewConfig {
    ViewConfig::new("users")
        .with_search_fields(["name"])
        .with_filter_field(
            FilterField::new("status").with_choices(["active", "pending", "suspended"]),
        )
        .with_page_size(3)
        .with_export_label("User Management")
        .with_date_suffix(true)
        .with_required_fields(["name"])
}

fn users(count: i64) -> Vec<Record> {
    (1..=count)
        .map(|id| {
            let status = if id % 2 == 0 { "pending" } else { "active" };
            Record::new()
                .with("id", id)
                .with("name", format!("User {id}"))
                .with("status", status)
        })
        .collect()
}

fn view(count: i64) -> TableView {
    TableView::new(config(), users(count)).expect("view")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date")
}

fn page_ids(view: &TableView) -> Vec<RecordId> {
    view.page().rows.iter().filter_map(|record| record.id()).collect()
}

#[test]
fn first_page_is_shown_initially() {
    let view = view(7);
    let page = view.page();
    assert_eq!(page.status(), PageStatus::Rows);
    assert_eq!(page.total, 7);
    assert_eq!(page.page_count(), 3);
    assert_eq!(page_ids(&view), vec![RecordId::Int(1), RecordId::Int(2), RecordId::Int(3)]);
}

#[test]
fn any_filter_change_resets_page_index() {
    let mut view = view(9);
    view.set_page_index(2);
    assert_eq!(view.page_state().page_index(), 2);

    let unchanged = view.filter_state().clone();
    assert!(!view.set_filter(unchanged).unwrap());
    assert_eq!(view.page_state().page_index(), 2);

    let changed = view.filter_state().clone().with_search("user");
    assert!(view.set_filter(changed).unwrap());
    assert_eq!(view.page_state().page_index(), 0);

    view.set_page_index(1);
    let dated = view
        .filter_state()
        .clone()
        .with_date_from(NaiveDate::from_ymd_opt(2020, 1, 1));
    assert!(view.set_filter(dated).unwrap());
    assert_eq!(view.page_state().page_index(), 0);
}

#[test]
fn filtering_to_nothing_signals_no_results() {
    let mut view = TableView::new(config().with_page_size(5), users(5)).unwrap();
    view.set_filter(FilterState::new().with_filter("status", "suspended"))
        .unwrap();
    let page = view.page();
    assert!(page.rows.is_empty());
    assert_eq!(page.status(), PageStatus::NoResults);
}

#[test]
fn out_of_range_index_yields_empty_page() {
    let mut view = view(4);
    view.set_page_index(10);
    let page = view.page();
    assert!(page.rows.is_empty());
    assert_eq!(page.status(), PageStatus::OutOfRange);
}

#[test]
fn page_size_change_clamps_index() {
    let mut view = view(12);
    view.set_page_index(3);
    view.set_page_size(5).unwrap();
    assert_eq!(view.page_state().page_index(), 2);
    assert_eq!(page_ids(&view), vec![RecordId::Int(11), RecordId::Int(12)]);

    assert!(matches!(
        view.set_page_size(0),
        Err(ViewError::Model(ModelError::ZeroPageSize))
    ));
}

#[test]
fn undeclared_filter_fields_are_rejected() {
    let mut view = view(3);
    let err = view
        .set_filter(FilterState::new().with_filter("role", "admin"))
        .unwrap_err();
    assert!(matches!(
        err,
        ViewError::Model(ModelError::UnknownFilterField { .. })
    ));
}

#[test]
fn removing_the_last_row_of_a_page_clamps() {
    let mut view = view(4);
    view.set_page_index(1);
    view.remove(&RecordId::Int(4)).unwrap();
    assert_eq!(view.page_state().page_index(), 0);
    assert_eq!(view.store().len(), 3);
}

#[test]
fn status_change_can_move_a_record_out_of_the_filter() {
    let mut view = view(4);
    view.set_filter(FilterState::new().with_filter("status", "active"))
        .unwrap();
    assert_eq!(view.filtered_count(), 2);
    let updated = view
        .update_field(&RecordId::Int(1), "status", "suspended")
        .unwrap();
    assert_eq!(updated.text("status").as_deref(), Some("suspended"));
    assert_eq!(view.filtered_count(), 1);
}

#[test]
fn submit_assigns_next_id_and_validates() {
    let mut view = view(3);
    view.remove(&RecordId::Int(2)).unwrap();
    let id = view
        .submit(Record::new().with("name", "New User").with("status", "pending"), today())
        .unwrap();
    assert_eq!(id, RecordId::Int(4));

    let err = view
        .submit(Record::new().with("status", "active"), today())
        .unwrap_err();
    match err {
        ViewError::Invalid(errors) => assert_eq!(errors.get("name"), Some("is required")),
        other => panic!("expected validation errors, got {other:?}"),
    }

    let bad_choice = view
        .submit(Record::new().with("name", "X").with("status", "banned"), today())
        .unwrap_err();
    assert!(matches!(bad_choice, ViewError::Invalid(_)));
    assert_eq!(view.store().len(), 3);
}

#[test]
fn store_rejects_duplicate_and_missing_ids() {
    let mut records = users(2);
    records.push(Record::new().with("id", 1).with("name", "dup"));
    assert!(matches!(
        TableView::new(config(), records),
        Err(ViewError::Store(StoreError::DuplicateId(RecordId::Int(1))))
    ));
    assert!(matches!(
        TableView::new(config(), vec![Record::new().with("name", "anon")]),
        Err(ViewError::Store(StoreError::MissingId))
    ));
}

#[test]
fn edits_merge_but_never_change_the_id() {
    let mut view = view(2);
    let id = RecordId::Int(1);
    let patch = Record::new().with("name", "Renamed").with("email", "r@example.com");
    let edited = view.update(&id, patch, today()).unwrap();
    let keys: Vec<&str> = edited.keys().collect();
    assert_eq!(keys, vec!["id", "name", "status", "email"]);

    assert!(matches!(
        view.update(&id, Record::new().with("id", 99), today()),
        Err(ViewError::Store(StoreError::ImmutableId(_)))
    ));
    assert!(matches!(
        view.update_field(&id, "id", json!(5)),
        Err(ViewError::Store(StoreError::ImmutableId(_)))
    ));
    assert!(matches!(
        view.remove(&RecordId::Int(42)),
        Err(ViewError::Store(StoreError::NotFound(_)))
    ));
}

#[test]
fn export_job_snapshots_the_filtered_set() {
    let mut view = view(7);
    view.set_filter(FilterState::new().with_filter("status", "active"))
        .unwrap();
    let requested_at = NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .unwrap();
    let job = view.export_job(ExportFormat::Csv, requested_at);
    // Four active users span two pages of three; all of them are exported.
    assert_eq!(job.record_count(), 4);
    assert_eq!(job.label, "User Management");
    assert!(job.date_suffix);
}

#[test]
fn unusable_submitted_ids_are_rejected() {
    let mut view = view(2);
    for id in [json!(1.5), json!(true), json!([3])] {
        let submission = Record::new().with("id", id).with("name", "Odd");
        assert!(matches!(
            view.submit(submission, today()),
            Err(ViewError::Store(StoreError::MissingId))
        ));
    }
    assert_eq!(view.store().len(), 2);

    let assigned = view
        .submit(Record::new().with("id", json!(null)).with("name", "Null id"), today())
        .unwrap();
    assert_eq!(assigned, RecordId::Int(3));
    let kept = view
        .submit(Record::new().with("id", 10).with("name", "Chosen id"), today())
        .unwrap();
    assert_eq!(kept, RecordId::Int(10));
}

#[test]
fn submissions_get_defaults_and_date_stamps() {
    let config = config()
        .with_submit_default("status", "pending")
        .with_created_stamp("createdOn")
        .with_updated_stamp("editedOn");
    let mut view = TableView::new(config, users(1)).unwrap();

    let id = view
        .submit(Record::new().with("name", "Fresh").with("status", json!(null)), today())
        .unwrap();
    let stored = view.store().get(&id).unwrap();
    assert_eq!(stored.get("status"), Some(&json!("pending")));
    assert_eq!(stored.get("createdOn"), Some(&json!("2024-03-05")));
    assert_eq!(stored.get("editedOn"), None);

    let explicit = view
        .submit(Record::new().with("name", "Active").with("status", "active"), today())
        .unwrap();
    assert_eq!(
        view.store().get(&explicit).and_then(|r| r.text("status")).as_deref(),
        Some("active")
    );

    let edited = view
        .update(&RecordId::Int(1), Record::new().with("name", "Renamed"), today())
        .unwrap();
    assert_eq!(edited.get("editedOn"), Some(&json!("2024-03-05")));
    assert_eq!(edited.get("createdOn"), None);
}
