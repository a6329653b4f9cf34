//! Tests for tdv-model types.

use chrono::NaiveDate;
use serde_json::json;

use tdv_model::{ExportFormat, FilterState, ModelError, PageState, Record, Selection};

#[test]
fn filter_state_serializes_with_all_sentinel() {
    let state = FilterState::new()
        .with_search("john")
        .with_filter("status", "all")
        .with_filter("role", "admin")
        .with_date_from(NaiveDate::from_ymd_opt(2023, 6, 1));

    let json = serde_json::to_value(&state).expect("serialize filter state");
    assert_eq!(
        json,
        json!({
            "searchTerm": "john",
            "fieldFilters": { "role": "admin", "status": "all" },
            "dateFrom": "2023-06-01",
            "dateTo": null
        })
    );

    let round: FilterState = serde_json::from_value(json).expect("deserialize filter state");
    assert_eq!(round, state);
    assert_eq!(round.field_filters["status"], Selection::All);
}

#[test]
fn filter_state_defaults_missing_keys() {
    let state: FilterState = serde_json::from_value(json!({ "searchTerm": "x" })).unwrap();
    assert_eq!(state, FilterState::new().with_search("x"));
}

#[test]
fn replacing_a_filter_changes_equality() {
    let before = FilterState::new().with_filter("status", "all");
    let same = before.clone().with_filter("status", "all");
    let after = before.clone().with_filter("status", "active");
    assert_eq!(before, same);
    assert_ne!(before, after);
}

#[test]
fn record_keeps_insertion_order() {
    let record: Record = serde_json::from_str(r#"{"zeta":1,"alpha":2,"id":3}"#).unwrap();
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "id"]);

    let built = Record::new().with("b", 1).with("a", 2);
    assert_eq!(built.keys().collect::<Vec<_>>(), vec!["b", "a"]);
}

#[test]
fn record_text_renders_scalars_only() {
    let record = Record::from_value(json!({
        "id": 1,
        "score": 82.5,
        "flagged": false,
        "lastLogin": null,
        "details": { "total": 3 }
    }))
    .unwrap();
    assert_eq!(record.text("score").as_deref(), Some("82.5"));
    assert_eq!(record.text("flagged").as_deref(), Some("false"));
    assert_eq!(record.text("lastLogin"), None);
    assert_eq!(record.text("details"), None);
    assert_eq!(record.text("details.total").as_deref(), Some("3"));
}

#[test]
fn page_state_rejects_zero_resize() {
    let page = PageState::new(5).unwrap();
    assert_eq!(page.resize(0, 10), Err(ModelError::ZeroPageSize));
}

#[test]
fn export_format_parsing() {
    assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
    assert_eq!(" pdf ".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
    assert_eq!(
        "xlsx".parse::<ExportFormat>(),
        Err(ModelError::UnknownFormat("xlsx".into()))
    );
    assert_eq!(ExportFormat::Csv.mime(), "text/csv;charset=utf-8");
}
