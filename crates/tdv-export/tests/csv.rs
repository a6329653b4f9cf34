//! CSV output format.

use serde_json::json;

use tdv_export::{ExportError, to_csv};
use tdv_model::Record;

mod common;

fn text(records: &[Record]) -> String {
    String::from_utf8(to_csv("test", records).expect("csv")).expect("utf-8")
}

#[test]
fn header_from_first_record_and_quoted_values() {
    assert_eq!(
        text(&common::people()),
        "id,name\r\n\"1\",\"Ann\"\r\n\"2\",\"Bo\"\r\n"
    );
}

#[test]
fn nested_values_become_json() {
    let records = vec![Record::from_value(json!({
        "id": 1,
        "user": {"name": "Admin User"},
        "files": ["a.pdf", "b.zip"]
    }))
    .unwrap()];
    assert_eq!(
        text(&records),
        "id,user,files\r\n\"1\",\"{\"\"name\"\":\"\"Admin User\"\"}\",\"[\"\"a.pdf\"\",\"\"b.zip\"\"]\"\r\n"
    );
}

#[test]
fn embedded_quotes_commas_and_newlines_are_escaped() {
    let records = vec![
        Record::new()
            .with("id", 1)
            .with("description", "Updated \"Assessment Fairness\", v2\nsecond line"),
    ];
    assert_eq!(
        text(&records),
        "id,description\r\n\"1\",\"Updated \"\"Assessment Fairness\"\", v2\nsecond line\"\r\n"
    );
}

#[test]
fn later_records_follow_the_first_records_columns() {
    let records = vec![
        Record::new().with("id", 1).with("name", "Ann"),
        Record::new().with("name", "Bo").with("id", 2).with("extra", true),
    ];
    assert_eq!(
        text(&records),
        "id,name\r\n\"1\",\"Ann\"\r\n\"2\",\"Bo\"\r\n"
    );
}

#[test]
fn empty_record_sets_are_rejected() {
    assert!(matches!(
        to_csv("Audit Trail", &[]),
        Err(ExportError::Empty { label }) if label == "Audit Trail"
    ));
}

#[test]
fn leading_record_without_fields_does_not_hide_the_rest() {
    let records = vec![
        Record::new(),
        Record::new().with("id", 2).with("name", "Bo"),
    ];
    assert_eq!(text(&records), "id,name\r\n\"\",\"\"\r\n\"2\",\"Bo\"\r\n");

    let blank = vec![Record::new(), Record::new()];
    assert!(matches!(to_csv("blank", &blank), Err(ExportError::Empty { .. })));
}
