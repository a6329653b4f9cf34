//! Artifact filenames.

use chrono::NaiveDate;

use tdv_model::ExportFormat;

const FALLBACK_STEM: &str = "export";

/// `label` with whitespace runs turned into `-`, an optional `-YYYY-MM-DD`
/// and the format's extension. Path separators never survive.
pub fn export_filename(label: &str, format: ExportFormat, date: Option<NaiveDate>) -> String {
    let stem = label
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let stem = if stem.is_empty() || stem.chars().all(|c| c == '.') {
        FALLBACK_STEM.to_string()
    } else {
        stem
    };
    match date {
        Some(date) => format!("{stem}-{}.{}", date.format("%Y-%m-%d"), format.extension()),
        None => format!("{stem}.{}", format.extension()),
    }
}
