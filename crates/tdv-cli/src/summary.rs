//! Terminal rendering of pages, screens and notices.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use tdv_core::{Page, PageStatus, TableView};
use tdv_export::csv_writer::cell_text;
use tdv_model::{Notice, NoticeSeverity, Record};

/// Cells longer than this are cut with an ellipsis.
const MAX_CELL_CHARS: usize = 48;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

/// Columns of a page: every key in first-seen order.
pub fn page_columns<'a>(rows: &[&'a Record]) -> Vec<&'a str> {
    let mut columns: Vec<&str> = Vec::new();
    for key in rows.iter().copied().flat_map(Record::keys) {
        if !columns.contains(&key) {
            columns.push(key);
        }
    }
    columns
}

/// The page as a table, or `None` when there are no rows to show.
pub fn page_table(page: &Page<&Record>) -> Option<Table> {
    if page.rows.is_empty() {
        return None;
    }
    let columns = page_columns(&page.rows);
    let mut table = Table::new();
    table.set_header(columns.iter().map(|column| header_cell(column)));
    apply_table_style(&mut table);
    for record in &page.rows {
        table.add_row(columns.iter().map(|column| match record.fields().get(*column) {
            None => dim_cell("-"),
            value => Cell::new(truncate(&cell_text(value))),
        }));
    }
    Some(table)
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL_CHARS - 1).collect();
    cut.push('…');
    cut
}

/// One-line summary under the table.
pub fn page_footer(page: &Page<&Record>) -> String {
    let number = page.state.page_index() + 1;
    let pages = page.page_count();
    match page.status() {
        PageStatus::NoResults => "No results found. Try adjusting the search or filters.".to_string(),
        PageStatus::OutOfRange => {
            format!("Page {number} is past the end; there are {pages} page(s) of {} record(s).", page.total)
        }
        PageStatus::Rows => {
            let (first, last) = page.row_range().unwrap_or((0, 0));
            format!(
                "Showing {first}-{last} of {} record(s), page {number} of {pages}",
                page.total
            )
        }
    }
}

pub fn print_page(view: &TableView) {
    let page = view.page();
    let filter = view.filter_state();
    let mut active: Vec<String> = Vec::new();
    if !filter.search_term.is_empty() {
        active.push(format!("search={:?}", filter.search_term));
    }
    active.extend(filter.active_filters().map(|(field, value)| format!("{field}={value}")));
    if filter.has_date_range() {
        let bound = |day: Option<chrono::NaiveDate>| day.map(|d| d.to_string()).unwrap_or_default();
        active.push(format!("dates={}..{}", bound(filter.date_from), bound(filter.date_to)));
    }

    println!("{}", view.config().export_label);
    if !active.is_empty() {
        println!("Filters: {}", active.join(", "));
    }
    if let Some(table) = page_table(&page) {
        println!("{table}");
    }
    println!("{}", page_footer(&page));
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.severity {
            NoticeSeverity::Success => println!("✓ {}", notice.message),
            NoticeSeverity::Warning => eprintln!("warning: {}", notice.message),
            NoticeSeverity::Error => eprintln!("error: {}", notice.message),
        }
    }
}
