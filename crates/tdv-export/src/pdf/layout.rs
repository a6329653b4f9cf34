//! Table layout for PDF exports.
//!
//! Everything here is pure geometry in millimetres: column widths from
//! content, word wrapping, page orientation and page breaks. Builtin PDF
//! fonts carry no metrics we can query, so text width is estimated from the
//! character count.

use std::ops::Range;

use tdv_model::Record;

use crate::csv_writer::{cell_text, columns};

pub const A4_SHORT_MM: f32 = 210.0;
pub const A4_LONG_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 14.0;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;
const BOLD_GLYPH_EM: f32 = 0.55;
pub const CELL_PADDING_MM: f32 = 1.8;
const LINE_SPACING: f32 = 1.25;
const MIN_COLUMN_MM: f32 = 10.0;
const MAX_COLUMN_MM: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Page width and height.
    pub fn page_size(self) -> (f32, f32) {
        match self {
            Self::Portrait => (A4_SHORT_MM, A4_LONG_MM),
            Self::Landscape => (A4_LONG_MM, A4_SHORT_MM),
        }
    }

    pub fn content_width(self) -> f32 {
        self.page_size().0 - 2.0 * MARGIN_MM
    }

    pub fn content_height(self) -> f32 {
        self.page_size().1 - 2.0 * MARGIN_MM
    }
}

pub fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let em = if bold { BOLD_GLYPH_EM } else { AVG_GLYPH_EM };
    text.chars().count() as f32 * font_size * em * PT_TO_MM
}

pub fn line_height(font_size: f32) -> f32 {
    font_size * PT_TO_MM * LINE_SPACING
}

/// One titled table: header plus stringified cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSection {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSection {
    /// Columns are the keys of the first record with any field, as in CSV
    /// exports.
    pub fn from_records(title: impl Into<String>, records: &[Record]) -> Self {
        let columns: Vec<String> = columns(records).into_iter().map(str::to_string).collect();
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| cell_text(record.fields().get(column)).into_owned())
                    .collect()
            })
            .collect();
        Self {
            title: title.into(),
            columns,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    /// Widest cell (header included) per column plus padding, bounded so a
    /// single long value wraps instead of claiming the page.
    pub fn natural_widths(&self, font_size: f32) -> Vec<f32> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let header = text_width(header, font_size, true);
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| text_width(cell, font_size, false))
                    .fold(header, f32::max);
                (widest + 2.0 * CELL_PADDING_MM).clamp(MIN_COLUMN_MM, MAX_COLUMN_MM)
            })
            .collect()
    }

    pub fn natural_width(&self, font_size: f32) -> f32 {
        self.natural_widths(font_size).iter().sum()
    }
}

/// Landscape as soon as any section is wider than a portrait page.
pub fn choose_orientation(sections: &[TableSection], font_size: f32) -> Orientation {
    let portrait = Orientation::Portrait.content_width();
    if sections
        .iter()
        .any(|section| section.natural_width(font_size) > portrait)
    {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

/// Scale widths down proportionally when they exceed `available`.
pub fn fit_widths(natural: &[f32], available: f32) -> Vec<f32> {
    let total: f32 = natural.iter().sum();
    if total <= available || total <= 0.0 {
        return natural.to_vec();
    }
    let factor = available / total;
    natural.iter().map(|width| width * factor).collect()
}

/// Greedy word wrap into lines no wider than `width`. Words longer than a
/// line are split by character. Always returns at least one line.
pub fn wrap(text: &str, width: f32, font_size: f32, bold: bool) -> Vec<String> {
    let inner = (width - 2.0 * CELL_PADDING_MM).max(0.0);
    let per_char = text_width("x", font_size, bold);
    // Nudge up so an exact fit is not lost to rounding.
    let max_chars = ((inner / per_char + 1e-3).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word));
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// A row with its wrapped cell lines and total height.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub cells: Vec<Vec<String>>,
    pub height: f32,
}

impl RowLayout {
    pub fn new(cells: &[String], widths: &[f32], font_size: f32, bold: bool) -> Self {
        let cells: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| wrap(cell, *width, font_size, bold))
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
        let height = lines as f32 * line_height(font_size) + 2.0 * CELL_PADDING_MM;
        Self { cells, height }
    }
}

/// A section laid out for a given content width.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub title: String,
    pub widths: Vec<f32>,
    pub header: RowLayout,
    pub rows: Vec<RowLayout>,
}

impl TableLayout {
    pub fn new(section: &TableSection, content_width: f32, font_size: f32) -> Self {
        let widths = fit_widths(&section.natural_widths(font_size), content_width);
        let header = RowLayout::new(&section.columns, &widths, font_size, true);
        let rows = section
            .rows
            .iter()
            .map(|row| RowLayout::new(row, &widths, font_size, false))
            .collect();
        Self {
            title: section.title.clone(),
            widths,
            header,
            rows,
        }
    }

    pub fn width(&self) -> f32 {
        self.widths.iter().sum()
    }
}

/// Split rows into pages. The first page has `first_available` mm left,
/// later pages `page_available`; each page also repeats the header. A row
/// taller than a whole page still gets a page of its own, and the first
/// page always takes at least one row.
pub fn page_breaks(
    row_heights: &[f32],
    header_height: f32,
    first_available: f32,
    page_available: f32,
) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut remaining = first_available - header_height;
    for (index, height) in row_heights.iter().enumerate() {
        if *height > remaining && index > start {
            pages.push(start..index);
            start = index;
            remaining = page_available - header_height;
        }
        remaining -= height;
    }
    if start < row_heights.len() {
        pages.push(start..row_heights.len());
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_splits_on_words_and_long_tokens() {
        let width = text_width("xxxxxxxxxx", 10.0, false) + 2.0 * CELL_PADDING_MM;
        assert_eq!(wrap("alpha beta gamma", width, 10.0, false), vec!["alpha beta", "gamma"]);
        assert_eq!(
            wrap("abcdefghijklmnopqrstuvwxy", width, 10.0, false),
            vec!["abcdefghij", "klmnopqrst", "uvwxy"]
        );
        assert_eq!(wrap("", width, 10.0, false), vec![String::new()]);
    }

    #[test]
    fn fit_widths_scales_proportionally() {
        assert_eq!(fit_widths(&[10.0, 20.0], 60.0), vec![10.0, 20.0]);
        let fitted = fit_widths(&[100.0, 300.0], 200.0);
        assert!((fitted[0] - 50.0).abs() < 1e-3);
        assert!((fitted[1] - 150.0).abs() < 1e-3);
    }

    #[test]
    fn page_breaks_repeat_budget_per_page() {
        // 100mm first page, 150mm later pages, 10mm header, 30mm rows.
        let rows = [30.0; 8];
        let pages = page_breaks(&rows, 10.0, 100.0, 150.0);
        assert_eq!(pages, vec![0..3, 3..7, 7..8]);
    }

    #[test]
    fn oversized_rows_still_get_a_page() {
        let pages = page_breaks(&[40.0, 500.0, 40.0], 10.0, 150.0, 150.0);
        assert_eq!(pages, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn wide_tables_go_landscape() {
        let narrow = TableSection {
            title: "n".into(),
            columns: vec!["id".into(), "name".into()],
            rows: vec![vec!["1".into(), "Ann".into()]],
        };
        let wide = TableSection {
            title: "w".into(),
            columns: (0..12).map(|i| format!("column_{i}")).collect(),
            rows: vec![(0..12).map(|_| "some longer value".to_string()).collect()],
        };
        assert_eq!(choose_orientation(std::slice::from_ref(&narrow), 9.0), Orientation::Portrait);
        assert_eq!(choose_orientation(&[narrow, wide], 9.0), Orientation::Landscape);
    }
}
