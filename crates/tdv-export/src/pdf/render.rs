//! PDF rendering with the builtin Helvetica fonts.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
};
use tracing::debug;

use crate::chart::ChartImage;
use crate::error::{ExportError, Result};
use crate::pdf::layout::{
    CELL_PADDING_MM, MARGIN_MM, Orientation, RowLayout, TableLayout, TableSection,
    choose_orientation, line_height, page_breaks,
};

/// Screen resolution charts are assumed to be captured at.
const CHART_DPI: f32 = 96.0;
const MM_PER_INCH: f32 = 25.4;
const SECTION_GAP_MM: f32 = 6.0;

/// Fill colour of table header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HeaderColor {
    pub const DEFAULT: HeaderColor = HeaderColor {
        r: 0x29,
        g: 0x80,
        b: 0xB9,
    };

    fn to_color(self) -> Color {
        rgb(self.r, self.g, self.b)
    }
}

impl Default for HeaderColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for HeaderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidColor(pub String);

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a colour like #2980B9, got {:?}", self.0)
    }
}

impl std::error::Error for InvalidColor {}

impl FromStr for HeaderColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfStyle {
    pub header_color: HeaderColor,
    pub font_size: f32,
    pub title_size: f32,
}

impl Default for PdfStyle {
    fn default() -> Self {
        Self {
            header_color: HeaderColor::DEFAULT,
            font_size: 8.0,
            title_size: 16.0,
        }
    }
}

/// Everything that goes into one document.
#[derive(Debug, Clone, Copy)]
pub struct PdfContent<'a> {
    pub title: &'a str,
    pub generated_at: NaiveDateTime,
    pub charts: &'a [ChartImage],
    pub sections: &'a [TableSection],
}

pub fn render_pdf(content: &PdfContent<'_>, style: &PdfStyle) -> Result<Vec<u8>> {
    let orientation = choose_orientation(content.sections, style.font_size);
    let mut canvas = Canvas::new(content.title, orientation)?;

    canvas.text(content.title, style.title_size, MARGIN_MM, true);
    canvas.advance(line_height(style.title_size));
    let stamp = format!("Generated on {}", content.generated_at.format("%Y-%m-%d %H:%M"));
    canvas.text(&stamp, style.font_size, MARGIN_MM, false);
    canvas.advance(line_height(style.font_size) + SECTION_GAP_MM);

    for chart in content.charts {
        canvas.chart(chart, style);
    }
    for section in content.sections {
        canvas.section(section, style);
    }

    debug!(
        pages = canvas.pages,
        orientation = ?orientation,
        sections = content.sections.len(),
        charts = content.charts.len(),
        "rendered pdf"
    );
    canvas.finish()
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn black() -> Color {
    rgb(0, 0, 0)
}

fn white() -> Color {
    rgb(255, 255, 255)
}

fn border() -> Color {
    rgb(200, 200, 200)
}

/// Drawing state; `cursor` is measured in mm down from the top edge.
struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    orientation: Orientation,
    cursor: f32,
    pages: usize,
}

impl Canvas {
    fn new(title: &str, orientation: Orientation) -> Result<Self> {
        let (width, height) = orientation.page_size();
        let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(ExportError::pdf)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(ExportError::pdf)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            orientation,
            cursor: MARGIN_MM,
            pages: 1,
        })
    }

    fn page_height(&self) -> f32 {
        self.orientation.page_size().1
    }

    fn remaining(&self) -> f32 {
        self.page_height() - MARGIN_MM - self.cursor
    }

    fn advance(&mut self, mm: f32) {
        self.cursor += mm;
    }

    fn new_page(&mut self) {
        let (width, height) = self.orientation.page_size();
        let (page, layer) = self.doc.add_page(Mm(width), Mm(height), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = MARGIN_MM;
        self.pages += 1;
    }

    /// Text whose line box starts at the cursor.
    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        self.text_at(text, size, x, self.cursor, bold);
    }

    fn text_at(&self, text: &str, size: f32, x: f32, top: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        // Baseline sits about 80% down the line box.
        let baseline = top + line_height(size) * 0.8;
        self.layer
            .use_text(text, size, Mm(x), Mm(self.page_height() - baseline), font);
    }

    fn rect(&self, x: f32, top: f32, width: f32, height: f32, mode: PaintMode) {
        let bottom = self.page_height() - top - height;
        let upper = self.page_height() - top;
        let corners = vec![
            (Point::new(Mm(x), Mm(bottom)), false),
            (Point::new(Mm(x + width), Mm(bottom)), false),
            (Point::new(Mm(x + width), Mm(upper)), false),
            (Point::new(Mm(x), Mm(upper)), false),
        ];
        match mode {
            PaintMode::Stroke => self.layer.add_line(Line {
                points: corners,
                is_closed: true,
            }),
            mode => self.layer.add_polygon(Polygon {
                rings: vec![corners],
                mode,
                winding_order: WindingOrder::NonZero,
            }),
        }
    }

    fn chart(&mut self, chart: &ChartImage, style: &PdfStyle) {
        let (px_width, _) = chart.dimensions();
        let content_width = self.orientation.content_width();
        let caption = line_height(style.font_size + 2.0);
        let max_height = self.orientation.content_height() - caption;

        let mut width = (px_width as f32 * MM_PER_INCH / CHART_DPI).min(content_width);
        let mut height = chart.height_for_width(width);
        if height > max_height {
            width *= max_height / height;
            height = max_height;
        }
        if caption + height > self.remaining() {
            self.new_page();
        }

        self.layer.set_fill_color(black());
        self.text(&chart.title, style.font_size + 2.0, MARGIN_MM, true);
        self.advance(caption);

        Image::from_dynamic_image(chart.image()).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(self.page_height() - self.cursor - height)),
                dpi: Some(px_width as f32 * MM_PER_INCH / width),
                ..Default::default()
            },
        );
        self.advance(height + SECTION_GAP_MM);
    }

    fn section(&mut self, section: &TableSection, style: &PdfStyle) {
        let title_height = line_height(style.font_size + 3.0) + 1.0;
        if section.is_empty() {
            if title_height * 2.0 > self.remaining() {
                self.new_page();
            }
            self.layer.set_fill_color(black());
            self.text(&section.title, style.font_size + 3.0, MARGIN_MM, true);
            self.advance(title_height);
            self.text("No records", style.font_size, MARGIN_MM, false);
            self.advance(line_height(style.font_size) + SECTION_GAP_MM);
            return;
        }

        let table = TableLayout::new(section, self.orientation.content_width(), style.font_size);
        let first_row = table.rows.first().map_or(0.0, |row| row.height);
        if title_height + table.header.height + first_row > self.remaining() {
            self.new_page();
        }

        self.layer.set_fill_color(black());
        self.text(&table.title, style.font_size + 3.0, MARGIN_MM, true);
        self.advance(title_height);

        let heights: Vec<f32> = table.rows.iter().map(|row| row.height).collect();
        let pages = page_breaks(
            &heights,
            table.header.height,
            self.remaining(),
            self.orientation.content_height(),
        );
        for (index, range) in pages.into_iter().enumerate() {
            if index > 0 {
                self.new_page();
            }
            self.row(&table.header, &table.widths, style, Some(style.header_color));
            for row in &table.rows[range] {
                self.row(row, &table.widths, style, None);
            }
        }
        self.advance(SECTION_GAP_MM);
    }

    fn row(&mut self, row: &RowLayout, widths: &[f32], style: &PdfStyle, header: Option<HeaderColor>) {
        let mut x = MARGIN_MM;
        for (lines, width) in row.cells.iter().zip(widths) {
            match header {
                Some(color) => {
                    self.layer.set_fill_color(color.to_color());
                    self.rect(x, self.cursor, *width, row.height, PaintMode::Fill);
                    self.layer.set_fill_color(white());
                }
                None => {
                    self.layer.set_outline_color(border());
                    self.layer.set_outline_thickness(0.3);
                    self.rect(x, self.cursor, *width, row.height, PaintMode::Stroke);
                    self.layer.set_fill_color(black());
                }
            }
            let mut top = self.cursor + CELL_PADDING_MM;
            for line in lines {
                self.text_at(line, style.font_size, x + CELL_PADDING_MM, top, header.is_some());
                top += line_height(style.font_size);
            }
            x += width;
        }
        self.advance(row.height);
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(ExportError::pdf)
    }
}
