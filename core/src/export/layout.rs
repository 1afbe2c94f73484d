//! Document pagination.
//!
//! Turns an export snapshot into positioned text lines on A4 pages.
//! Pure geometry, no PDF types, so page breaks and truncation are unit
//! testable. Coordinates are millimetres from the top-left corner;
//! the renderer flips the y axis.
//!
//! Layout rules:
//!   1. Each section shows at most `SECTION_ROW_CAP` rows. The
//!      workbook carries the full data; the document is a digest.
//!   2. A section heading never starts within the last rows of a page
//!      (heading, header and first row move together).
//!   3. A page break inside a table repeats the header row.
//!   4. Cells truncate to their column width with an ellipsis.

use super::{ExportSnapshot, TableModel};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const MARGIN_MM: f64 = 15.0;
/// Rows per section in the document digest.
pub const SECTION_ROW_CAP: usize = 8;

const USABLE_WIDTH_MM: f64 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const FOOTER_RESERVE_MM: f64 = 12.0;

const TITLE_H: f64 = 12.0;
const PAIR_H: f64 = 6.0;
const HEADING_H: f64 = 9.0;
const HEADER_H: f64 = 6.5;
const ROW_H: f64 = 5.5;
const SECTION_GAP: f64 = 5.0;
/// Approximate glyph advance at table size, used for truncation.
const CHAR_WIDTH_MM: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    SummaryPair,
    Heading,
    TableHeader,
    TableRow,
}

/// One text line: its kind plus `(x, text)` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub kind: LineKind,
    pub cells: Vec<(f64, String)>,
}

/// Lines of one page as `(baseline y, line)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub lines: Vec<(f64, Line)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
    /// "Page i of N", one per page.
    pub footers: Vec<String>,
}

/// Lay the snapshot out onto pages.
pub fn paginate(snapshot: &ExportSnapshot) -> DocumentLayout {
    let mut pager = Pager::new();

    pager.push(
        TITLE_H,
        Line { kind: LineKind::Title, cells: vec![(MARGIN_MM, snapshot.title.clone())] },
    );
    for (label, value) in &snapshot.summary {
        pager.push(
            PAIR_H,
            Line {
                kind: LineKind::SummaryPair,
                cells: vec![(MARGIN_MM, label.clone()), (MARGIN_MM + 55.0, value.clone())],
            },
        );
    }
    pager.advance(SECTION_GAP);

    for table in &snapshot.sections {
        if table.rows.is_empty() {
            continue;
        }
        // Keep the heading, header and first row together.
        if !pager.fits(HEADING_H + HEADER_H + ROW_H) {
            pager.break_page();
        }
        pager.push(
            HEADING_H,
            Line { kind: LineKind::Heading, cells: vec![(MARGIN_MM, table.title.clone())] },
        );
        pager.push(HEADER_H, header_line(table));
        for row in table.rows.iter().take(SECTION_ROW_CAP) {
            if !pager.fits(ROW_H) {
                pager.break_page();
                pager.push(HEADER_H, header_line(table));
            }
            pager.push(
                ROW_H,
                Line { kind: LineKind::TableRow, cells: column_cells(row, table.headers.len()) },
            );
        }
        pager.advance(SECTION_GAP);
    }

    let pages = pager.finish();
    let total = pages.len();
    let footers = (1..=total).map(|i| format!("Page {i} of {total}")).collect();
    DocumentLayout { pages, footers }
}

fn header_line(table: &TableModel) -> Line {
    Line { kind: LineKind::TableHeader, cells: column_cells(&table.headers, table.headers.len()) }
}

/// Spread cells evenly across the usable width, truncated to fit.
fn column_cells(values: &[String], count: usize) -> Vec<(f64, String)> {
    let col_w = USABLE_WIDTH_MM / count.max(1) as f64;
    let max_chars = ((col_w - 2.0) / CHAR_WIDTH_MM).max(4.0) as usize;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (MARGIN_MM + i as f64 * col_w, truncate(v, max_chars)))
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.into();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

struct Pager {
    pages: Vec<PageLayout>,
    lines: Vec<(f64, Line)>,
    y: f64,
}

impl Pager {
    fn new() -> Self {
        Pager { pages: Vec::new(), lines: Vec::new(), y: MARGIN_MM }
    }

    fn fits(&self, height: f64) -> bool {
        self.y + height <= PAGE_HEIGHT_MM - FOOTER_RESERVE_MM
    }

    fn push(&mut self, height: f64, line: Line) {
        if !self.fits(height) {
            self.break_page();
        }
        self.y += height;
        self.lines.push((self.y, line));
    }

    /// Vertical gap with no line.
    fn advance(&mut self, height: f64) {
        self.y += height;
    }

    fn break_page(&mut self) {
        self.pages.push(PageLayout { lines: std::mem::take(&mut self.lines) });
        self.y = MARGIN_MM;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.lines.is_empty() || self.pages.is_empty() {
            let lines = std::mem::take(&mut self.lines);
            self.pages.push(PageLayout { lines });
        }
        self.pages
    }
}
