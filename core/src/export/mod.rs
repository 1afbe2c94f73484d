//! Export artifacts.
//!
//! A snapshot of the filtered view becomes two files per run, named
//! `Lead_MIS_Report_<YYYY-MM-DD>`:
//!   - a workbook (.xlsx) with a Summary sheet plus one sheet per
//!     non-empty report section, carrying the full filtered rows;
//!   - a document (.pdf) digest with the executive summary and the
//!     leading rows of each section.
//!
//! Shaping (`table`), pagination (`layout`) and rendering (`workbook`,
//! `document`) are separate so the first two stay pure and testable.

mod document;
mod layout;
mod table;
mod workbook;

pub use document::{export_document, render_document};
pub use layout::{paginate, DocumentLayout, Line, LineKind, PageLayout, SECTION_ROW_CAP};
pub use table::{shape_section, TableModel};
pub use workbook::{build_workbook, export_workbook};

use chrono::NaiveDate;
use serde_json::Value;

use crate::catalog;
use crate::types::ReportKind;

pub const REPORT_TITLE: &str = "Lead MIS Report";

/// Artifact file stem shared by both exporters.
pub fn artifact_stem(date: NaiveDate) -> String {
    format!("Lead_MIS_Report_{}", date.format("%Y-%m-%d"))
}

/// Everything both exporters consume: the executive summary pairs and
/// the shaped report sections, in dashboard order.
pub struct ExportSnapshot {
    pub title: String,
    pub summary: Vec<(String, String)>,
    pub sections: Vec<TableModel>,
}

impl ExportSnapshot {
    pub fn new(summary: Vec<(String, String)>, sections: &[(ReportKind, Vec<Value>)]) -> Self {
        ExportSnapshot {
            title: REPORT_TITLE.into(),
            summary,
            sections: sections
                .iter()
                .map(|(kind, rows)| table::shape_section(catalog::spec_for(*kind), rows))
                .collect(),
        }
    }
}
