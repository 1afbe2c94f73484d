//! Row shaping: loose JSON rows to display-ready string cells.

use serde_json::Value;

use crate::bands::{self, BandSpec};
use crate::catalog::{CellFormat, ColumnSpec, ReportSpec};
use crate::fmt;
use crate::row::RowFields;

/// One shaped report section. Cells are already formatted; renderers
/// only place them.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub title: String,
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Shape one report's filtered rows against its column specs. Missing
/// or unusable values become blank cells, never errors.
pub fn shape_section(spec: &ReportSpec, rows: &[Value]) -> TableModel {
    TableModel {
        title: spec.title.into(),
        sheet: spec.sheet.into(),
        headers: spec.columns.iter().map(|c| c.header.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| spec.columns.iter().map(|c| shape_cell(r, c)).collect())
            .collect(),
    }
}

fn shape_cell(row: &Value, col: &ColumnSpec) -> String {
    match col.format {
        CellFormat::Text => row
            .str_first(col.keys)
            .map(str::to_owned)
            .or_else(|| row.num_first(col.keys).map(number_cell))
            .unwrap_or_default(),
        CellFormat::Count => row.num_first(col.keys).map(fmt::count).unwrap_or_default(),
        CellFormat::Number => row.num_first(col.keys).map(number_cell).unwrap_or_default(),
        CellFormat::Currency => row.num_first(col.keys).map(fmt::currency).unwrap_or_default(),
        CellFormat::Percent => row.num_first(col.keys).map(fmt::percent).unwrap_or_default(),
        CellFormat::Date => row.date_first(col.keys).map(fmt::date).unwrap_or_default(),
        CellFormat::Members => fmt::count(row.rows_first(col.keys).len() as f64),
        CellFormat::ConfidenceBand => band_cell(row, col, &bands::CONFIDENCE_BANDS),
        CellFormat::ScoreBand => band_cell(row, col, &bands::SCORE_BANDS),
    }
}

fn band_cell(row: &Value, col: &ColumnSpec, table: &'static [BandSpec]) -> String {
    row.num_first(col.keys)
        .map(|v| bands::classify(table, v).label.to_string())
        .unwrap_or_default()
}

fn number_cell(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n:.2}")
    }
}
