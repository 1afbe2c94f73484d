//! Workbook rendering.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::{artifact_stem, ExportSnapshot};
use crate::error::MisResult;

const MIN_COL_WIDTH: f64 = 10.0;
const MAX_COL_WIDTH: f64 = 40.0;

/// Render the snapshot as workbook bytes. The Summary sheet always
/// comes first, so the workbook has a sheet even when every report
/// section is empty; empty sections get no sheet of their own.
pub fn build_workbook(snapshot: &ExportSnapshot) -> MisResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let mut sheet = Worksheet::new();
    sheet.set_name("Summary")?;
    sheet.write_string_with_format(0, 0, snapshot.title.as_str(), &bold)?;
    for (i, (label, value)) in snapshot.summary.iter().enumerate() {
        let r = (i + 2) as u32;
        sheet.write_string_with_format(r, 0, label.as_str(), &bold)?;
        sheet.write_string(r, 1, value.as_str())?;
    }
    sheet.set_column_width(0, 24.0)?;
    sheet.set_column_width(1, 28.0)?;
    workbook.push_worksheet(sheet);

    for table in &snapshot.sections {
        if table.rows.is_empty() {
            continue;
        }
        let mut sheet = Worksheet::new();
        sheet.set_name(table.sheet.as_str())?;
        for (c, header) in table.headers.iter().enumerate() {
            sheet.write_string_with_format(0, c as u16, header.as_str(), &bold)?;
        }
        for (r, row) in table.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                sheet.write_string((r + 1) as u32, c as u16, cell.as_str())?;
            }
        }
        for c in 0..table.headers.len() {
            sheet.set_column_width(c as u16, column_width(table, c))?;
        }
        workbook.push_worksheet(sheet);
    }

    Ok(workbook.save_to_buffer()?)
}

/// Build and write `Lead_MIS_Report_<date>.xlsx` into `dir`.
pub fn export_workbook(
    snapshot: &ExportSnapshot,
    dir: &Path,
    date: NaiveDate,
) -> MisResult<PathBuf> {
    let bytes = build_workbook(snapshot)?;
    let path = dir.join(format!("{}.xlsx", artifact_stem(date)));
    fs::write(&path, &bytes)?;
    log::info!("Wrote workbook {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Width from the widest cell in the column, clamped.
fn column_width(table: &super::TableModel, col: usize) -> f64 {
    let widest = table
        .rows
        .iter()
        .map(|r| r.get(col).map_or(0, |c| c.chars().count()))
        .chain(std::iter::once(table.headers[col].chars().count()))
        .max()
        .unwrap_or(0);
    (widest as f64 + 2.0).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH)
}
