//! Document rendering over a computed layout.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::layout::{DocumentLayout, LineKind, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::{artifact_stem, paginate, ExportSnapshot};
use crate::error::{MisError, MisResult};

const TITLE_PT: f32 = 16.0;
const SUMMARY_PT: f32 = 10.0;
const HEADING_PT: f32 = 12.0;
const TABLE_PT: f32 = 9.0;
const FOOTER_PT: f32 = 8.0;
const FOOTER_Y_MM: f32 = 8.0;

/// Render a layout to PDF bytes. Layout coordinates are top-down; the
/// PDF origin is bottom-left, so y flips here. The layout's f64
/// geometry narrows to the f32 printpdf expects at this boundary.
pub fn render_document(title: &str, layout: &DocumentLayout) -> MisResult<Vec<u8>> {
    let page_w = Mm(PAGE_WIDTH_MM as f32);
    let page_h = Mm(PAGE_HEIGHT_MM as f32);
    let (doc, first_page, first_layer) = PdfDocument::new(title, page_w, page_h, "content");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;

    let mut page_refs = vec![(first_page, first_layer)];
    for _ in 1..layout.pages.len() {
        page_refs.push(doc.add_page(page_w, page_h, "content"));
    }

    for (i, page) in layout.pages.iter().enumerate() {
        let (page_idx, layer_idx) = page_refs[i];
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        for (y, line) in &page.lines {
            let (font, size) = match line.kind {
                LineKind::Title => (&bold, TITLE_PT),
                LineKind::SummaryPair => (&regular, SUMMARY_PT),
                LineKind::Heading => (&bold, HEADING_PT),
                LineKind::TableHeader => (&bold, TABLE_PT),
                LineKind::TableRow => (&regular, TABLE_PT),
            };
            for (x, text) in &line.cells {
                let at_x = Mm(*x as f32);
                let at_y = Mm((PAGE_HEIGHT_MM - y) as f32);
                layer.use_text(text.clone(), size, at_x, at_y, font);
            }
        }

        if let Some(footer) = layout.footers.get(i) {
            let at_x = Mm(MARGIN_MM as f32);
            layer.use_text(footer.clone(), FOOTER_PT, at_x, Mm(FOOTER_Y_MM), &regular);
        }
    }

    doc.save_to_bytes().map_err(pdf_err)
}

/// Paginate, render and write `Lead_MIS_Report_<date>.pdf` into `dir`.
pub fn export_document(
    snapshot: &ExportSnapshot,
    dir: &Path,
    date: NaiveDate,
) -> MisResult<PathBuf> {
    let layout = paginate(snapshot);
    let bytes = render_document(&snapshot.title, &layout)?;
    let path = dir.join(format!("{}.pdf", artifact_stem(date)));
    fs::write(&path, &bytes)?;
    log::info!(
        "Wrote document {} ({} pages, {} bytes)",
        path.display(),
        layout.pages.len(),
        bytes.len()
    );
    Ok(path)
}

fn pdf_err<E: std::fmt::Display>(e: E) -> MisError {
    MisError::Export(e.to_string())
}
