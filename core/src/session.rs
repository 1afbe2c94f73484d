//! Dashboard session: filter state, fetch generations, assembled view.
//!
//! Refreshes are stamped with a strictly increasing generation number.
//! RULE: a batch applies only while its generation is still the latest
//! one issued. Late arrivals from superseded refreshes are discarded,
//! so the view always reflects the newest filter state regardless of
//! which fetch finishes last.
//!
//! The view caches decoded raw rows; filters re-run over the cache on
//! every read, so changing a client-side filter never needs a refetch.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::catalog;
use crate::envelope;
use crate::error::MisResult;
use crate::fetch::{self, ReportBatch, ReportSource};
use crate::filter::{FilterPipeline, FilterState};
use crate::pivot;
use crate::summary::{self, DashboardStats};
use crate::types::{Generation, ReportKind};

const NO_ROWS: &[Value] = &[];

/// One applied batch: decoded stats plus raw row sections per report.
#[derive(Debug, Clone)]
pub struct MisView {
    pub generation: Generation,
    pub fetched_at: NaiveDateTime,
    pub stats: DashboardStats,
    pub sections: Vec<(ReportKind, Vec<Value>)>,
}

impl MisView {
    /// Raw decoded rows for one report; empty if the batch lacked it.
    pub fn section(&self, kind: ReportKind) -> &[Value] {
        self.sections
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(NO_ROWS, |(_, rows)| rows.as_slice())
    }
}

pub struct MisSession {
    filters: FilterState,
    issued: Generation,
    view: Option<MisView>,
}

impl MisSession {
    pub fn new(filters: FilterState) -> Self {
        MisSession { filters, issued: 0, view: None }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Replace the filter state. Cached rows re-filter on the next
    /// read; call `refresh` to narrow the server-side data too.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// Stamp a new fetch generation. Every batch issued earlier is
    /// stale the moment this returns.
    pub fn next_generation(&mut self) -> Generation {
        self.issued += 1;
        self.issued
    }

    /// One-shot refresh: issue a generation, fetch the batch, apply.
    pub fn refresh(&mut self, source: &dyn ReportSource, now: NaiveDateTime) -> MisResult<()> {
        let generation = self.next_generation();
        let batch = fetch::fetch_batch(source, &self.filters, generation, now)?;
        self.apply(batch)?;
        Ok(())
    }

    /// Apply a completed batch. Returns `Ok(false)` when the batch is
    /// stale. Decode failures leave the previous view untouched.
    pub fn apply(&mut self, batch: ReportBatch) -> MisResult<bool> {
        if batch.generation != self.issued {
            log::warn!(
                "Discarding stale report batch (generation {}, latest is {})",
                batch.generation,
                self.issued
            );
            return Ok(false);
        }

        // Decode everything before touching the view: a batch applies
        // whole or not at all.
        let stats = summary::decode_stats(&batch.stats);
        let mut sections = Vec::with_capacity(batch.payloads.len());
        for (kind, payload) in &batch.payloads {
            let rows = envelope::decode_rows(*kind, payload)?;
            sections.push((*kind, rows));
        }

        log::info!("Applied report batch (generation {})", batch.generation);
        self.view = Some(MisView {
            generation: batch.generation,
            fetched_at: batch.fetched_at,
            stats,
            sections,
        });
        Ok(true)
    }

    pub fn view(&self) -> Option<&MisView> {
        self.view.as_ref()
    }

    /// Raw decoded rows for one report; empty before the first apply.
    pub fn raw_rows(&self, kind: ReportKind) -> &[Value] {
        self.view.as_ref().map_or(NO_ROWS, |v| v.section(kind))
    }

    /// Rows for one report with the current filters applied. The pivot
    /// report yields aggregated entries instead of raw rows.
    pub fn filtered_rows(&self, kind: ReportKind, now: NaiveDateTime) -> Vec<Value> {
        let spec = catalog::spec_for(kind);
        let pipeline = FilterPipeline::new(&self.filters, now);
        let rows = pipeline.apply(self.raw_rows(kind), spec.dimensions);
        if kind == ReportKind::Pivot {
            pivot::pivot_values(&rows, self.filters.pivot_group_by)
        } else {
            rows
        }
    }

    /// Every section in dashboard order, filtered, for the exporters.
    pub fn export_sections(&self, now: NaiveDateTime) -> Vec<(ReportKind, Vec<Value>)> {
        ReportKind::ALL.iter().map(|k| (*k, self.filtered_rows(*k, now))).collect()
    }
}
