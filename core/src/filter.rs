//! Filter state and the client-side row pipeline.
//!
//! The backend already narrows by date range, multi-selects and region
//! through query parameters; the pipeline re-applies every dimension
//! client-side so stale or over-broad payloads still render correctly.
//!
//! Matching rules:
//!   1. An empty multi-select or an "all" selector passes every row.
//!   2. A row missing the field an ACTIVE filter needs is excluded.
//!      Exception: rows without a parseable date pass date filters.
//!   3. Duplicate-group source/status filters are existential over the
//!      group's nested members.
//!   4. String matching is exact and case-sensitive.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bands::{self, BandSpec};
use crate::catalog::Dimension;
use crate::date_range::DateRange;
use crate::row::{self, RowFields};
use crate::types::{PivotGroupBy, ReportKind};

/// Neutral token for single-select filters.
pub const ALL: &str = "all";

/// Everything the dashboard's filter bar can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub date_range: DateRange,
    /// Multi-selects. Empty means "no restriction".
    pub agents: Vec<String>,
    pub sources: Vec<String>,
    pub statuses: Vec<String>,
    /// Single-selects. "all" means "no restriction".
    pub region: String,
    pub confidence: String,
    pub score: String,
    pub conversion: String,
    pub duplicate_source: String,
    pub duplicate_status: String,
    pub pivot_group_by: PivotGroupBy,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            date_range: DateRange::default(),
            agents: Vec::new(),
            sources: Vec::new(),
            statuses: Vec::new(),
            region: ALL.into(),
            confidence: ALL.into(),
            score: ALL.into(),
            conversion: ALL.into(),
            duplicate_source: ALL.into(),
            duplicate_status: ALL.into(),
            pivot_group_by: PivotGroupBy::default(),
        }
    }
}

impl FilterState {
    /// Build the query bag sent to the backend. `dateRange` is always
    /// present; multi-selects go out as comma-joined lists only when
    /// non-empty; `region` only when narrowed; `pivotGroupBy` only for
    /// the pivot report. Band selectors stay client-side.
    pub fn query_params(&self, kind: Option<ReportKind>) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> =
            vec![("dateRange".into(), self.date_range.token().into())];
        if !self.agents.is_empty() {
            params.push(("agents".into(), self.agents.join(",")));
        }
        if !self.sources.is_empty() {
            params.push(("sources".into(), self.sources.join(",")));
        }
        if !self.statuses.is_empty() {
            params.push(("statuses".into(), self.statuses.join(",")));
        }
        if self.region != ALL {
            params.push(("region".into(), self.region.clone()));
        }
        if kind == Some(ReportKind::Pivot) {
            params.push(("pivotGroupBy".into(), self.pivot_group_by.token().into()));
        }
        params
    }
}

/// A filter state with its date window resolved once, ready to run
/// over any number of row sets.
pub struct FilterPipeline {
    state: FilterState,
    window: (NaiveDateTime, NaiveDateTime),
}

impl FilterPipeline {
    pub fn new(state: &FilterState, now: NaiveDateTime) -> Self {
        FilterPipeline { state: state.clone(), window: state.date_range.resolve(now) }
    }

    /// Keep the rows that pass every dimension in `dims`. Rows are
    /// never mutated or reordered, only dropped.
    pub fn apply(&self, rows: &[Value], dims: &[Dimension]) -> Vec<Value> {
        rows.iter().filter(|r| self.row_passes(r, dims)).cloned().collect()
    }

    fn row_passes(&self, row: &Value, dims: &[Dimension]) -> bool {
        dims.iter().all(|d| self.dimension_passes(row, *d))
    }

    fn dimension_passes(&self, row: &Value, dim: Dimension) -> bool {
        match dim {
            Dimension::Agents => member_passes(row, row::AGENT_KEYS, &self.state.agents),
            Dimension::Sources => member_passes(row, row::SOURCE_KEYS, &self.state.sources),
            Dimension::Statuses => member_passes(row, row::STATUS_KEYS, &self.state.statuses),
            Dimension::Region => single_passes(row, row::REGION_KEYS, &self.state.region),
            Dimension::DateWindow => match row.date_first(row::DATE_KEYS) {
                Some(d) => self.window.0 <= d && d <= self.window.1,
                // Rows that carry no usable date always pass.
                None => true,
            },
            Dimension::Confidence => band_passes(
                row,
                row::CONFIDENCE_KEYS,
                &bands::CONFIDENCE_BANDS,
                &self.state.confidence,
            ),
            Dimension::Score => {
                band_passes(row, row::SCORE_KEYS, &bands::SCORE_BANDS, &self.state.score)
            }
            Dimension::Conversion => band_passes(
                row,
                row::CONVERSION_KEYS,
                &bands::CONVERSION_BANDS,
                &self.state.conversion,
            ),
            Dimension::DuplicateSource => {
                nested_passes(row, row::SOURCE_KEYS, &self.state.duplicate_source)
            }
            Dimension::DuplicateStatus => {
                nested_passes(row, row::STATUS_KEYS, &self.state.duplicate_status)
            }
        }
    }
}

fn member_passes(row: &Value, keys: &[&str], selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    match row.str_first(keys) {
        Some(v) => selected.iter().any(|s| s == v),
        None => false,
    }
}

fn single_passes(row: &Value, keys: &[&str], selector: &str) -> bool {
    if selector == ALL {
        return true;
    }
    row.str_first(keys).map_or(false, |v| v == selector)
}

fn band_passes(row: &Value, keys: &[&str], table: &'static [BandSpec], selector: &str) -> bool {
    if selector == ALL {
        return true;
    }
    row.num_first(keys).map_or(false, |v| bands::band_matches(table, selector, v))
}

/// Existential match over a duplicate group's nested members.
fn nested_passes(row: &Value, keys: &[&str], selector: &str) -> bool {
    if selector == ALL {
        return true;
    }
    row.rows_first(row::MEMBER_KEYS)
        .iter()
        .any(|m| m.str_first(keys).map_or(false, |v| v == selector))
}
