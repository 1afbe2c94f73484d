//! Client-side pivot aggregation.
//!
//! The pivot tab fetches raw rows and regroups them locally so the
//! grouping selector never needs a refetch. Rows may be per-lead or
//! pre-aggregated; a row contributes its `leads` count when it has
//! one and counts as a single lead otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::row::{self, RowFields};
use crate::types::PivotGroupBy;

/// One aggregated pivot line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotEntry {
    pub group: String,
    pub leads: i64,
    pub premium: f64,
    pub converted: i64,
    pub conversion_rate: f64,
}

#[derive(Default)]
struct Acc {
    leads: i64,
    premium: f64,
    converted: i64,
}

/// Aggregate raw rows into pivot entries, sorted by group key.
pub fn pivot_rows(rows: &[Value], by: PivotGroupBy) -> Vec<PivotEntry> {
    let keys = match by {
        PivotGroupBy::Insurer => row::INSURER_KEYS,
        PivotGroupBy::Csc => row::CSC_KEYS,
        PivotGroupBy::Tenure => row::TENURE_KEYS,
    };

    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    for r in rows {
        let acc = groups.entry(group_key(r, keys)).or_default();
        acc.leads += row_leads(r);
        acc.premium += r.num_first(row::PREMIUM_KEYS).unwrap_or(0.0);
        acc.converted += row_converted(r);
    }

    groups
        .into_iter()
        .map(|(group, acc)| PivotEntry {
            group,
            leads: acc.leads,
            premium: acc.premium,
            converted: acc.converted,
            conversion_rate: if acc.leads > 0 {
                acc.converted as f64 / acc.leads as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Same aggregation, as loose rows for the export shaper.
pub fn pivot_values(rows: &[Value], by: PivotGroupBy) -> Vec<Value> {
    pivot_rows(rows, by)
        .iter()
        .filter_map(|e| serde_json::to_value(e).ok())
        .collect()
}

fn group_key(row: &Value, keys: &[&str]) -> String {
    if let Some(s) = row.str_first(keys) {
        return s.into();
    }
    // Tenure often arrives as a number of years.
    if let Some(n) = row.num_first(keys) {
        return if n.fract() == 0.0 { format!("{}", n as i64) } else { format!("{n}") };
    }
    "unspecified".into()
}

fn row_leads(row: &Value) -> i64 {
    row.num_first(&["leads", "count"]).map_or(1, |n| n.round() as i64)
}

fn row_converted(row: &Value) -> i64 {
    if let Some(n) = row.num_first(row::CONVERTED_KEYS) {
        return n.round() as i64;
    }
    if let Some(b) = row.bool_first(&["converted", "isConverted"]) {
        return i64::from(b);
    }
    let converted = row
        .str_first(row::STATUS_KEYS)
        .map_or(false, |s| s.eq_ignore_ascii_case("converted"));
    i64::from(converted)
}
