//! Aggregate dashboard stats and the executive summary block.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::FilterState;
use crate::fmt;

/// Top-of-dashboard aggregates. Every field is optional on the wire;
/// anything missing renders as zero rather than failing the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_leads: i64,
    pub converted_leads: i64,
    pub conversion_rate: f64,
    pub total_premium: f64,
    pub active_agents: i64,
    pub pending_renewals: i64,
}

/// Decode the stats payload. The object may arrive bare or wrapped
/// under `data` / `results` / `stats`; malformed payloads decode as
/// all-zero stats with a warning, never as an error.
pub fn decode_stats(payload: &Value) -> DashboardStats {
    let inner = payload
        .get("data")
        .or_else(|| payload.get("results"))
        .or_else(|| payload.get("stats"));
    let obj = match inner {
        Some(v) if v.is_object() => v,
        _ => payload,
    };
    match serde_json::from_value(obj.clone()) {
        Ok(stats) => stats,
        Err(e) => {
            log::warn!("Dashboard stats did not decode cleanly: {e}");
            DashboardStats::default()
        }
    }
}

/// Label/value pairs for export covers and the CLI summary banner.
pub fn executive_summary(
    stats: &DashboardStats,
    filters: &FilterState,
    generated: NaiveDateTime,
) -> Vec<(String, String)> {
    vec![
        ("Report Period".into(), filters.date_range.label().into()),
        ("Generated".into(), fmt::date_time(generated)),
        ("Total Leads".into(), fmt::count(stats.total_leads as f64)),
        ("Converted Leads".into(), fmt::count(stats.converted_leads as f64)),
        ("Conversion Rate".into(), fmt::percent(stats.conversion_rate)),
        ("Total Premium".into(), fmt::currency(stats.total_premium)),
        ("Active Agents".into(), fmt::count(stats.active_agents as f64)),
        ("Pending Renewals".into(), fmt::count(stats.pending_renewals as f64)),
    ]
}
