//! Defensive accessors over loosely-typed report rows.
//!
//! RULE: Report rows have no shared shape. Every field read goes through
//! a first-of-keys lookup that tolerates missing fields, nulls and
//! numbers-as-strings. Consumers never index a row directly.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

// ── Canonical field-key chains ───────────────────────────────────────────────
//
// One chain per semantic field, tried in order. These mirror the UI's
// defensive `item.a || item.b` access and are the single place a new
// payload alias gets added.

pub const AGENT_KEYS: &[&str] = &["agent", "agentName", "assignedAgent", "assigned_agent"];
pub const SOURCE_KEYS: &[&str] = &["source", "leadSource", "lead_source"];
pub const STATUS_KEYS: &[&str] = &["status", "leadStatus", "lead_status"];
pub const DATE_KEYS: &[&str] = &["date", "createdAt", "created_at", "reportDate"];
pub const REGION_KEYS: &[&str] = &["region", "state", "zone"];
pub const CONFIDENCE_KEYS: &[&str] = &["confidence", "confidenceScore", "confidence_score"];
pub const SCORE_KEYS: &[&str] = &["score", "performanceScore", "performance_score"];
pub const CONVERSION_KEYS: &[&str] = &["conversionRate", "conversion_rate", "rate"];
pub const MEMBER_KEYS: &[&str] = &["leads", "members", "duplicates"];
pub const PREMIUM_KEYS: &[&str] = &["premium", "premiumAmount", "totalPremium"];
pub const CONVERTED_KEYS: &[&str] = &["converted", "conversions", "convertedLeads"];
pub const INSURER_KEYS: &[&str] = &["insurer", "insurerName", "company"];
pub const CSC_KEYS: &[&str] = &["csc", "cscName", "csc_name"];
pub const TENURE_KEYS: &[&str] = &["tenure", "policyTenure", "tenure_years"];

/// Date formats accepted for row `date` fields, tried in order after
/// RFC 3339. A value that matches none of them counts as missing.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%d/%m/%Y",
];

/// Field access on a loosely-typed report row.
///
/// Implemented for `serde_json::Value`; non-object rows answer `None`
/// for everything, so numeric or string rows flow through filters and
/// exporters without panicking.
pub trait RowFields {
    /// First string value found under any of `keys`.
    fn str_first(&self, keys: &[&str]) -> Option<&str>;

    /// First numeric value found under any of `keys`. Accepts JSON
    /// numbers and numeric strings (`"95.5"`).
    fn num_first(&self, keys: &[&str]) -> Option<f64>;

    /// First parseable date value found under any of `keys`.
    fn date_first(&self, keys: &[&str]) -> Option<NaiveDateTime>;

    /// First nested row array found under any of `keys`. Missing or
    /// non-array values yield the empty slice.
    fn rows_first(&self, keys: &[&str]) -> &[Value];

    /// First boolean value found under any of `keys`. Accepts JSON
    /// booleans and the strings `"true"` / `"false"`.
    fn bool_first(&self, keys: &[&str]) -> Option<bool>;
}

impl RowFields for Value {
    fn str_first(&self, keys: &[&str]) -> Option<&str> {
        let obj = self.as_object()?;
        keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str))
    }

    fn num_first(&self, keys: &[&str]) -> Option<f64> {
        let obj = self.as_object()?;
        keys.iter().find_map(|k| obj.get(*k).and_then(value_as_f64))
    }

    fn date_first(&self, keys: &[&str]) -> Option<NaiveDateTime> {
        let obj = self.as_object()?;
        keys.iter().find_map(|k| obj.get(*k).and_then(value_as_date))
    }

    fn rows_first(&self, keys: &[&str]) -> &[Value] {
        const EMPTY: &[Value] = &[];
        let Some(obj) = self.as_object() else {
            return EMPTY;
        };
        keys.iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(EMPTY)
    }

    fn bool_first(&self, keys: &[&str]) -> Option<bool> {
        let obj = self.as_object()?;
        keys.iter().find_map(|k| {
            let v = obj.get(*k)?;
            v.as_bool().or_else(|| match v.as_str() {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            })
        })
    }
}

fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a row date value. Strings go through RFC 3339 first, then the
/// known wall-clock formats; numbers are epoch milliseconds.
fn value_as_date(v: &Value) -> Option<NaiveDateTime> {
    match v {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0).unwrap_or_default());
        }
    }
    log::debug!("unparseable date value ignored: {s:?}");
    None
}
