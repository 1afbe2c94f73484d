//! Response envelope handling: turning heterogeneous report payloads
//! into row arrays.
//!
//! Backends wrap report rows inconsistently: some endpoints return a
//! bare array, others `{results: []}`, `{data: []}` or (duplicate
//! analysis only) `{groups: []}`. Two paths exist:
//!   1. `extract_rows`, the lenient chain. Never fails; unrecognized
//!      shapes degrade to an empty slice. Kept for parity with the
//!      dashboard, whose consumers never expect an error here.
//!   2. `decode_rows`, the typed path. Each report kind declares its
//!      envelope once in the catalog; anything else is a `DecodeError`
//!      naming the kind and the shape it expected.

use crate::{catalog, error::DecodeError, types::ReportKind};
use serde_json::Value;

/// The JSON wrapper shape a report endpoint uses around its row array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// The payload is the row array itself.
    Bare,
    /// Rows live under `"results"`.
    Results,
    /// Rows live under `"data"`.
    Data,
    /// Rows live under `"groups"` (duplicate analysis).
    Groups,
}

impl Envelope {
    /// The wrapper key, or `None` for a bare array.
    pub fn key(self) -> Option<&'static str> {
        match self {
            Envelope::Bare => None,
            Envelope::Results => Some("results"),
            Envelope::Data => Some("data"),
            Envelope::Groups => Some("groups"),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Envelope::Bare => "bare array",
            Envelope::Results => "results",
            Envelope::Data => "data",
            Envelope::Groups => "groups",
        }
    }
}

/// Extract the semantic row array from an arbitrary payload.
///
/// The chain, in order: a bare array is returned as-is; otherwise the
/// first of `results` / `data` / `groups` holding an array wins;
/// otherwise the payload yields no rows. Never errors.
pub fn extract_rows(payload: &Value) -> &[Value] {
    const EMPTY: &[Value] = &[];

    if let Some(rows) = payload.as_array() {
        return rows;
    }
    for key in ["results", "data", "groups"] {
        if let Some(rows) = payload.get(key).and_then(Value::as_array) {
            return rows;
        }
    }
    EMPTY
}

/// Decode a payload against the envelope its report kind declares.
///
/// A bare array is always accepted (every endpoint may legally return
/// one); otherwise only the declared wrapper key is consulted. Payloads
/// matching neither raise a `DecodeError`.
pub fn decode_rows(kind: ReportKind, payload: &Value) -> Result<Vec<Value>, DecodeError> {
    let envelope = catalog::spec_for(kind).envelope;

    if let Some(rows) = payload.as_array() {
        return Ok(rows.clone());
    }
    if let Some(key) = envelope.key() {
        if let Some(rows) = payload.get(key).and_then(Value::as_array) {
            return Ok(rows.clone());
        }
    }

    Err(DecodeError {
        kind: kind.name(),
        expected: envelope.describe(),
        found: describe_value(payload),
    })
}

/// A short human-readable tag for a JSON value, used in decode errors.
pub fn describe_value(v: &Value) -> String {
    match v {
        Value::Null => "null".into(),
        Value::Bool(_) => "boolean".into(),
        Value::Number(_) => "number".into(),
        Value::String(_) => "string".into(),
        Value::Array(_) => "array".into(),
        Value::Object(map) => {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            format!("object with keys [{}]", keys.join(", "))
        }
    }
}
