use serde_json::{json, Value};

use leadmis_core::envelope::{decode_rows, extract_rows};
use leadmis_core::types::ReportKind;

// ── Lenient extraction ───────────────────────────────────────────────────────

/// A bare array payload is already the row set: same rows, same order.
#[test]
fn bare_array_passes_through_unchanged() {
    let payload = json!([{"agent": "Asha Rao"}, {"agent": "Vikram Shetty"}]);

    let rows = extract_rows(&payload);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["agent"], "Asha Rao");
    assert_eq!(rows[1]["agent"], "Vikram Shetty");
}

/// Every wrapper key unwraps to the nested array.
#[test]
fn wrapped_payloads_unwrap_by_key() {
    for key in ["results", "data", "groups"] {
        let payload = json!({ key: [{"id": 1}, {"id": 2}] });
        let rows = extract_rows(&payload);
        assert_eq!(rows.len(), 2, "payload wrapped in '{key}' must unwrap");
    }
}

/// With several candidate keys present, `results` wins over `data`,
/// which wins over `groups`.
#[test]
fn extraction_tries_keys_in_fixed_order() {
    let payload = json!({
        "results": [{"id": "r"}],
        "data": [{"id": "d"}],
        "groups": [{"id": "g"}],
    });
    assert_eq!(extract_rows(&payload)[0]["id"], "r");

    let payload = json!({ "data": [{"id": "d"}], "groups": [{"id": "g"}] });
    assert_eq!(extract_rows(&payload)[0]["id"], "d");
}

/// A wrapper key holding a non-array is skipped, not an error; the
/// chain moves on to the next key.
#[test]
fn non_array_wrapper_values_are_skipped() {
    let payload = json!({ "results": "not rows", "data": [{"id": "d"}] });
    assert_eq!(extract_rows(&payload)[0]["id"], "d");
}

/// Unrecognized shapes yield zero rows, never an error.
#[test]
fn unrecognized_shapes_yield_empty() {
    for payload in [
        Value::Null,
        json!("plain string"),
        json!(42),
        json!({ "message": "ok", "count": 3 }),
    ] {
        assert!(
            extract_rows(&payload).is_empty(),
            "expected no rows for payload {payload}"
        );
    }
}

/// Extraction applied to its own output is a no-op: a recovered row
/// array extracts to itself.
#[test]
fn extraction_is_idempotent() {
    let payload = json!({ "results": [{"id": 1}, {"id": 2}] });
    let first = extract_rows(&payload).to_vec();
    let rewrapped = Value::Array(first.clone());
    let again = extract_rows(&rewrapped);
    assert_eq!(again, first.as_slice());
}

// ── Typed decode ─────────────────────────────────────────────────────────────

/// A bare array is legal for every report kind.
#[test]
fn decode_accepts_bare_arrays_for_all_kinds() {
    let payload = json!([{"id": 1}]);
    for kind in ReportKind::ALL {
        let rows = decode_rows(kind, &payload);
        assert!(rows.is_ok(), "bare array rejected for {}", kind.name());
        assert_eq!(rows.unwrap().len(), 1);
    }
}

/// Each kind accepts its declared envelope and rejects the others.
#[test]
fn decode_enforces_declared_envelopes() {
    // agent_performance is declared as a `data` envelope.
    let ok = json!({ "data": [{"agent": "Asha"}] });
    assert!(decode_rows(ReportKind::AgentPerformance, &ok).is_ok());

    let wrong = json!({ "results": [{"agent": "Asha"}] });
    let err = decode_rows(ReportKind::AgentPerformance, &wrong).unwrap_err();
    assert_eq!(err.kind, "agent_performance");
    assert_eq!(err.expected, "data");
}

/// Duplicate analysis only accepts `groups` (or a bare array).
#[test]
fn duplicate_analysis_requires_groups_envelope() {
    let ok = json!({ "groups": [{"group": "G-1"}] });
    assert!(decode_rows(ReportKind::DuplicateAnalysis, &ok).is_ok());

    let wrong = json!({ "data": [{"group": "G-1"}] });
    let err = decode_rows(ReportKind::DuplicateAnalysis, &wrong).unwrap_err();
    assert_eq!(err.kind, "duplicate_analysis");
    assert_eq!(err.expected, "groups");
}

/// Decode errors name the shape they found, so a log line is enough
/// to diagnose a drifted endpoint. The lenient path degrades to empty
/// on the exact same payload.
#[test]
fn decode_errors_describe_the_payload() {
    let payload = json!({ "message": "ok", "status": 200 });
    let err = decode_rows(ReportKind::PolicyConversion, &payload).unwrap_err();

    let text = err.to_string();
    assert!(text.contains("policy_conversion"), "missing kind in: {text}");
    assert!(text.contains("results"), "missing expected envelope in: {text}");
    assert!(text.contains("message"), "missing found keys in: {text}");

    assert!(extract_rows(&payload).is_empty());
}
