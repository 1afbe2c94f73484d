use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use leadmis_core::catalog::spec_for;
use leadmis_core::error::MisError;
use leadmis_core::fetch::{DirSource, ReportBatch};
use leadmis_core::filter::FilterState;
use leadmis_core::session::MisSession;
use leadmis_core::types::ReportKind;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 12).unwrap().and_hms_opt(10, 0, 0).unwrap()
}

fn write_payload(dir: &Path, slug: &str, payload: &Value) {
    fs::write(dir.join(format!("{slug}.json")), serde_json::to_vec(payload).unwrap()).unwrap();
}

fn sample_rows(kind: ReportKind) -> Vec<Value> {
    match kind {
        ReportKind::AgentPerformance => {
            vec![json!({"agent": "Asha Rao", "score": 92.0}), json!({"agent": "Vikram Shetty"})]
        }
        ReportKind::DuplicateAnalysis => {
            vec![json!({"group": "G-1", "confidence": 96.0, "leads": [{"source": "online"}]})]
        }
        _ => vec![json!({"id": kind.name(), "leads": 3})],
    }
}

/// Write a complete payload set: stats plus all thirteen reports, each
/// wrapped in the envelope its kind declares.
fn seed_fixture_dir(dir: &Path) {
    write_payload(
        dir,
        "dashboard_stats",
        &json!({
            "totalLeads": 1248,
            "convertedLeads": 312,
            "conversionRate": 25.0,
            "totalPremium": 4800000.0,
            "activeAgents": 27,
            "pendingRenewals": 58,
        }),
    );
    for kind in ReportKind::ALL {
        let rows = sample_rows(kind);
        let payload = match spec_for(kind).envelope.key() {
            Some(key) => json!({ key: rows }),
            None => Value::Array(rows),
        };
        write_payload(dir, kind.name(), &payload);
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// A refresh fetches, decodes and applies a full batch.
#[test]
fn refresh_populates_the_view() {
    let tmp = tempfile::tempdir().unwrap();
    seed_fixture_dir(tmp.path());
    let source = DirSource::new(tmp.path());
    let mut session = MisSession::new(FilterState::default());

    session.refresh(&source, anchor()).expect("refresh must succeed");

    let view = session.view().expect("view must exist after refresh");
    assert_eq!(view.generation, 1);
    assert_eq!(view.stats.total_leads, 1248);
    assert_eq!(view.stats.conversion_rate, 25.0);
    assert_eq!(session.raw_rows(ReportKind::AgentPerformance).len(), 2);
    assert_eq!(session.raw_rows(ReportKind::DuplicateAnalysis).len(), 1);
}

/// Only the latest issued generation may apply. A batch that was
/// overtaken while in flight is discarded without touching the view.
#[test]
fn stale_batches_are_discarded() {
    let tmp = tempfile::tempdir().unwrap();
    seed_fixture_dir(tmp.path());
    let source = DirSource::new(tmp.path());
    let mut session = MisSession::new(FilterState::default());
    session.refresh(&source, anchor()).unwrap();

    // Two refreshes race: the older generation loses even if it
    // resolves last.
    let stale_gen = session.next_generation();
    let fresh_gen = session.next_generation();

    let stale = ReportBatch {
        generation: stale_gen,
        fetched_at: anchor(),
        stats: json!({"totalLeads": 999}),
        payloads: vec![(ReportKind::AgentPerformance, json!({"data": [{"agent": "Stale"}]}))],
    };
    let applied = session.apply(stale).expect("stale apply is not an error");
    assert!(!applied, "stale batch must report that it was discarded");

    let view = session.view().unwrap();
    assert_eq!(view.generation, 1, "view must still hold the applied generation");
    assert_eq!(view.stats.total_leads, 1248, "stale stats must not leak in");

    let fresh = ReportBatch {
        generation: fresh_gen,
        fetched_at: anchor(),
        stats: json!({"totalLeads": 2000}),
        payloads: vec![(ReportKind::AgentPerformance, json!({"data": [{"agent": "Fresh"}]}))],
    };
    let applied = session.apply(fresh).expect("fresh apply must succeed");
    assert!(applied);
    assert_eq!(session.view().unwrap().stats.total_leads, 2000);
}

/// One failing endpoint fails the whole batch: no partial view.
#[test]
fn batch_is_all_or_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    seed_fixture_dir(tmp.path());
    // Remove one report payload to simulate a failing endpoint.
    fs::remove_file(tmp.path().join("lost_reasons.json")).unwrap();

    let source = DirSource::new(tmp.path());
    let mut session = MisSession::new(FilterState::default());

    let err = session.refresh(&source, anchor()).expect_err("missing payload must fail");
    assert!(
        err.to_string().contains("lost_reasons"),
        "error must name the failing report, got: {err}"
    );
    assert!(session.view().is_none(), "no partial view may appear");

    // Once the endpoint recovers the next refresh goes through.
    write_payload(tmp.path(), "lost_reasons", &json!({"results": [{"reason": "price"}]}));
    session.refresh(&source, anchor()).expect("recovered refresh must succeed");
    assert_eq!(session.view().unwrap().generation, 2);
}

/// A payload in the wrong envelope fails decode and leaves the
/// previous view intact.
#[test]
fn decode_failure_keeps_previous_view() {
    let tmp = tempfile::tempdir().unwrap();
    seed_fixture_dir(tmp.path());
    let source = DirSource::new(tmp.path());
    let mut session = MisSession::new(FilterState::default());
    session.refresh(&source, anchor()).unwrap();

    // agent_performance declares a `data` envelope; serve `results`.
    write_payload(
        tmp.path(),
        "agent_performance",
        &json!({"results": [{"agent": "Drifted"}]}),
    );

    let err = session.refresh(&source, anchor()).expect_err("wrong envelope must fail");
    assert!(matches!(err, MisError::Decode(_)), "expected a decode error, got: {err}");

    let view = session.view().expect("previous view survives");
    assert_eq!(view.generation, 1);
    assert_eq!(view.section(ReportKind::AgentPerformance)[0]["agent"], "Asha Rao");
}

/// Changing client-side filters re-filters cached rows without a
/// refetch; the raw rows stay as fetched.
#[test]
fn set_filters_refilters_cached_rows() {
    let tmp = tempfile::tempdir().unwrap();
    seed_fixture_dir(tmp.path());
    let source = DirSource::new(tmp.path());
    let mut session = MisSession::new(FilterState::default());
    session.refresh(&source, anchor()).unwrap();

    assert_eq!(session.filtered_rows(ReportKind::AgentPerformance, anchor()).len(), 2);

    session.set_filters(FilterState {
        agents: vec!["Asha Rao".into()],
        ..FilterState::default()
    });
    let filtered = session.filtered_rows(ReportKind::AgentPerformance, anchor());
    assert_eq!(filtered.len(), 1, "narrowed agent filter applies to the cache");
    assert_eq!(filtered[0]["agent"], "Asha Rao");

    assert_eq!(
        session.raw_rows(ReportKind::AgentPerformance).len(),
        2,
        "raw rows must stay as fetched"
    );
    assert_eq!(session.view().unwrap().generation, 1, "no refetch happened");
}

/// The pivot section of the filtered view is aggregated, not raw.
#[test]
fn pivot_section_is_aggregated() {
    let tmp = tempfile::tempdir().unwrap();
    seed_fixture_dir(tmp.path());
    write_payload(
        tmp.path(),
        "pivot",
        &json!({"data": [
            {"insurer": "United India", "leads": 4, "premium": 10000.0},
            {"insurer": "United India", "leads": 6, "premium": 15000.0},
        ]}),
    );
    let source = DirSource::new(tmp.path());
    let mut session = MisSession::new(FilterState::default());
    session.refresh(&source, anchor()).unwrap();

    let rows = session.filtered_rows(ReportKind::Pivot, anchor());

    assert_eq!(rows.len(), 1, "two raw rows aggregate into one group");
    assert_eq!(rows[0]["group"], "United India");
    assert_eq!(rows[0]["leads"], 10);
    assert_eq!(rows[0]["premium"], 25000.0);
}
