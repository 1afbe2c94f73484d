use serde_json::json;

use leadmis_core::pivot::pivot_rows;
use leadmis_core::types::PivotGroupBy;

// ── Tests ────────────────────────────────────────────────────────────────────

/// Grouping by insurer sums leads, premium and conversions per group,
/// sorted by group key.
#[test]
fn insurer_grouping_aggregates_rows() {
    let rows = vec![
        json!({"insurer": "United India", "leads": 10, "premium": 50000.0, "converted": 4}),
        json!({"insurer": "Bajaj Allianz", "leads": 6, "premium": 30000.0, "converted": 3}),
        json!({"insurer": "United India", "leads": 5, "premium": 20000.0, "converted": 1}),
    ];

    let entries = pivot_rows(&rows, PivotGroupBy::Insurer);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].group, "Bajaj Allianz", "groups must be sorted");
    assert_eq!(entries[1].group, "United India");

    let united = &entries[1];
    assert_eq!(united.leads, 15);
    assert_eq!(united.premium, 70000.0);
    assert_eq!(united.converted, 5);
    assert!(
        (united.conversion_rate - 33.333).abs() < 0.01,
        "5/15 leads is 33.3%, got {}",
        united.conversion_rate
    );
}

/// Per-lead rows with no `leads` count each count as one lead, and a
/// converted status marks the row converted.
#[test]
fn per_lead_rows_count_as_one() {
    let rows = vec![
        json!({"insurer": "HDFC Ergo", "status": "Converted", "premium": 12000.0}),
        json!({"insurer": "HDFC Ergo", "status": "Lost"}),
        json!({"insurer": "HDFC Ergo", "converted": true}),
    ];

    let entries = pivot_rows(&rows, PivotGroupBy::Insurer);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].leads, 3);
    assert_eq!(entries[0].converted, 2, "one status match plus one boolean flag");
    assert_eq!(entries[0].premium, 12000.0);
}

/// Rows with no group key collect under "unspecified".
#[test]
fn missing_group_key_buckets_as_unspecified() {
    let rows = vec![
        json!({"insurer": "United India", "leads": 2}),
        json!({"leads": 7}),
    ];

    let entries = pivot_rows(&rows, PivotGroupBy::Insurer);

    let unspecified = entries.iter().find(|e| e.group == "unspecified");
    assert!(unspecified.is_some(), "ungrouped rows must still aggregate");
    assert_eq!(unspecified.unwrap().leads, 7);
}

/// Switching the discriminator regroups the same rows.
#[test]
fn group_by_switches_discriminator() {
    let rows = vec![
        json!({"insurer": "United India", "csc": "Hubli", "tenure": 1, "leads": 3}),
        json!({"insurer": "United India", "csc": "Mysuru", "tenure": 1, "leads": 2}),
    ];

    let by_insurer = pivot_rows(&rows, PivotGroupBy::Insurer);
    assert_eq!(by_insurer.len(), 1, "one insurer");

    let by_csc = pivot_rows(&rows, PivotGroupBy::Csc);
    assert_eq!(by_csc.len(), 2, "two CSCs");

    let by_tenure = pivot_rows(&rows, PivotGroupBy::Tenure);
    assert_eq!(by_tenure.len(), 1, "one tenure bucket");
    assert_eq!(by_tenure[0].group, "1", "numeric tenure becomes the group label");
    assert_eq!(by_tenure[0].leads, 5);
}

/// Zero-lead groups report a zero rate instead of dividing by zero.
#[test]
fn zero_leads_yield_zero_rate() {
    let rows = vec![json!({"insurer": "Oriental", "leads": 0, "converted": 0})];

    let entries = pivot_rows(&rows, PivotGroupBy::Insurer);

    assert_eq!(entries[0].conversion_rate, 0.0);
}
