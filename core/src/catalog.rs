//! Static catalog of every dashboard report.
//!
//! One `ReportSpec` per tab, declaring:
//!   1. the API path the report is fetched from,
//!   2. the envelope its payload must arrive in,
//!   3. which filter dimensions apply to its rows,
//!   4. the column layout its export sections use.
//!
//! The fetch layer, filter pipeline and exporters all read this table
//! instead of matching on `ReportKind` themselves. Adding a report tab
//! means adding one entry here (and one `ReportKind` variant).

use crate::envelope::Envelope;
use crate::row;
use crate::types::ReportKind;

/// Path of the aggregate stats endpoint, relative to the API base.
pub const STATS_PATH: &str = "reports/dashboard-stats";

/// A client-side filter dimension. Each report declares the subset
/// that applies to its rows; the pipeline evaluates only those.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Agents,
    Sources,
    Statuses,
    DateWindow,
    Region,
    Confidence,
    Score,
    Conversion,
    DuplicateSource,
    DuplicateStatus,
}

/// How an export cell renders the value found under a column's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    Text,
    Count,
    Number,
    Currency,
    Percent,
    Date,
    /// Count of the nested member array (duplicate groups).
    Members,
    /// Confidence band label for the numeric value.
    ConfidenceBand,
    /// Performance band label for the numeric value.
    ScoreBand,
}

/// One export column: header, the key chain looked up on each row, and
/// the cell format.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub keys: &'static [&'static str],
    pub format: CellFormat,
}

const fn col(
    header: &'static str,
    keys: &'static [&'static str],
    format: CellFormat,
) -> ColumnSpec {
    ColumnSpec { header, keys, format }
}

#[derive(Debug, Clone, Copy)]
pub struct ReportSpec {
    pub kind: ReportKind,
    /// Fetch path relative to the API base URL.
    pub path: &'static str,
    /// Section heading in exports and the CLI summary.
    pub title: &'static str,
    /// Worksheet name. RULE: 31 chars max (xlsx limit).
    pub sheet: &'static str,
    pub envelope: Envelope,
    pub dimensions: &'static [Dimension],
    pub columns: &'static [ColumnSpec],
}

/// Catalog entries in `ReportKind::ALL` order. `spec_for` indexes by
/// discriminant, so the order is load-bearing (checked by test).
pub const CATALOG: [ReportSpec; 13] = [
    ReportSpec {
        kind: ReportKind::AgentPerformance,
        path: "reports/agent-performance",
        title: "Agent Performance",
        sheet: "Agent Performance",
        envelope: Envelope::Data,
        dimensions: &[
            Dimension::Agents,
            Dimension::DateWindow,
            Dimension::Score,
            Dimension::Conversion,
        ],
        columns: &[
            col("Agent", row::AGENT_KEYS, CellFormat::Text),
            col("Leads Assigned", &["leadsAssigned", "leads_assigned", "totalLeads"], CellFormat::Count),
            col("Converted", row::CONVERTED_KEYS, CellFormat::Count),
            col("Conversion Rate", row::CONVERSION_KEYS, CellFormat::Percent),
            col("Score", row::SCORE_KEYS, CellFormat::Number),
            col("Rating", row::SCORE_KEYS, CellFormat::ScoreBand),
        ],
    },
    ReportSpec {
        kind: ReportKind::PolicyConversion,
        path: "reports/policy-conversion",
        title: "Policy Conversion",
        sheet: "Policy Conversion",
        envelope: Envelope::Results,
        dimensions: &[
            Dimension::Sources,
            Dimension::Statuses,
            Dimension::DateWindow,
            Dimension::Region,
            Dimension::Conversion,
        ],
        columns: &[
            col("Source", row::SOURCE_KEYS, CellFormat::Text),
            col("Region", row::REGION_KEYS, CellFormat::Text),
            col("Status", row::STATUS_KEYS, CellFormat::Text),
            col("Leads", &["leads", "count", "totalLeads"], CellFormat::Count),
            col("Converted", row::CONVERTED_KEYS, CellFormat::Count),
            col("Conversion Rate", row::CONVERSION_KEYS, CellFormat::Percent),
            col("Premium", row::PREMIUM_KEYS, CellFormat::Currency),
        ],
    },
    ReportSpec {
        kind: ReportKind::DuplicateAnalysis,
        path: "reports/duplicate-analysis",
        title: "Duplicate Analysis",
        sheet: "Duplicate Analysis",
        envelope: Envelope::Groups,
        dimensions: &[
            Dimension::Confidence,
            Dimension::DuplicateSource,
            Dimension::DuplicateStatus,
            Dimension::DateWindow,
        ],
        columns: &[
            col("Group", &["group", "groupId", "group_id"], CellFormat::Text),
            col("Matched Field", &["matchedField", "matched_field", "field"], CellFormat::Text),
            col("Members", row::MEMBER_KEYS, CellFormat::Members),
            col("Confidence", row::CONFIDENCE_KEYS, CellFormat::Percent),
            col("Band", row::CONFIDENCE_KEYS, CellFormat::ConfidenceBand),
            col("Detected", row::DATE_KEYS, CellFormat::Date),
        ],
    },
    ReportSpec {
        kind: ReportKind::PreExpiryRenewals,
        path: "reports/pre-expiry-renewals",
        title: "Pre-Expiry Renewals",
        sheet: "Pre-Expiry Renewals",
        envelope: Envelope::Results,
        dimensions: &[
            Dimension::Agents,
            Dimension::Statuses,
            Dimension::DateWindow,
            Dimension::Region,
        ],
        columns: &[
            col("Policy No", &["policyNo", "policy_no", "policyNumber"], CellFormat::Text),
            col("Customer", &["customer", "customerName", "customer_name"], CellFormat::Text),
            col("Agent", row::AGENT_KEYS, CellFormat::Text),
            col("Expiry Date", &["expiryDate", "expiry_date", "renewalDate"], CellFormat::Date),
            col("Premium", row::PREMIUM_KEYS, CellFormat::Currency),
            col("Status", row::STATUS_KEYS, CellFormat::Text),
        ],
    },
    ReportSpec {
        kind: ReportKind::CscProductivity,
        path: "reports/csc-productivity",
        title: "CSC Productivity",
        sheet: "CSC Productivity",
        envelope: Envelope::Data,
        dimensions: &[Dimension::DateWindow, Dimension::Region, Dimension::Conversion],
        columns: &[
            col("CSC", row::CSC_KEYS, CellFormat::Text),
            col("Region", row::REGION_KEYS, CellFormat::Text),
            col("Leads Handled", &["leadsHandled", "leads_handled", "leads"], CellFormat::Count),
            col("Converted", row::CONVERTED_KEYS, CellFormat::Count),
            col("Conversion Rate", row::CONVERSION_KEYS, CellFormat::Percent),
        ],
    },
    ReportSpec {
        kind: ReportKind::LostReasons,
        path: "reports/lost-reasons",
        title: "Lost Reasons",
        sheet: "Lost Reasons",
        envelope: Envelope::Results,
        dimensions: &[Dimension::Sources, Dimension::DateWindow, Dimension::Region],
        columns: &[
            col("Reason", &["reason", "lostReason", "lost_reason"], CellFormat::Text),
            col("Source", row::SOURCE_KEYS, CellFormat::Text),
            col("Count", &["count", "leads", "total"], CellFormat::Count),
            col("Share", &["share", "percentage", "pct"], CellFormat::Percent),
        ],
    },
    ReportSpec {
        kind: ReportKind::ConversionReport,
        path: "reports/conversion-report",
        title: "Conversion Report",
        sheet: "Conversion Report",
        envelope: Envelope::Data,
        dimensions: &[
            Dimension::Agents,
            Dimension::Sources,
            Dimension::DateWindow,
            Dimension::Conversion,
        ],
        columns: &[
            col("Period", &["period", "bucket", "month"], CellFormat::Text),
            col("Source", row::SOURCE_KEYS, CellFormat::Text),
            col("Leads", &["leads", "totalLeads", "count"], CellFormat::Count),
            col("Converted", row::CONVERTED_KEYS, CellFormat::Count),
            col("Conversion Rate", row::CONVERSION_KEYS, CellFormat::Percent),
        ],
    },
    ReportSpec {
        kind: ReportKind::Pivot,
        path: "reports/pivot",
        title: "Pivot View",
        sheet: "Pivot",
        envelope: Envelope::Data,
        dimensions: &[Dimension::DateWindow],
        // Columns describe the aggregated pivot entries, not raw rows.
        columns: &[
            col("Group", &["group"], CellFormat::Text),
            col("Leads", &["leads"], CellFormat::Count),
            col("Premium", &["premium"], CellFormat::Currency),
            col("Converted", &["converted"], CellFormat::Count),
            col("Conversion Rate", &["conversionRate"], CellFormat::Percent),
        ],
    },
    ReportSpec {
        kind: ReportKind::PremiumRegister,
        path: "reports/premium-register",
        title: "Premium Register",
        sheet: "Premium Register",
        envelope: Envelope::Results,
        dimensions: &[
            Dimension::Agents,
            Dimension::Sources,
            Dimension::Statuses,
            Dimension::DateWindow,
            Dimension::Region,
        ],
        columns: &[
            col("Policy No", &["policyNo", "policy_no", "policyNumber"], CellFormat::Text),
            col("Customer", &["customer", "customerName", "customer_name"], CellFormat::Text),
            col("Insurer", row::INSURER_KEYS, CellFormat::Text),
            col("Agent", row::AGENT_KEYS, CellFormat::Text),
            col("Issue Date", row::DATE_KEYS, CellFormat::Date),
            col("Premium", row::PREMIUM_KEYS, CellFormat::Currency),
        ],
    },
    ReportSpec {
        kind: ReportKind::DailyMis,
        path: "reports/daily-mis",
        title: "Daily MIS",
        sheet: "Daily MIS",
        envelope: Envelope::Data,
        dimensions: &[Dimension::DateWindow, Dimension::Region],
        columns: &[
            col("Date", row::DATE_KEYS, CellFormat::Date),
            col("New Leads", &["newLeads", "new_leads", "leads"], CellFormat::Count),
            col("Follow-ups", &["followUps", "follow_ups", "followups"], CellFormat::Count),
            col("Converted", row::CONVERTED_KEYS, CellFormat::Count),
            col("Premium", row::PREMIUM_KEYS, CellFormat::Currency),
        ],
    },
    ReportSpec {
        kind: ReportKind::CscLoad,
        path: "reports/csc-load",
        title: "CSC Load",
        sheet: "CSC Load",
        envelope: Envelope::Data,
        dimensions: &[Dimension::DateWindow, Dimension::Region],
        columns: &[
            col("CSC", row::CSC_KEYS, CellFormat::Text),
            col("Open Leads", &["openLeads", "open_leads", "open"], CellFormat::Count),
            col("In Progress", &["inProgress", "in_progress"], CellFormat::Count),
            col("Closed", &["closed", "closedLeads"], CellFormat::Count),
            col("Load Factor", &["loadFactor", "load_factor"], CellFormat::Number),
        ],
    },
    ReportSpec {
        kind: ReportKind::WorkloadDistribution,
        path: "reports/workload-distribution",
        title: "Workload Distribution",
        sheet: "Workload Distribution",
        envelope: Envelope::Data,
        dimensions: &[Dimension::Agents, Dimension::DateWindow],
        columns: &[
            col("Agent", row::AGENT_KEYS, CellFormat::Text),
            col("Assigned", &["assigned", "assignedLeads", "leadsAssigned"], CellFormat::Count),
            col("Completed", &["completed", "completedLeads"], CellFormat::Count),
            col("Pending", &["pending", "pendingLeads"], CellFormat::Count),
            col("Utilization", &["utilization", "utilizationRate"], CellFormat::Percent),
        ],
    },
    ReportSpec {
        kind: ReportKind::CapacityPlanning,
        path: "reports/capacity-planning",
        title: "Capacity Planning",
        sheet: "Capacity Planning",
        envelope: Envelope::Data,
        dimensions: &[Dimension::DateWindow, Dimension::Region],
        columns: &[
            col("Team", &["team", "teamName", "unit"], CellFormat::Text),
            col("Headcount", &["headcount", "agents", "staff"], CellFormat::Count),
            col("Capacity", &["capacity", "maxLeads"], CellFormat::Count),
            col("Projected Leads", &["projectedLeads", "projected_leads", "forecast"], CellFormat::Count),
            col("Gap", &["gap", "shortfall"], CellFormat::Number),
        ],
    },
];

/// Look up the spec for a report kind.
pub fn spec_for(kind: ReportKind) -> &'static ReportSpec {
    // CATALOG is kept in ReportKind::ALL order.
    &CATALOG[kind as usize]
}
