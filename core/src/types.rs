//! Shared primitive types used across the entire reporting engine.

use serde::{Deserialize, Serialize};

/// A fetch-batch generation number. Strictly increasing per session;
/// only the latest issued generation may apply its results.
pub type Generation = u64;

/// Every row-bearing report the MIS dashboard fetches.
/// Variants are added per report tab, never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    AgentPerformance,
    PolicyConversion,
    DuplicateAnalysis,
    PreExpiryRenewals,
    CscProductivity,
    LostReasons,
    ConversionReport,
    Pivot,
    PremiumRegister,
    DailyMis,
    CscLoad,
    WorkloadDistribution,
    CapacityPlanning,
}

impl ReportKind {
    /// All report kinds, in dashboard section order. Fetch batches and
    /// export sections both walk this list.
    pub const ALL: [ReportKind; 13] = [
        ReportKind::AgentPerformance,
        ReportKind::PolicyConversion,
        ReportKind::DuplicateAnalysis,
        ReportKind::PreExpiryRenewals,
        ReportKind::CscProductivity,
        ReportKind::LostReasons,
        ReportKind::ConversionReport,
        ReportKind::Pivot,
        ReportKind::PremiumRegister,
        ReportKind::DailyMis,
        ReportKind::CscLoad,
        ReportKind::WorkloadDistribution,
        ReportKind::CapacityPlanning,
    ];

    /// Stable snake_case name. Used in logs, payload file names and
    /// decode errors.
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::AgentPerformance => "agent_performance",
            ReportKind::PolicyConversion => "policy_conversion",
            ReportKind::DuplicateAnalysis => "duplicate_analysis",
            ReportKind::PreExpiryRenewals => "pre_expiry_renewals",
            ReportKind::CscProductivity => "csc_productivity",
            ReportKind::LostReasons => "lost_reasons",
            ReportKind::ConversionReport => "conversion_report",
            ReportKind::Pivot => "pivot",
            ReportKind::PremiumRegister => "premium_register",
            ReportKind::DailyMis => "daily_mis",
            ReportKind::CscLoad => "csc_load",
            ReportKind::WorkloadDistribution => "workload_distribution",
            ReportKind::CapacityPlanning => "capacity_planning",
        }
    }
}

/// The grouping discriminator the pivot report accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotGroupBy {
    #[default]
    Insurer,
    Csc,
    Tenure,
}

impl PivotGroupBy {
    /// The wire token sent as the `pivotGroupBy` query parameter.
    pub fn token(self) -> &'static str {
        match self {
            PivotGroupBy::Insurer => "insurer",
            PivotGroupBy::Csc => "csc",
            PivotGroupBy::Tenure => "tenure",
        }
    }

    /// Parse a wire token. Unrecognized values fall back to `insurer`,
    /// the dashboard's default grouping.
    pub fn parse(token: &str) -> Self {
        match token {
            "csc" => PivotGroupBy::Csc,
            "tenure" => PivotGroupBy::Tenure,
            _ => PivotGroupBy::Insurer,
        }
    }
}
