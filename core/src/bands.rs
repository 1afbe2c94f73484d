//! Threshold bands shared by the filter pipeline and the exporters.
//!
//! Each band is half-open `[min, max)`. A missing bound is unbounded on
//! that side. The tables below are the single source of truth: filter
//! matching and export cell labelling both read them, so the boundaries
//! cannot drift apart.

/// One labelled numeric band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSpec {
    /// Wire token used by the filter selectors ("high", "medium", ...).
    pub id: &'static str,
    /// Human label used in export cells.
    pub label: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl BandSpec {
    pub fn contains(&self, v: f64) -> bool {
        if let Some(min) = self.min {
            if v < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if v >= max {
                return false;
            }
        }
        true
    }
}

/// Duplicate-detection confidence. RULE: 95 is high, 90 is medium.
pub const CONFIDENCE_BANDS: [BandSpec; 3] = [
    BandSpec { id: "high", label: "High (>=95%)", min: Some(95.0), max: None },
    BandSpec { id: "medium", label: "Medium (90-95%)", min: Some(90.0), max: Some(95.0) },
    BandSpec { id: "low", label: "Low (<90%)", min: None, max: Some(90.0) },
];

/// Agent performance score.
pub const SCORE_BANDS: [BandSpec; 4] = [
    BandSpec { id: "excellent", label: "Excellent (90+)", min: Some(90.0), max: None },
    BandSpec { id: "good", label: "Good (80-90)", min: Some(80.0), max: Some(90.0) },
    BandSpec { id: "average", label: "Average (70-80)", min: Some(70.0), max: Some(80.0) },
    BandSpec { id: "poor", label: "Poor (<70)", min: None, max: Some(70.0) },
];

/// Conversion-rate percentage.
pub const CONVERSION_BANDS: [BandSpec; 4] = [
    BandSpec { id: "high", label: "High (75%+)", min: Some(75.0), max: None },
    BandSpec { id: "medium", label: "Medium (50-75%)", min: Some(50.0), max: Some(75.0) },
    BandSpec { id: "low", label: "Low (25-50%)", min: Some(25.0), max: Some(50.0) },
    BandSpec { id: "poor", label: "Poor (<25%)", min: None, max: Some(25.0) },
];

/// Classify a value against a band table. Tables cover the whole number
/// line, so the fallback arm is unreachable for the consts above.
pub fn classify(bands: &'static [BandSpec], v: f64) -> &'static BandSpec {
    bands.iter().find(|b| b.contains(v)).unwrap_or(&bands[bands.len() - 1])
}

/// Does `v` satisfy the selector token? "all" matches everything; an
/// unknown token matches nothing (the UI only offers known ids).
pub fn band_matches(bands: &'static [BandSpec], selector: &str, v: f64) -> bool {
    if selector == "all" {
        return true;
    }
    bands.iter().any(|b| b.id == selector && b.contains(v))
}
