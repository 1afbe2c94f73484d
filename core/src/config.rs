//! Runner configuration.

use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::fetch::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MisConfig {
    /// API base URL, e.g. "https://crm.example.in/api".
    pub base_url: String,
    pub timeout_secs: u64,
    /// Directory export artifacts are written into.
    pub export_dir: String,
    pub default_date_range: DateRange,
}

impl Default for MisConfig {
    fn default() -> Self {
        MisConfig {
            base_url: "http://localhost:3000/api".into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_dir: ".".into(),
            default_date_range: DateRange::default(),
        }
    }
}

impl MisConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    /// In tests, use MisConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: MisConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
