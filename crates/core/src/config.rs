use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::FunctionName;
use crate::report::LookupMode;

/// Serializable settings for a comparison run.
///
/// Every field is optional in the JSON form; missing fields take the defaults
/// below. CLI flags are applied on top of a loaded config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Library or suite name shown in the banner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short name of the harness that produced report A.
    pub label_a: String,
    /// Short name of the harness that produced report B.
    pub label_b: String,
    pub lookup: LookupMode,
    /// If non-empty, only these functions are compared.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: None,
            label_a: "A".to_string(),
            label_b: "B".to_string(),
            lookup: LookupMode::default(),
            only: Vec::new(),
        }
    }
}

impl ReportConfig {
    /// Whether `function` passes the `only` filter.
    pub fn selects(&self, function: &FunctionName) -> bool {
        self.only.is_empty() || self.only.iter().any(|name| FunctionName::new(name) == *function)
    }
}

/// Load a report config JSON file.
pub fn load_report_config(path: &Path) -> Result<ReportConfig> {
    let config_json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report config at {}", path.display()))?;
    let config: ReportConfig =
        serde_json::from_str(&config_json).context("Failed to parse report config JSON")?;
    Ok(config)
}
