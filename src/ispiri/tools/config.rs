use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ispiri::tools::error::Result;

/// Row index (0-based, below the structural label row) holding the report's column headers.
pub const DEFAULT_HEADER_ROW: usize = 9;
/// Sheets copied through without reconciliation.
pub const DEFAULT_PASSTHROUGH_SHEETS: [&str; 2] = ["Doc info", "Summary"];
/// Title written into the first structural column label of every output sheet.
pub const DEFAULT_TITLE: &str = "Information Security Performance Indicator Reporting (ISPIRI)";

/// Which target column wins when a header label occurs more than once in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateLabelPolicy {
    /// The leftmost occurrence is used.
    #[default]
    First,
    /// The rightmost occurrence is used.
    Last,
}

/// Tunables for a standardization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizeConfig {
    pub header_row: usize,
    pub passthrough_sheets: Vec<String>,
    pub title: String,
    pub duplicate_labels: DuplicateLabelPolicy,
    /// Match headers after dropping `.N` duplicate suffixes.
    pub strip_label_suffixes: bool,
}

impl Default for StandardizeConfig {
    fn default() -> Self {
        Self {
            header_row: DEFAULT_HEADER_ROW,
            passthrough_sheets: DEFAULT_PASSTHROUGH_SHEETS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            title: DEFAULT_TITLE.to_string(),
            duplicate_labels: DuplicateLabelPolicy::default(),
            strip_label_suffixes: false,
        }
    }
}

impl StandardizeConfig {
    /// Loads a configuration from a JSON file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn is_passthrough(&self, sheet_name: &str) -> bool {
        self.passthrough_sheets.iter().any(|name| name == sheet_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: StandardizeConfig =
            serde_json::from_str(r#"{"header_row": 4, "duplicate_labels": "last"}"#)
                .expect("config parsed");

        assert_eq!(config.header_row, 4);
        assert_eq!(config.duplicate_labels, DuplicateLabelPolicy::Last);
        assert_eq!(config.title, DEFAULT_TITLE);
        assert!(config.is_passthrough("Doc info"));
        assert!(config.is_passthrough("Summary"));
        assert!(!config.is_passthrough("summary"));
    }
}
