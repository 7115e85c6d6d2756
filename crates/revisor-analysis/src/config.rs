//! Configuration for the analysis pipeline

use serde::{Deserialize, Serialize};

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum document characters embedded in a prompt. Longer documents
    /// are truncated before rendering; the generation capability is
    /// cost-bounded and the caller pays per token.
    pub max_document_chars: usize,

    /// Suppress discrepancies whose catalogued and suggested values name
    /// the same date in different formats. Off by default.
    pub suppress_equivalent_dates: bool,
}

impl AnalysisConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_document_chars == 0 {
            return Err("max_document_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("failed to serialize TOML: {}", e))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_document_chars: 20_000,
            suppress_equivalent_dates: false,
        }
    }
}
