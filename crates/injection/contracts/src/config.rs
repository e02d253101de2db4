//! Builder configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ContractError, ContractResult};

/// Configuration for [`ContractsBuilder`](crate::ContractsBuilder).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Namespace segment inserted between the prefix and the batch identity
    /// of every synthesized type name.
    pub namespace_segment: String,
    /// Whether synthesized types carry rendered Rust source.
    pub emit_source: bool,
    /// Whether each collected property emits a debug record.
    pub trace_properties: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            namespace_segment: "InjectionContracts".to_string(),
            emit_source: false,
            trace_properties: true,
        }
    }
}

impl BuilderConfig {
    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ContractResult<Self> {
        let config: BuilderConfig =
            toml::from_str(text).map_err(|e| ContractError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> ContractResult<()> {
        let segment = self.namespace_segment.trim();
        if segment.is_empty() {
            return Err(ContractError::Configuration(
                "namespace_segment must not be empty".into(),
            ));
        }
        if segment.contains('.') {
            return Err(ContractError::Configuration(format!(
                "namespace_segment '{}' must be a single name segment",
                segment
            )));
        }
        Ok(())
    }
}
