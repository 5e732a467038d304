//! Gate configuration

use std::path::Path;

use serde::Deserialize;

use crate::error::OutputError;
use crate::output::TRACEBACK_LIMIT;
use crate::validator::ValidatorKind;

/// Output gate configuration
///
/// ```yaml
/// validator: custom      # custom | draft4 | draft7 | draft2020-12
/// traceback_limit: 20
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Validation backend flavor
    #[serde(default)]
    pub validator: ValidatorKind,

    /// Frames kept in the `traceback` of internal failures
    #[serde(default = "default_traceback_limit")]
    pub traceback_limit: usize,
}

fn default_traceback_limit() -> usize {
    TRACEBACK_LIMIT
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            validator: ValidatorKind::default(),
            traceback_limit: TRACEBACK_LIMIT,
        }
    }
}

impl GateConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, OutputError> {
        // An empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, OutputError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_custom_with_twenty_frames() {
        let config = GateConfig::default();
        assert_eq!(config.validator, ValidatorKind::Custom);
        assert_eq!(config.traceback_limit, 20);
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
            validator: draft7
            traceback_limit: 5
        "#;
        let config = GateConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.validator, ValidatorKind::Draft7);
        assert_eq!(config.traceback_limit, 5);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = GateConfig::from_yaml("validator: draft4").unwrap();
        assert_eq!(config.traceback_limit, TRACEBACK_LIMIT);

        assert_eq!(GateConfig::from_yaml("").unwrap(), GateConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = GateConfig::from_yaml("mask: '###'").unwrap_err();
        assert!(matches!(err, OutputError::YamlParse(_)));
    }

    #[test]
    fn unknown_validator_is_rejected() {
        assert!(GateConfig::from_yaml("validator: draft3").is_err());
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outgate.yaml");
        std::fs::write(&path, "traceback_limit: 3\n").unwrap();

        let config = GateConfig::from_file(&path).unwrap();
        assert_eq!(config.traceback_limit, 3);
        assert_eq!(config.validator, ValidatorKind::Custom);
    }
}
