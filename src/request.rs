//! Check requests (CLI input documents)
//!
//! A check request bundles everything `validate_output` needs. YAML or JSON:
//!
//! ```yaml
//! runner_schema:
//!   succeeded: {type: boolean}
//!   result: {type: object}
//! action_schema:
//!   token: {type: string, secret: true}
//! output_key: result
//! status: succeeded
//! result:
//!   succeeded: true
//!   result: {token: abc}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::OutputError;
use crate::output::OutputGate;
use crate::status::ActionStatus;
use crate::validator::SchemaValidator;

fn default_output_key() -> String {
    "result".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckRequest {
    #[serde(default)]
    pub runner_schema: Option<Map<String, Value>>,

    #[serde(default)]
    pub action_schema: Option<Map<String, Value>>,

    pub result: Value,

    #[serde(default)]
    pub status: ActionStatus,

    #[serde(default = "default_output_key")]
    pub output_key: String,
}

/// Outcome of a check, as printed by the CLI
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckReport {
    pub result: Value,
    pub status: ActionStatus,
}

impl CheckRequest {
    /// Parse a request (YAML is a superset of JSON, both are accepted)
    pub fn from_yaml(yaml: &str) -> Result<Self, OutputError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, OutputError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn run<V: SchemaValidator>(self, gate: &OutputGate<V>) -> CheckReport {
        let (result, status) = gate.validate_output(
            self.runner_schema.as_ref(),
            self.action_schema.as_ref(),
            self.result,
            self.status,
            &self.output_key,
        );
        CheckReport { result, status }
    }
}
