//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum OutputError {
    // ─────────────────────────────────────────────────────────────
    // Validation errors (OUTGATE-011)
    // ─────────────────────────────────────────────────────────────
    /// Validator text, reported verbatim in diagnostics
    #[error("{details}")]
    SchemaMismatch { details: String },

    #[error("OUTGATE-011: Invalid schema: {details}")]
    InvalidSchema { details: String },

    // ─────────────────────────────────────────────────────────────
    // Result shape errors (OUTGATE-020 to OUTGATE-022)
    // ─────────────────────────────────────────────────────────────
    #[error("OUTGATE-020: Output key '{key}' not found in result")]
    OutputKeyMissing { key: String },

    #[error("OUTGATE-021: Result must be an object, got {found}")]
    ResultNotObject { found: String },

    #[error("OUTGATE-022: Cannot mask '{property}': result['{key}'] is {found}, not an object")]
    SubResultNotObject {
        key: String,
        property: String,
        found: String,
    },

    // ─────────────────────────────────────────────────────────────
    // Action schema shape errors (OUTGATE-030)
    // ─────────────────────────────────────────────────────────────
    #[error("OUTGATE-030: Schema for property '{property}' must be an object, got {found}")]
    MalformedPropertySchema { property: String, found: String },

    // ─────────────────────────────────────────────────────────────
    // Input errors (CLI / config)
    // ─────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OutputError {
    /// True for the expected tier: the output simply does not match its schema.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, OutputError::SchemaMismatch { .. })
    }
}

impl FixSuggestion for OutputError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            OutputError::SchemaMismatch { .. } => {
                Some("Fix the action output to match the declared output_schema")
            }
            OutputError::InvalidSchema { .. } => {
                Some("Check the output_schema is valid JSON Schema (types, keywords)")
            }
            OutputError::OutputKeyMissing { .. } => {
                Some("Check the runner's output_key matches a field in the result")
            }
            OutputError::ResultNotObject { .. } => Some("Runner results must be JSON objects"),
            OutputError::SubResultNotObject { .. } => {
                Some("Secret properties can only be masked on object outputs")
            }
            OutputError::MalformedPropertySchema { .. } => {
                Some("Each output_schema property must map to a schema object, e.g. {type: string}")
            }
            OutputError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            OutputError::Json(_) => Some("Ensure the input is valid JSON (try parsing with jq)"),
            OutputError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

/// Short type label of a JSON value, used in error messages.
pub(crate) fn value_kind(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}
