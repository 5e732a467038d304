//! Schema validation backend
//!
//! The output gate only assembles schemas; JSON Schema semantics come from
//! the `jsonschema` crate behind the [`SchemaValidator`] trait.
//!
//! ## Validator kinds
//!
//! - `custom` (default): Draft 4, plus action-definition style boolean
//!   `required` flags on properties (`{type: string, required: true}`),
//!   hoisted into the parent's `required` array before compilation
//! - `draft4`, `draft7`, `draft2020-12`: the plain drafts

use std::fmt;
use std::str::FromStr;

use jsonschema::Draft;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OutputError;

/// Validate an instance against a schema document
///
/// Implementations return [`OutputError::SchemaMismatch`] when the instance
/// does not conform, and any other variant when the schema itself is unusable.
pub trait SchemaValidator {
    fn validate(&self, instance: &Value, schema: &Value) -> Result<(), OutputError>;
}

impl<T: SchemaValidator + ?Sized> SchemaValidator for &T {
    fn validate(&self, instance: &Value, schema: &Value) -> Result<(), OutputError> {
        (**self).validate(instance, schema)
    }
}

/// Validator flavor, selected by name in config or on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidatorKind {
    #[default]
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "draft4")]
    Draft4,
    #[serde(rename = "draft7")]
    Draft7,
    #[serde(rename = "draft2020-12")]
    Draft202012,
}

impl ValidatorKind {
    pub const ALL: [ValidatorKind; 4] = [
        ValidatorKind::Custom,
        ValidatorKind::Draft4,
        ValidatorKind::Draft7,
        ValidatorKind::Draft202012,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorKind::Custom => "custom",
            ValidatorKind::Draft4 => "draft4",
            ValidatorKind::Draft7 => "draft7",
            ValidatorKind::Draft202012 => "draft2020-12",
        }
    }

    fn draft(&self) -> Draft {
        match self {
            ValidatorKind::Custom | ValidatorKind::Draft4 => Draft::Draft4,
            ValidatorKind::Draft7 => Draft::Draft7,
            ValidatorKind::Draft202012 => Draft::Draft202012,
        }
    }

    /// Validator instance for this kind
    pub fn validator(self) -> JsonSchemaValidator {
        JsonSchemaValidator::new(self)
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = ValidatorKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown validator '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// [`SchemaValidator`] backed by the `jsonschema` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator {
    kind: ValidatorKind,
}

impl JsonSchemaValidator {
    pub fn new(kind: ValidatorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ValidatorKind {
        self.kind
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, instance: &Value, schema: &Value) -> Result<(), OutputError> {
        let prepared;
        let schema = match self.kind {
            ValidatorKind::Custom => {
                prepared = hoist_required_flags(schema);
                &prepared
            }
            _ => schema,
        };

        let compiled = jsonschema::options()
            .with_draft(self.kind.draft())
            .build(schema)
            .map_err(|e| OutputError::InvalidSchema {
                details: e.to_string(),
            })?;

        // Collect all validation errors
        let errors: Vec<String> = compiled
            .iter_errors(instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(OutputError::SchemaMismatch {
                details: errors.join("; "),
            })
        }
    }
}

/// Rewrite boolean `required` flags on properties into the parent's
/// `required` array, recursively.
fn hoist_required_flags(schema: &Value) -> Value {
    let mut schema = schema.clone();
    hoist_in_place(&mut schema);
    schema
}

fn hoist_in_place(schema: &mut Value) {
    let Some(body) = schema.as_object_mut() else {
        return;
    };

    let mut required = Vec::new();
    if let Some(Value::Object(properties)) = body.get_mut("properties") {
        for (name, sub_schema) in properties.iter_mut() {
            if let Some(sub_body) = sub_schema.as_object_mut() {
                let flag = sub_body.get("required").and_then(Value::as_bool);
                if let Some(flag) = flag {
                    sub_body.remove("required");
                    if flag {
                        required.push(name.clone());
                    }
                }
            }
            hoist_in_place(sub_schema);
        }
    }

    if let Some(items) = body.get_mut("items") {
        hoist_in_place(items);
    }

    if required.is_empty() {
        return;
    }
    match body.get_mut("required") {
        Some(Value::Array(existing)) => {
            for name in required {
                if !existing.iter().any(|v| v.as_str() == Some(name.as_str())) {
                    existing.push(Value::String(name));
                }
            }
        }
        _ => {
            body.insert(
                "required".to_string(),
                Value::Array(required.into_iter().map(Value::String).collect()),
            );
        }
    }
}
