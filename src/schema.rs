//! Output schema assembly
//!
//! Runner and action definitions declare their output as a flat map of
//! property name → sub-schema. Before validation that map is wrapped into a
//! closed object schema, so a result can never carry undeclared properties.
//!
//! [`SchemaNode`] is the typed view the pipeline uses for the one part of a
//! property schema it inspects itself: the top-level `secret` flag. The full
//! documents still travel to the validator as opaque JSON values.

use serde_json::{json, Map, Value};

use crate::error::{value_kind, OutputError};

/// Placeholder written over every secret output property.
///
/// Fixed and independent of the real value, so it leaks neither length nor shape.
pub const MASKED_ATTRIBUTE_VALUE: &str = "********";

/// Wrap a flat property map into a closed object schema:
/// `{type: object, properties: <map>, additionalProperties: false}`.
pub fn assemble_schema(properties: &Map<String, Value>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    })
}

/// Typed view of one property schema
///
/// Only the property's own schema is read; nested `properties` are left to
/// the validator and never masked.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `type: object` (or any schema declaring `properties`)
    Object { secret: bool },
    /// Scalar, array or untyped schema
    Primitive {
        type_name: Option<String>,
        secret: bool,
    },
}

impl SchemaNode {
    /// Parse the schema declared for `property`.
    ///
    /// Fails only when the schema is not a mapping. `secret` follows JSON
    /// truthiness: missing, `null`, `false`, `0`, `""`, `[]` and `{}` mean
    /// "not secret", anything else masks the property.
    pub fn parse(property: &str, schema: &Value) -> Result<Self, OutputError> {
        let Value::Object(body) = schema else {
            return Err(OutputError::MalformedPropertySchema {
                property: property.to_string(),
                found: value_kind(schema),
            });
        };

        let secret = body.get("secret").is_some_and(is_truthy);
        let type_name = body.get("type").and_then(Value::as_str).map(str::to_string);

        if type_name.as_deref() == Some("object") || body.contains_key("properties") {
            return Ok(SchemaNode::Object { secret });
        }
        Ok(SchemaNode::Primitive { type_name, secret })
    }

    pub fn is_secret(&self) -> bool {
        match self {
            SchemaNode::Object { secret } | SchemaNode::Primitive { secret, .. } => *secret,
        }
    }

    /// Declared `type`, if a single one was given.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            SchemaNode::Object { .. } => Some("object"),
            SchemaNode::Primitive { type_name, .. } => type_name.as_deref(),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Property map of an assembled schema (the `properties` member).
pub fn closed_properties(schema: &Value) -> Result<&Map<String, Value>, OutputError> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| OutputError::InvalidSchema {
            details: "assembled schema has no 'properties' object".to_string(),
        })
}
