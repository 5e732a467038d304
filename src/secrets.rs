//! Secret masking for action output
//!
//! Top-level properties with a truthy `secret` flag in the action output schema are replaced
//! by [`MASKED_ATTRIBUTE_VALUE`] before the output is validated, stored or shown.

use serde_json::Value;
use tracing::debug;

use crate::error::{value_kind, OutputError};
use crate::schema::{closed_properties, SchemaNode, MASKED_ATTRIBUTE_VALUE};

/// Mask the secret properties of `result[output_key]`.
///
/// `action_schema` is the assembled (closed) action schema. Returns the
/// masked sub-result; `result` itself is not modified, the caller writes the
/// returned value back under `output_key`.
///
/// Only properties present in the sub-result are masked, no key is added.
pub fn mask_secrets(
    result: &Value,
    output_key: &str,
    action_schema: &Value,
) -> Result<Value, OutputError> {
    let fields = result.as_object().ok_or_else(|| OutputError::ResultNotObject {
        found: value_kind(result),
    })?;
    let mut output = fields
        .get(output_key)
        .cloned()
        .ok_or_else(|| OutputError::OutputKeyMissing {
            key: output_key.to_string(),
        })?;

    let mut masked = 0usize;
    for (name, property_schema) in closed_properties(action_schema)? {
        let node = SchemaNode::parse(name, property_schema)?;
        if !node.is_secret() {
            continue;
        }

        let found = value_kind(&output);
        let Some(object) = output.as_object_mut() else {
            return Err(OutputError::SubResultNotObject {
                key: output_key.to_string(),
                property: name.clone(),
                found,
            });
        };

        if let Some(slot) = object.get_mut(name) {
            debug!(
                property = %name,
                declared_type = node.type_name().unwrap_or("any"),
                "Masking secret output property"
            );
            *slot = Value::String(MASKED_ATTRIBUTE_VALUE.to_string());
            masked += 1;
        }
    }

    debug!(output_key, masked, "Masked secret output properties");
    Ok(output)
}
