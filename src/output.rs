//! Output Validation - runner gate, then action gate
//!
//! `validate_output` checks an action execution result against:
//! 1. the runner output schema (whole result)
//! 2. the action output schema (`result[output_key]`, after secret masking)
//!
//! Gates short-circuit on the first failure. Failures never escape as errors:
//! the result is replaced by a diagnostic payload and the status becomes
//! [`ActionStatus::Failed`].
//!
//! Without a runner schema nothing is checked, not even a declared action
//! schema. Callers rely on this, keep it.

use serde_json::{Map, Value};
use tracing::{debug, error, instrument};

use crate::config::GateConfig;
use crate::error::OutputError;
use crate::schema::assemble_schema;
use crate::secrets::mask_secrets;
use crate::status::ActionStatus;
use crate::validator::{JsonSchemaValidator, SchemaValidator};

/// `message` member of every diagnostic result.
pub const VALIDATION_FAILED_MESSAGE: &str =
    "Error validating output. See error output for more details.";

/// Default number of trace frames kept in a diagnostic `traceback`.
pub const TRACEBACK_LIMIT: usize = 20;

/// Why an output was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Output does not match its schema (expected, no trace)
    Mismatch { message: String },
    /// Anything else: malformed schema, missing output key, ...
    Internal { message: String, trace: Vec<String> },
}

impl ValidationFailure {
    pub fn message(&self) -> &str {
        match self {
            ValidationFailure::Mismatch { message } | ValidationFailure::Internal { message, .. } => {
                message
            }
        }
    }

    /// Diagnostic result returned in place of the output.
    ///
    /// `{error, message}` for a mismatch; internal failures add `traceback`
    /// with at most `traceback_limit` frames, outermost first.
    pub fn diagnostic(&self, traceback_limit: usize) -> Value {
        let mut diagnostic = Map::new();
        if let ValidationFailure::Internal { trace, .. } = self {
            let traceback: String = trace
                .iter()
                .take(traceback_limit)
                .map(|frame| format!("  in {}\n", frame))
                .collect();
            diagnostic.insert("traceback".to_string(), Value::String(traceback));
        }
        diagnostic.insert("error".to_string(), Value::String(self.message().to_string()));
        diagnostic.insert(
            "message".to_string(),
            Value::String(VALIDATION_FAILED_MESSAGE.to_string()),
        );
        Value::Object(diagnostic)
    }
}

/// Error plus the pipeline frames it crossed, innermost first
#[derive(Debug)]
struct GateError {
    error: OutputError,
    frames: Vec<String>,
}

impl From<GateError> for ValidationFailure {
    fn from(err: GateError) -> Self {
        let message = err.error.to_string();
        if err.error.is_mismatch() {
            ValidationFailure::Mismatch { message }
        } else {
            let mut trace = err.frames;
            trace.reverse();
            ValidationFailure::Internal { message, trace }
        }
    }
}

/// Record the pipeline stage an error propagates through
trait StageContext<T> {
    fn stage<F: FnOnce() -> String>(self, frame: F) -> Result<T, GateError>;
}

impl<T> StageContext<T> for Result<T, OutputError> {
    fn stage<F: FnOnce() -> String>(self, frame: F) -> Result<T, GateError> {
        self.map_err(|error| GateError {
            error,
            frames: vec![frame()],
        })
    }
}

impl<T> StageContext<T> for Result<T, GateError> {
    fn stage<F: FnOnce() -> String>(self, frame: F) -> Result<T, GateError> {
        self.map_err(|mut err| {
            err.frames.push(frame());
            err
        })
    }
}

/// Two-gate output validator
#[derive(Debug, Clone)]
pub struct OutputGate<V = JsonSchemaValidator> {
    validator: V,
    traceback_limit: usize,
}

impl OutputGate<JsonSchemaValidator> {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            validator: config.validator.validator(),
            traceback_limit: config.traceback_limit,
        }
    }
}

impl Default for OutputGate<JsonSchemaValidator> {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}

impl<V: SchemaValidator> OutputGate<V> {
    /// Gate with a custom validation backend
    pub fn with_validator(validator: V) -> Self {
        Self {
            validator,
            traceback_limit: TRACEBACK_LIMIT,
        }
    }

    pub fn with_traceback_limit(mut self, limit: usize) -> Self {
        self.traceback_limit = limit;
        self
    }

    /// Validate `result` and normalize the outcome into `(result, status)`.
    ///
    /// On success `status` is returned unchanged and `result` carries the
    /// masked secrets. On failure the result is a diagnostic payload and the
    /// status is [`ActionStatus::Failed`].
    #[instrument(skip_all, fields(output_key = %output_key))]
    pub fn validate_output(
        &self,
        runner_schema: Option<&Map<String, Value>>,
        action_schema: Option<&Map<String, Value>>,
        result: Value,
        status: ActionStatus,
        output_key: &str,
    ) -> (Value, ActionStatus) {
        match self.check(runner_schema, action_schema, result, output_key) {
            Ok(result) => (result, status),
            Err(failure) => {
                error!(error = %failure.message(), "Failed to validate output");
                (failure.diagnostic(self.traceback_limit), ActionStatus::Failed)
            }
        }
    }

    /// Run both gates, returning the (masked) result or the failure.
    pub fn check(
        &self,
        runner_schema: Option<&Map<String, Value>>,
        action_schema: Option<&Map<String, Value>>,
        mut result: Value,
        output_key: &str,
    ) -> Result<Value, ValidationFailure> {
        debug!(output_key, "Validating action output: {}", result);

        let Some(runner_schema) = runner_schema.filter(|schema| !schema.is_empty()) else {
            debug!("No runner output schema, skipping output validation");
            return Ok(result);
        };

        self.run_gates(runner_schema, action_schema, &mut result, output_key)
            .stage(|| "validate_output".to_string())?;

        Ok(result)
    }

    fn run_gates(
        &self,
        runner_schema: &Map<String, Value>,
        action_schema: Option<&Map<String, Value>>,
        result: &mut Value,
        output_key: &str,
    ) -> Result<(), GateError> {
        self.validate_runner(runner_schema, result)
            .stage(|| "validate_runner".to_string())?;

        if let Some(action_schema) = action_schema.filter(|schema| !schema.is_empty()) {
            self.validate_action(action_schema, result, output_key)
                .stage(|| "validate_action".to_string())?;
        }
        Ok(())
    }

    fn validate_runner(
        &self,
        runner_schema: &Map<String, Value>,
        result: &Value,
    ) -> Result<(), GateError> {
        let schema = assemble_schema(runner_schema);
        debug!("Validating runner output: {}", schema);

        self.validator
            .validate(result, &schema)
            .stage(|| "validate(result, runner_schema)".to_string())
    }

    fn validate_action(
        &self,
        action_schema: &Map<String, Value>,
        result: &mut Value,
        output_key: &str,
    ) -> Result<(), GateError> {
        let schema = assemble_schema(action_schema);
        debug!("Validating action output: {}", schema);

        let masked = mask_secrets(result, output_key, &schema)
            .stage(|| format!("mask_secrets(output_key={:?})", output_key))?;

        let outcome = self
            .validator
            .validate(&masked, &schema)
            .stage(|| format!("validate(result[{:?}], action_schema)", output_key));

        // Masking stays in the result whatever the outcome; mask_secrets
        // only succeeds on object results.
        if let Some(fields) = result.as_object_mut() {
            fields.insert(output_key.to_string(), masked);
        }
        outcome
    }
}

/// Validate with the default (`custom`) validator.
///
/// See [`OutputGate::validate_output`].
pub fn validate_output(
    runner_schema: Option<&Map<String, Value>>,
    action_schema: Option<&Map<String, Value>>,
    result: Value,
    status: ActionStatus,
    output_key: &str,
) -> (Value, ActionStatus) {
    OutputGate::default().validate_output(runner_schema, action_schema, result, status, output_key)
}
