//! Outgate - action output schema gate
//!
//! Validates an action execution result against the runner output schema and
//! the action output schema, masking secret properties on the way.

pub mod config;
pub mod error;
pub mod output;
pub mod request;
pub mod schema;
pub mod secrets;
pub mod status;
pub mod validator;

pub use config::GateConfig;
pub use error::{FixSuggestion, OutputError};
pub use output::{validate_output, OutputGate, ValidationFailure, VALIDATION_FAILED_MESSAGE};
pub use request::{CheckReport, CheckRequest};
pub use schema::{assemble_schema, SchemaNode, MASKED_ATTRIBUTE_VALUE};
pub use secrets::mask_secrets;
pub use status::ActionStatus;
pub use validator::{JsonSchemaValidator, SchemaValidator, ValidatorKind};
