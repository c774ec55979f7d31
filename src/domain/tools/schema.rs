//! Argument validation against a tool's declared parameter schema.
//!
//! Schemas are compiled with `jsonschema` once, when the tool is registered,
//! and reused for every call.

use std::sync::Arc;

use jsonschema::JSONSchema;
use serde_json::Value;
use thiserror::Error;

/// A mismatch between supplied arguments and the declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("Invalid parameter schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid value at {path}: {message}")]
    Invalid { path: String, message: String },

    #[error("Multiple validation errors: {}", format_violations(.0))]
    Multiple(Vec<SchemaViolation>),
}

fn format_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A compiled parameter schema.
#[derive(Clone)]
pub struct ArgumentSchema {
    compiled: Arc<JSONSchema>,
}

impl ArgumentSchema {
    /// Compiles `schema`, rejecting documents that are not valid JSON Schema.
    pub fn compile(schema: &Value) -> Result<Self, SchemaViolation> {
        let compiled = JSONSchema::compile(schema)
            .map_err(|e| SchemaViolation::InvalidSchema(e.to_string()))?;
        Ok(Self {
            compiled: Arc::new(compiled),
        })
    }

    /// Validates `arguments`.
    ///
    /// All violations are collected; a single one is returned as-is, several
    /// are wrapped in [`SchemaViolation::Multiple`].
    pub fn validate(&self, arguments: &Value) -> Result<(), SchemaViolation> {
        let mut violations: Vec<SchemaViolation> = match self.compiled.validate(arguments) {
            Ok(()) => return Ok(()),
            Err(errors) => errors
                .map(|e| SchemaViolation::Invalid {
                    path: field_path(&e.instance_path.to_string()),
                    message: e.to_string(),
                })
                .collect(),
        };

        match violations.len() {
            0 => Ok(()),
            1 => Err(violations.remove(0)),
            _ => Err(SchemaViolation::Multiple(violations)),
        }
    }
}

impl std::fmt::Debug for ArgumentSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentSchema").finish_non_exhaustive()
    }
}

/// Turns a JSON pointer (`/tags/1`) into a dotted field path (`tags.1`).
fn field_path(pointer: &str) -> String {
    let path = pointer.trim_start_matches('/');
    if path.is_empty() {
        "root".to_string()
    } else {
        path.replace('/', ".")
    }
}
