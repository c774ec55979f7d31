//! Tool definition - schema and metadata for a tool.
//!
//! Defines the interface for a tool that the reasoning engine can invoke.

use serde::{Deserialize, Serialize};

use super::schema::ArgumentSchema;
use crate::domain::foundation::ValidationError;

/// Definition of a tool that can be invoked by the reasoning engine.
///
/// Contains the schema and documentation needed for:
/// - the tool menu sent to the engine every turn
/// - argument validation before execution
///
/// # Examples
///
/// ```
/// use mailflow::domain::tools::ToolDefinition;
///
/// let definition = ToolDefinition::new(
///     "mark_email_processed",
///     "Mark an email as processed/read",
///     serde_json::json!({
///         "type": "object",
///         "properties": {
///             "emailId": { "type": "string", "description": "The email ID" }
///         },
///         "required": ["emailId"]
///     }),
/// );
/// assert!(definition.check_declaration().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_email_content")
    name: String,

    /// Human-readable description for the engine
    description: String,

    /// JSON Schema for the parameters
    parameters_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Checks that the declaration itself is well formed.
    ///
    /// Run once at startup when the tool is registered. The parameter schema
    /// must be an object schema, and every name listed in `required` must be
    /// declared under `properties`.
    pub fn check_declaration(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self
            .name
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        {
            return Err(ValidationError::invalid_format(
                "name",
                format!("'{}' must match [a-zA-Z0-9_-]+", self.name),
            ));
        }

        let schema = &self.parameters_schema;
        if schema.get("type").and_then(|t| t.as_str()) != Some("object") {
            return Err(ValidationError::invalid_format(
                "parameters_schema",
                "top-level type must be \"object\"",
            ));
        }

        let properties = match schema.get("properties") {
            None => None,
            Some(serde_json::Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(ValidationError::invalid_format(
                    "parameters_schema.properties",
                    "must be an object",
                ))
            }
        };

        if let Some(required) = schema.get("required") {
            let names = required.as_array().ok_or_else(|| {
                ValidationError::invalid_format("parameters_schema.required", "must be an array")
            })?;
            for name in names {
                let name = name.as_str().ok_or_else(|| {
                    ValidationError::invalid_format(
                        "parameters_schema.required",
                        "entries must be strings",
                    )
                })?;
                if !properties.is_some_and(|p| p.contains_key(name)) {
                    return Err(ValidationError::invalid_format(
                        "parameters_schema.required",
                        format!("'{}' is required but not declared in properties", name),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Checks the declaration and compiles its parameter schema.
    pub fn compile_schema(&self) -> Result<ArgumentSchema, ValidationError> {
        self.check_declaration()?;
        ArgumentSchema::compile(&self.parameters_schema)
            .map_err(|e| ValidationError::invalid_format("parameters_schema", e.to_string()))
    }

    /// Converts to OpenAI tool format.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_schema
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_params_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "required": ["emailId"],
            "properties": {
                "emailId": { "type": "string" }
            }
        })
    }

    #[test]
    fn new_creates_definition() {
        let def = ToolDefinition::new("get_email_content", "Fetch", sample_params_schema());

        assert_eq!(def.name(), "get_email_content");
        assert_eq!(def.description(), "Fetch");
        assert_eq!(def.parameters_schema()["type"], "object");
    }

    #[test]
    fn to_openai_format_has_correct_structure() {
        let def = ToolDefinition::new("get_email_content", "Fetch", sample_params_schema());

        let openai = def.to_openai_format();

        assert_eq!(openai["type"], "function");
        assert_eq!(openai["function"]["name"], "get_email_content");
        assert_eq!(openai["function"]["description"], "Fetch");
        assert!(openai["function"]["parameters"].is_object());
    }

    #[test]
    fn check_declaration_accepts_valid_schema() {
        let def = ToolDefinition::new("tool", "d", sample_params_schema());
        assert!(def.check_declaration().is_ok());
    }

    #[test]
    fn check_declaration_rejects_non_object_schema() {
        let def = ToolDefinition::new("tool", "d", json!({ "type": "string" }));
        assert!(def.check_declaration().is_err());
    }

    #[test]
    fn check_declaration_rejects_undeclared_required_field() {
        let def = ToolDefinition::new(
            "tool",
            "d",
            json!({
                "type": "object",
                "properties": { "a": { "type": "string" } },
                "required": ["b"]
            }),
        );

        let err = def.check_declaration().unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn compile_schema_validates_arguments() {
        let def = ToolDefinition::new("tool", "d", sample_params_schema());
        let schema = def.compile_schema().unwrap();

        assert!(schema.validate(&json!({ "emailId": "1" })).is_ok());
        assert!(schema.validate(&json!({ "emailId": 1 })).is_err());
    }

    #[test]
    fn compile_schema_rejects_invalid_keywords() {
        let def = ToolDefinition::new(
            "tool",
            "d",
            json!({
                "type": "object",
                "properties": { "a": { "type": "not-a-type" } }
            }),
        );
        assert!(def.compile_schema().is_err());
    }

    #[test]
    fn check_declaration_rejects_bad_names() {
        let def = ToolDefinition::new("", "d", sample_params_schema());
        assert!(def.check_declaration().is_err());

        let def = ToolDefinition::new("has space", "d", sample_params_schema());
        assert!(def.check_declaration().is_err());
    }
}
