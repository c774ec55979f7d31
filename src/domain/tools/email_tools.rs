//! The fixed set of tools offered to the reasoning engine.
//!
//! Tool dispatch is closed: [`EmailTool`] enumerates every tool the service
//! knows about, and each variant owns its declaration.

use serde::{Deserialize, Serialize};

use super::ToolDefinition;

/// Every tool this service exposes to the reasoning engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailTool {
    /// Fetch the full body of an email from the mailbox
    GetEmailContent,

    /// Forward extracted data to the business API
    SendToApi,

    /// Mark an email as processed in the mailbox
    MarkEmailProcessed,
}

impl EmailTool {
    /// All tools, in the order they are offered to the engine.
    pub const ALL: [EmailTool; 3] = [
        EmailTool::GetEmailContent,
        EmailTool::SendToApi,
        EmailTool::MarkEmailProcessed,
    ];

    /// Wire name of the tool.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetEmailContent => "get_email_content",
            Self::SendToApi => "send_to_api",
            Self::MarkEmailProcessed => "mark_email_processed",
        }
    }

    /// Declaration sent to the engine.
    pub fn definition(&self) -> ToolDefinition {
        match self {
            Self::GetEmailContent => ToolDefinition::new(
                self.name(),
                "Get the full content of an email",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "emailId": {
                            "type": "string",
                            "description": "The email ID"
                        },
                        "format": {
                            "type": "string",
                            "enum": ["html", "text"],
                            "description": "Format to retrieve"
                        }
                    },
                    "required": ["emailId"]
                }),
            ),
            Self::SendToApi => ToolDefinition::new(
                self.name(),
                "Send processed data to business API",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "data": {
                            "type": "object",
                            "description": "The data to send"
                        },
                        "endpoint": {
                            "type": "string",
                            "description": "Optional API endpoint override"
                        }
                    },
                    "required": ["data"]
                }),
            ),
            Self::MarkEmailProcessed => ToolDefinition::new(
                self.name(),
                "Mark an email as processed/read",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "emailId": {
                            "type": "string",
                            "description": "The email ID to mark as processed"
                        }
                    },
                    "required": ["emailId"]
                }),
            ),
        }
    }
}

impl std::fmt::Display for EmailTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Body format requested from the mailbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailFormat {
    Html,
    #[default]
    Text,
}

impl EmailFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
        }
    }
}

/// Arguments of `get_email_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEmailContentArgs {
    pub email_id: String,
    #[serde(default)]
    pub format: EmailFormat,
}

/// Arguments of `send_to_api`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendToApiArgs {
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Arguments of `mark_email_processed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkEmailProcessedArgs {
    pub email_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = EmailTool::ALL.iter().map(EmailTool::name).collect();
        assert_eq!(names.len(), EmailTool::ALL.len());
    }

    #[test]
    fn every_declaration_compiles() {
        for tool in EmailTool::ALL {
            let def = tool.definition();
            assert_eq!(def.name(), tool.name());
            assert!(def.compile_schema().is_ok(), "{} declaration", tool);
        }
    }

    #[test]
    fn declarations_match_the_published_tool_menu() {
        let send = EmailTool::SendToApi.definition();
        assert_eq!(send.description(), "Send processed data to business API");
        let props = &send.parameters_schema()["properties"];
        assert_eq!(props["data"]["description"], "The data to send");
        assert_eq!(props["endpoint"]["description"], "Optional API endpoint override");

        let get = EmailTool::GetEmailContent.definition();
        assert_eq!(get.description(), "Get the full content of an email");
        assert_eq!(
            get.parameters_schema()["properties"]["format"],
            json!({
                "type": "string",
                "enum": ["html", "text"],
                "description": "Format to retrieve"
            })
        );

        let mark = EmailTool::MarkEmailProcessed.definition();
        assert_eq!(mark.description(), "Mark an email as processed/read");
        assert_eq!(
            mark.parameters_schema()["properties"]["emailId"]["description"],
            "The email ID to mark as processed"
        );
    }

    #[test]
    fn get_email_content_args_default_to_text() {
        let args: GetEmailContentArgs = serde_json::from_value(json!({ "emailId": "1" })).unwrap();
        assert_eq!(args.email_id, "1");
        assert_eq!(args.format, EmailFormat::Text);
    }

    #[test]
    fn get_email_content_schema_rejects_unknown_format() {
        let schema = EmailTool::GetEmailContent.definition().compile_schema().unwrap();
        assert!(schema
            .validate(&json!({ "emailId": "1", "format": "pdf" }))
            .is_err());
    }

    #[test]
    fn send_to_api_requires_object_data() {
        let schema = EmailTool::SendToApi.definition().compile_schema().unwrap();
        assert!(schema.validate(&json!({ "data": "x" })).is_err());
        assert!(schema.validate(&json!({ "data": {} })).is_ok());
    }

    #[test]
    fn send_to_api_args_parse_optional_endpoint() {
        let args: SendToApiArgs =
            serde_json::from_value(json!({ "data": { "k": 1 }, "endpoint": "/x" })).unwrap();
        assert_eq!(args.endpoint.as_deref(), Some("/x"));
        assert_eq!(args.data["k"], 1);
    }
}
