//! MCP tool declarations and call results

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::McpError;

/// A tool as published by `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters of a `tools/call` request
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Result of a tool call: a single text block holding pretty-printed JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: text.into(),
            }],
        }
    }

    pub fn json(payload: &Value) -> Result<Self, McpError> {
        let text = serde_json::to_string_pretty(payload)
            .map_err(|e| McpError::internal(format!("Failed to serialize result: {}", e)))?;

        Ok(Self::text(text))
    }
}
