//! Tool catalogue: names, input schemas and argument types

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use super::types::{McpError, McpTool};
use crate::domain::knowledge_base::Metadata;

pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    InitializeRag,
    AddDocument,
    AskQuestion,
    SearchDocuments,
    GetKnowledgeBaseStats,
    ClearKnowledgeBase,
}

impl ToolName {
    pub const ALL: [ToolName; 6] = [
        Self::InitializeRag,
        Self::AddDocument,
        Self::AskQuestion,
        Self::SearchDocuments,
        Self::GetKnowledgeBaseStats,
        Self::ClearKnowledgeBase,
    ];

    /// Resolve a called tool name; `initialize` is an alias of `initialize_rag`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "initialize_rag" | "initialize" => Some(Self::InitializeRag),
            "add_document" => Some(Self::AddDocument),
            "ask_question" => Some(Self::AskQuestion),
            "search_documents" => Some(Self::SearchDocuments),
            "get_knowledge_base_stats" => Some(Self::GetKnowledgeBaseStats),
            "clear_knowledge_base" => Some(Self::ClearKnowledgeBase),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitializeRag => "initialize_rag",
            Self::AddDocument => "add_document",
            Self::AskQuestion => "ask_question",
            Self::SearchDocuments => "search_documents",
            Self::GetKnowledgeBaseStats => "get_knowledge_base_stats",
            Self::ClearKnowledgeBase => "clear_knowledge_base",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::InitializeRag => "Initialize the RAG agent with OpenAI API key and configuration",
            Self::AddDocument => "Add a document to the knowledge base",
            Self::AskQuestion => "Ask a question using RAG (Retrieval-Augmented Generation)",
            Self::SearchDocuments => "Search for documents without generating an answer",
            Self::GetKnowledgeBaseStats => "Get statistics about the current knowledge base",
            Self::ClearKnowledgeBase => "Clear all documents from the knowledge base",
        }
    }

    fn input_schema(&self) -> Value {
        match self {
            Self::InitializeRag => json!({
                "type": "object",
                "properties": {
                    "apiKey": { "type": "string", "description": "OpenAI API key" },
                    "config": {
                        "type": "object",
                        "properties": {
                            "chunkSize": {
                                "type": "number",
                                "description": "Size of document chunks",
                                "default": 1000
                            },
                            "chunkOverlap": {
                                "type": "number",
                                "description": "Overlap between chunks",
                                "default": 200
                            },
                            "maxRetrievedDocs": {
                                "type": "number",
                                "description": "Maximum number of documents to retrieve",
                                "default": 3
                            }
                        }
                    }
                },
                "required": ["apiKey"]
            }),
            Self::AddDocument => json!({
                "type": "object",
                "properties": {
                    "content": { "type": "string", "description": "Document content to add" },
                    "metadata": {
                        "type": "object",
                        "description": "Optional metadata for the document"
                    }
                },
                "required": ["content"]
            }),
            Self::AskQuestion => json!({
                "type": "object",
                "properties": {
                    "question": { "type": "string", "description": "Question to ask" }
                },
                "required": ["question"]
            }),
            Self::SearchDocuments => json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query" },
                    "maxResults": {
                        "type": "number",
                        "description": "Maximum number of results to return",
                        "default": DEFAULT_MAX_RESULTS
                    }
                },
                "required": ["query"]
            }),
            Self::GetKnowledgeBaseStats | Self::ClearKnowledgeBase => {
                json!({ "type": "object", "properties": {} })
            }
        }
    }

    pub fn definition(&self) -> McpTool {
        McpTool {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Every published tool, in catalogue order
pub fn tool_definitions() -> Vec<McpTool> {
    ToolName::ALL.iter().map(ToolName::definition).collect()
}

/// Deserialize tool arguments, treating absent arguments as an empty object
pub fn parse_arguments<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T, McpError> {
    let value = match arguments {
        Some(Value::Null) | None => json!({}),
        Some(value) => value,
    };

    serde_json::from_value(value)
        .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {}", e)))
}

/// A required string argument, rejecting missing and empty values
pub fn required(value: Option<String>, message: &str) -> Result<String, McpError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| McpError::invalid_params(message))
}

/// Read a JSON number as a count: fractions are floored and anything below
/// zero becomes 0, so `2.0` and `2` mean the same thing
fn count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;

    Ok(value.map(|n| if n.is_finite() && n > 0.0 { n.floor() as usize } else { 0 }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeArgs {
    pub api_key: Option<String>,
    #[serde(default)]
    pub config: Option<InitializeOptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeOptions {
    #[serde(default, deserialize_with = "count")]
    pub chunk_size: Option<usize>,
    #[serde(default, deserialize_with = "count")]
    pub chunk_overlap: Option<usize>,
    #[serde(default, deserialize_with = "count")]
    pub max_retrieved_docs: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddDocumentArgs {
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AskQuestionArgs {
    pub question: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocumentsArgs {
    pub query: Option<String>,
    #[serde(default, deserialize_with = "count")]
    pub max_results: Option<usize>,
}
