//! RAG tool server: JSON-RPC method dispatch and tool handlers

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::tools::{
    self, AddDocumentArgs, AskQuestionArgs, InitializeArgs, SearchDocumentsArgs, ToolName,
    DEFAULT_MAX_RESULTS,
};
use super::types::{
    JsonRpcRequest, JsonRpcResponse, McpError, ToolCallParams, ToolResult, JSONRPC_VERSION,
};
use crate::domain::ingestion::helpers;
use crate::domain::DomainError;
use crate::infrastructure::services::{AgentFactory, RagAgent, RagConfig};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "rag-mcp-server";

const SEARCH_PREVIEW_CHARS: usize = 200;

/// Holds at most one retrieval agent, created by `initialize_rag`
#[derive(Debug)]
pub struct RagToolServer {
    factory: Arc<dyn AgentFactory>,
    defaults: RagConfig,
    agent: RwLock<Option<Arc<RagAgent>>>,
}

impl RagToolServer {
    pub fn new(factory: Arc<dyn AgentFactory>, defaults: RagConfig) -> Self {
        Self {
            factory,
            defaults,
            agent: RwLock::new(None),
        }
    }

    /// Handle one raw line from the transport
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Received unparseable message");
                return Some(JsonRpcResponse::failure(
                    None,
                    McpError::parse_error(format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().filter(|id| !id.is_null());
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id,
                    McpError::invalid_request(format!("Invalid request: {}", e)),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Dispatch a request; notifications produce no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                request.id,
                McpError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        let result = self.dispatch(&request.method, request.params).await;

        if request.id.is_none() {
            if let Err(e) = result {
                debug!(method = %request.method, error = %e, "Notification failed");
            }
            return None;
        }

        Some(match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::failure(request.id, e),
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        match method {
            "initialize" => Ok(Self::server_info()),
            "notifications/initialized" => Ok(Value::Null),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::tool_definitions() })),
            "tools/call" => {
                let params: ToolCallParams = tools::parse_arguments(params)?;
                let result = self.call_tool(&params.name, params.arguments).await?;
                serde_json::to_value(result)
                    .map_err(|e| McpError::internal(format!("Failed to serialize result: {}", e)))
            }
            _ => Err(McpError::method_not_found(format!(
                "Method not found: {}",
                method
            ))),
        }
    }

    fn server_info() -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {}
            }
        })
    }

    /// Run a named tool
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<ToolResult, McpError> {
        let tool = ToolName::parse(name)
            .ok_or_else(|| McpError::method_not_found(format!("Unknown tool: {}", name)))?;

        info!(tool = tool.as_str(), "Tool call");

        // Every tool but initialize_rag needs an agent before its arguments are read
        let payload = match tool {
            ToolName::InitializeRag => {
                self.initialize_rag(tools::parse_arguments(arguments)?).await?
            }
            ToolName::AddDocument => {
                let agent = self.agent().await?;
                add_document(&agent, tools::parse_arguments(arguments)?).await?
            }
            ToolName::AskQuestion => {
                let agent = self.agent().await?;
                ask_question(&agent, tools::parse_arguments(arguments)?).await?
            }
            ToolName::SearchDocuments => {
                let agent = self.agent().await?;
                search_documents(&agent, tools::parse_arguments(arguments)?).await?
            }
            ToolName::GetKnowledgeBaseStats => knowledge_base_stats(&*self.agent().await?).await?,
            ToolName::ClearKnowledgeBase => clear_knowledge_base(&*self.agent().await?).await?,
        };

        ToolResult::json(&payload)
    }

    async fn agent(&self) -> Result<Arc<RagAgent>, McpError> {
        self.agent
            .read()
            .await
            .clone()
            .ok_or_else(|| DomainError::NotInitialized.into())
    }

    async fn initialize_rag(&self, args: InitializeArgs) -> Result<Value, McpError> {
        let api_key = tools::required(args.api_key, "API key is required")?;
        let options = args.config.unwrap_or_default();
        let config = RagConfig::from_options(
            options.chunk_size,
            options.chunk_overlap,
            options.max_retrieved_docs,
            &self.defaults,
        );

        let agent = self
            .factory
            .create(&api_key, config.clone())
            .map_err(|e| McpError::from_domain("Failed to initialize RAG agent", e))?;

        *self.agent.write().await = Some(Arc::new(agent));
        info!(?config, "RAG agent initialized");

        Ok(json!({
            "success": true,
            "message": "RAG Agent initialized successfully",
            "config": config,
        }))
    }
}

async fn add_document(agent: &RagAgent, args: AddDocumentArgs) -> Result<Value, McpError> {
    let content = tools::required(args.content, "Document content is required")?;
    let metadata = args.metadata.unwrap_or_default();

    let chunks_added = agent
        .add_document(&content, metadata.clone())
        .await
        .map_err(|e| McpError::from_domain("Failed to add document", e))?;

    Ok(json!({
        "success": true,
        "message": format!("Document added successfully. {} chunks created.", chunks_added),
        "chunksAdded": chunks_added,
        "metadata": metadata,
    }))
}

async fn ask_question(agent: &RagAgent, args: AskQuestionArgs) -> Result<Value, McpError> {
    let question = tools::required(args.question, "Question is required")?;

    let outcome = agent.ask(&question).await;

    Ok(json!({
        "question": question,
        "answer": outcome.answer,
        "sources": outcome.sources,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn search_documents(agent: &RagAgent, args: SearchDocumentsArgs) -> Result<Value, McpError> {
    let query = tools::required(args.query, "Search query is required")?;
    let max_results = args.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

    let relevant = agent
        .retrieve_relevant_docs(&query)
        .await
        .map_err(|e| McpError::from_domain("Failed to search documents", e))?;

    let total_found = relevant.len();
    let documents: Vec<Value> = relevant
        .into_iter()
        .take(max_results)
        .map(|scored| {
            json!({
                "id": scored.entry.id(),
                "content": helpers::preview(scored.entry.text(), SEARCH_PREVIEW_CHARS),
                "similarity": scored.similarity,
                "metadata": scored.entry.metadata(),
            })
        })
        .collect();

    Ok(json!({
        "query": query,
        "totalFound": total_found,
        "returned": documents.len(),
        "documents": documents,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn knowledge_base_stats(agent: &RagAgent) -> Result<Value, McpError> {
    let stats = agent
        .stats()
        .await
        .map_err(|e| McpError::from_domain("Failed to get stats", e))?;

    Ok(json!({
        "stats": stats,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn clear_knowledge_base(agent: &RagAgent) -> Result<Value, McpError> {
    agent
        .clear()
        .await
        .map_err(|e| McpError::from_domain("Failed to clear knowledge base", e))?;

    Ok(json!({
        "success": true,
        "message": "Knowledge base cleared successfully",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
