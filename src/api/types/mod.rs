//! Wire types for the JSON-RPC tool protocol

pub mod error;
pub mod jsonrpc;
pub mod tool;

pub use error::{ErrorCode, McpError};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
pub use tool::{McpTool, ToolCallParams, ToolContent, ToolResult};
