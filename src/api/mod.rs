//! API layer - JSON-RPC tool boundary over stdio

pub mod server;
pub mod stdio;
pub mod tools;
pub mod types;

pub use server::RagToolServer;
pub use types::{JsonRpcRequest, JsonRpcResponse, McpError};
