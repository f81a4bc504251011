//! RAG MCP Server
//!
//! Retrieval-Augmented Generation exposed as JSON-RPC tools:
//! - Recursive character chunking with overlap
//! - In-memory vector index with cosine similarity search
//! - Answers grounded in retrieved chunks via a chat completion model

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
