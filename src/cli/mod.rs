//! CLI module for the RAG MCP server
//!
//! Provides subcommands:
//! - `serve`: JSON-RPC tool server over stdio
//! - `query`: one-shot ingestion and question answering

pub mod query;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// RAG MCP Server - Retrieval-Augmented Generation exposed as MCP tools
#[derive(Parser)]
#[command(name = "rag-mcp-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the tool server on stdin/stdout
    Serve,

    /// Ingest files and answer one question
    Query(query::QueryArgs),
}

/// Load `.env` and configuration, then install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
