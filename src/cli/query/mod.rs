//! Query command - ingest files and answer a single question

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::infrastructure::services::{AgentFactory, OpenAiAgentFactory};

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// File to add to the knowledge base (repeatable)
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,

    /// OpenAI API key, read from OPENAI_API_KEY when omitted
    #[arg(long)]
    pub api_key: Option<String>,

    /// Question to ask
    pub question: String,
}

/// Build an agent, load the files and print the answer as JSON
pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let api_key = match args.api_key {
        Some(key) => key,
        None => std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?,
    };

    let factory = OpenAiAgentFactory::new(config.openai.clone());
    let agent = factory.create(&api_key, config.rag.clone())?;

    for path in &args.files {
        let chunks = agent.load_document_from_file(path).await?;
        info!(path = %path.display(), chunks, "Loaded document");
    }

    let stats = agent.stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    let outcome = agent.ask(&args.question).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
