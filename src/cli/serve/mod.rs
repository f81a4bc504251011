//! Serve command - runs the JSON-RPC tool server on stdio

use std::sync::Arc;

use tokio::io::BufReader;
use tokio::signal;
use tracing::{error, info};

use crate::api::{stdio, RagToolServer};
use crate::infrastructure::services::OpenAiAgentFactory;

/// Run the tool server until stdin closes or a shutdown signal arrives
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let factory = Arc::new(OpenAiAgentFactory::new(config.openai.clone()));
    let server = RagToolServer::new(factory, config.rag.clone());

    info!("RAG MCP server running on stdio");

    stdio::run(
        &server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        shutdown_signal(),
    )
    .await?;

    info!("RAG MCP server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
