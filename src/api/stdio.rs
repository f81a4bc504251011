//! Newline-delimited JSON-RPC transport

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use super::server::RagToolServer;

/// Serve requests line by line until EOF or until `shutdown` resolves
pub async fn run<R, W, F>(
    server: &RagToolServer,
    reader: R,
    mut writer: W,
    shutdown: F,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = reader.lines();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping tool server");
                break;
            }
        };

        let Some(line) = line else {
            info!("Input closed, stopping tool server");
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        debug!(bytes = line.len(), "Received message");

        if let Some(response) = server.handle_message(&line).await {
            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            writer.write_all(&payload).await?;
            writer.flush().await?;
        }
    }

    Ok(())
}
