use crate::handler::McpHandler;
use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};

/// Serve MCP over stdin/stdout until the client disconnects.
///
/// stdout carries the protocol, so nothing else may write to it while serving.
pub async fn boot_stdio_server(handler: McpHandler) -> Result<()> {
    tracing::info!("Starting immich MCP stdio server");

    let service = handler.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("MCP stdio serve error: {:?}", e);
    })?;

    let reason = service.waiting().await?;
    tracing::info!("MCP stdio session ended: {:?}", reason);
    Ok(())
}
