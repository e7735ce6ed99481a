use crate::config::McpServerConfig;
use crate::handler::McpHandler;
use anyhow::Result;
use axum::{response::Html, routing::get, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use std::future::Future;
use std::pin::Pin;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>immich MCP Server</title></head>
<body>
    <h1>immich MCP Server</h1>
    <p>MCP endpoint: <code>POST /mcp</code></p>
    <p>Health check: <code>GET /api/health</code></p>
</body>
</html>"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Routes: `/` index page, `/api/health`, and the MCP endpoint at `/mcp`.
///
/// `handler_factory` is called once per MCP session.
pub fn router<F>(handler_factory: F, config: &McpServerConfig) -> Router
where
    F: Fn() -> Result<McpHandler, std::io::Error> + Send + Sync + 'static,
{
    // stateless by default: rmcp's LocalSessionManager closes channels right after
    // the response in stateful mode, which breaks SSE reconnection on some clients
    let http_config = StreamableHttpServerConfig {
        stateful_mode: config.stateful_mode,
        ..Default::default()
    };
    let mcp_service: StreamableHttpService<McpHandler, LocalSessionManager> =
        StreamableHttpService::new(
            handler_factory,
            LocalSessionManager::default().into(),
            http_config,
        );

    let api_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .route("/", get(index))
        .nest("/api", api_routes)
        .nest_service("/mcp", mcp_service)
}

/// Boot the MCP Server with Streamable HTTP transport.
///
/// # Arguments
/// * `handler_factory` - creates a McpHandler per session
/// * `bind_addr` - e.g. "127.0.0.1:8000"
/// * `shutdown_signal` - external shutdown signal. If None, Ctrl-C stops the server.
pub async fn boot_streamable_http_server<F>(
    handler_factory: F,
    bind_addr: &str,
    config: &McpServerConfig,
    shutdown_signal: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
) -> Result<()>
where
    F: Fn() -> Result<McpHandler, std::io::Error> + Send + Sync + 'static,
{
    let app = router(handler_factory, config);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("MCP Streamable HTTP Server started on {}", bind_addr);

    let shutdown_future: Pin<Box<dyn Future<Output = ()> + Send>> = match shutdown_signal {
        Some(signal) => signal,
        None => {
            let (tx, rx) = tokio::sync::oneshot::channel();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("Shutting down MCP server...");
                        let _ = tx.send(()).inspect_err(|e| {
                            tracing::error!("failed to send shutdown signal: {:?}", e);
                        });
                    }
                    Err(e) => tracing::error!("failed to listen for ctrl_c: {:?}", e),
                }
            });
            Box::pin(async move {
                rx.await.ok();
            })
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_future)
        .await?;

    tracing::info!("MCP Streamable HTTP Server stopped");
    Ok(())
}
