//! immich MCP server.
//!
//! Serves MCP over stdin/stdout by default, or streamable HTTP with `--http <ADDR>`.
//!
//! # Usage
//!
//! Configure in the MCP client settings:
//! ```json
//! {
//!   "mcpServers": {
//!     "immich": {
//!       "command": "/path/to/immich-mcp",
//!       "env": {
//!         "SERVER_HOST": "http://localhost:2283",
//!         "IMMICH_API_KEY": "..."
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `SERVER_HOST`: Immich server base url (required)
//! - `IMMICH_API_KEY`: Immich api key (required)
//! - `MCP_ADDR`: same as `--http`
//! - See `McpServerConfig`, `ImmichConfig` and `HydrationConfig` for the rest.

use anyhow::Result;
use app::module::AppModule;
use clap::Parser;
use dotenvy::dotenv;
use immich_search_base::logging::{self, LoggingConfig};
use immich_search_base::APP_NAME;
use mcp_server::{McpHandler, McpServerConfig};

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about = "MCP server for Immich photo search")]
struct Args {
    /// serve streamable HTTP on this address (e.g. 127.0.0.1:8000) instead of stdio
    #[arg(long = "http", env = "MCP_ADDR")]
    http_addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let conf = logging::load_tracing_config_from_env().unwrap_or_default();
    let conf = if args.http_addr.is_none() {
        // stdout carries the protocol in stdio mode
        LoggingConfig {
            use_stdout: false,
            ..conf
        }
    } else {
        conf
    };
    logging::tracing_init(conf)?;

    let app_module = AppModule::new_by_env().inspect_err(|e| {
        tracing::error!("cannot initialize immich client: {:?}", e);
    })?;
    let photo_search_app = app_module.photo_search_app.clone();
    let mcp_config = McpServerConfig::from_env();

    match args.http_addr {
        Some(bind_addr) => {
            tracing::info!("Starting immich MCP HTTP Server");
            let factory_config = mcp_config.clone();
            let handler_factory = move || {
                Ok(McpHandler::new(
                    photo_search_app.clone(),
                    factory_config.clone(),
                ))
            };
            mcp_server::boot_streamable_http_server(handler_factory, &bind_addr, &mcp_config, None)
                .await?;
            tracing::info!("immich MCP HTTP Server shutdown");
        }
        None => {
            let handler = McpHandler::new(photo_search_app, mcp_config);
            mcp_server::boot_stdio_server(handler).await?;
            tracing::info!("immich MCP Stdio Server shutdown");
        }
    }
    Ok(())
}
