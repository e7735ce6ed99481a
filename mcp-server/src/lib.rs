//! MCP server exposing Immich smart search as an image tool.
//!
//! ```text
//! MCP client ──(stdio | streamable HTTP)──▶ McpHandler
//!                                            ├─ tool `search`      → PhotoSearchApp::search_photos()
//!                                            ├─ prompt `query`
//!                                            └─ resource `embedded:info`
//!                                                        │
//!                                  ImmichClient ◀────────┘  POST /api/search/smart
//!                                                           GET  /api/assets/{id}/original
//! ```
//!
//! ## Environment Variables
//!
//! - `SERVER_HOST`, `IMMICH_API_KEY`: upstream Immich server (required)
//! - `MCP_ADDR`: serve streamable HTTP on this address instead of stdio
//! - `REQUEST_TIMEOUT_SEC`: bound on one tool invocation (default: 60)
//! - `MCP_STATEFUL`: streamable HTTP session mode (default: false)
//! - `HYDRATION_MAX_PARALLELISM`, `HYDRATION_FAILURE_POLICY`: see `app::app::HydrationConfig`

pub mod config;
pub mod handler;
pub mod prompt;
pub mod resource;
pub mod server;

pub use config::McpServerConfig;
pub use handler::McpHandler;
pub use server::{boot_stdio_server, boot_streamable_http_server};
