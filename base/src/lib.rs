pub mod error;
pub mod logging;

pub static APP_NAME: &str = "immich-mcp";

/// Implementation name announced to MCP clients.
pub static MCP_SERVER_NAME: &str = "immich";
