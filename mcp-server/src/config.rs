use serde::Deserialize;

/// Configuration for the MCP server layer
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct McpServerConfig {
    /// Bound on one whole tool invocation (search and hydration), in seconds
    pub timeout_sec: u32,
    /// Session mode of the streamable HTTP transport
    pub stateful_mode: bool,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            timeout_sec: 60,
            stateful_mode: false,
        }
    }
}

impl McpServerConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            timeout_sec: std::env::var("REQUEST_TIMEOUT_SEC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            stateful_mode: std::env::var("MCP_STATEFUL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_sec as u64)
    }
}
