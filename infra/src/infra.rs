pub mod immich;

use anyhow::Result;
use debug_stub_derive::DebugStub;
use immich_search_base::error::ImmichSearchError;
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the upstream Immich server.
///
/// # Environment Variables
///
/// - `SERVER_HOST`: base url of the Immich server (required)
/// - `IMMICH_API_KEY`: api key sent as `x-api-key` on every request (required)
/// - `IMMICH_REQUEST_TIMEOUT_SEC`: per request timeout (default: 30)
/// - `IMMICH_CONNECT_TIMEOUT_SEC`: connect timeout (default: 10)
/// - `IMMICH_MAX_ASSET_BYTES`: max size of one downloaded asset (default: 32MiB)
#[derive(Deserialize, Clone, DebugStub)]
pub struct ImmichConfig {
    pub server_host: String,
    #[serde(rename = "immich_api_key")]
    #[debug_stub = "<redacted>"]
    pub api_key: String,
    #[serde(
        rename = "immich_request_timeout_sec",
        default = "default_request_timeout_sec"
    )]
    pub request_timeout_sec: u64,
    #[serde(
        rename = "immich_connect_timeout_sec",
        default = "default_connect_timeout_sec"
    )]
    pub connect_timeout_sec: u64,
    #[serde(rename = "immich_max_asset_bytes", default = "default_max_asset_bytes")]
    pub max_asset_bytes: u64,
}

fn default_request_timeout_sec() -> u64 {
    30
}
fn default_connect_timeout_sec() -> u64 {
    10
}
fn default_max_asset_bytes() -> u64 {
    32 * 1024 * 1024
}

impl ImmichConfig {
    pub fn new(server_host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_host: server_host.into(),
            api_key: api_key.into(),
            request_timeout_sec: default_request_timeout_sec(),
            connect_timeout_sec: default_connect_timeout_sec(),
            max_asset_bytes: default_max_asset_bytes(),
        }
    }
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_sec)
    }
}

pub fn load_immich_config_from_env() -> Result<ImmichConfig> {
    envy::from_env::<ImmichConfig>().map_err(|e| {
        ImmichSearchError::ConfigError(format!("cannot read immich config from env: {e:?}"))
            .into()
    })
}
