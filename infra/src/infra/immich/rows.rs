//! Wire types of the Immich REST api (only the fields this server reads).

use serde::{Deserialize, Serialize};

#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Image,
    Video,
    Audio,
    Other,
}

/// body of `POST /api/search/smart`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SmartSearchRequest {
    pub query: String,
    pub page: u32,
    pub size: u32,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchResponse {
    pub assets: SearchAssetResponse,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchAssetResponse {
    pub items: Vec<AssetDescriptor>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// One matched asset as returned by smart search.
/// `id` is kept as the raw string: it is validated when the asset is hydrated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    pub id: String,
    #[serde(default)]
    pub original_mime_type: Option<String>,
}

impl AssetDescriptor {
    pub fn new(id: impl Into<String>, original_mime_type: Option<&str>) -> Self {
        Self {
            id: id.into(),
            original_mime_type: original_mime_type.map(|s| s.to_string()),
        }
    }
}
