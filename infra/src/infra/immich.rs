//! Immich http api access: authenticated client, smart search and asset download.

pub mod asset;
pub mod client;
pub mod rows;
pub mod search;

pub use asset::{AssetDownloadRepository, UseAssetDownloadRepository};
pub use client::ImmichClient;
pub use rows::{AssetDescriptor, AssetType, SmartSearchRequest};
pub use search::{SmartSearchRepository, UseSmartSearchRepository};
