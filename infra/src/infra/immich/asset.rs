use super::client::{dump_request, transport_error, ImmichClient};
use anyhow::Result;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use immich_search_base::error::ImmichSearchError;
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait AssetDownloadRepository: Send + Sync + 'static {
    /// Download the original file of one asset.
    async fn download_original(&self, id: &Uuid) -> Result<Bytes>;
}

pub trait UseAssetDownloadRepository {
    fn asset_download_repository(&self) -> &Arc<dyn AssetDownloadRepository>;
}

pub fn download_path(id: &Uuid) -> String {
    format!("/assets/{id}/original")
}

#[async_trait]
impl AssetDownloadRepository for ImmichClient {
    async fn download_original(&self, id: &Uuid) -> Result<Bytes> {
        let url = self.endpoint(&download_path(id))?;
        let req = self.http_client().get(url.clone());
        let mut res = self.send(Method::GET, url.clone(), req).await?;

        let status = res.status();
        if status != StatusCode::OK {
            let mes = format!(
                "asset download failed (status={}): {}",
                status.as_u16(),
                dump_request(&Method::GET, &url, None)
            );
            tracing::warn!("{}", mes);
            return Err(ImmichSearchError::UpstreamError(mes).into());
        }

        let limit = self.max_asset_bytes();
        if let Some(len) = res.content_length() {
            if len > limit {
                return Err(too_large(id, len, limit));
            }
        }
        let mut buf = BytesMut::with_capacity(res.content_length().unwrap_or(0) as usize);
        while let Some(chunk) = res
            .chunk()
            .await
            .map_err(|e| transport_error(&Method::GET, &url, e))?
        {
            let len = (buf.len() + chunk.len()) as u64;
            if len > limit {
                return Err(too_large(id, len, limit));
            }
            buf.extend_from_slice(&chunk);
        }
        tracing::debug!("downloaded asset {}: {} bytes", id, buf.len());
        Ok(buf.freeze())
    }
}

fn too_large(id: &Uuid, len: u64, limit: u64) -> anyhow::Error {
    let mes = format!("asset {id} is too large: {len} bytes (limit {limit})");
    tracing::warn!("{}", mes);
    ImmichSearchError::UpstreamError(mes).into()
}
