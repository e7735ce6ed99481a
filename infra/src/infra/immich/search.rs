use super::client::{dump_request, transport_error, ImmichClient};
use super::rows::{AssetDescriptor, SearchResponse, SmartSearchRequest};
use anyhow::Result;
use async_trait::async_trait;
use immich_search_base::error::ImmichSearchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use std::sync::Arc;

pub const SMART_SEARCH_PATH: &str = "/search/smart";

#[async_trait]
pub trait SmartSearchRepository: Send + Sync + 'static {
    /// Run one smart search and return the matched assets in server order.
    /// Single attempt: no retry on any failure.
    async fn search_smart(&self, request: &SmartSearchRequest) -> Result<Vec<AssetDescriptor>>;
}

pub trait UseSmartSearchRepository {
    fn smart_search_repository(&self) -> &Arc<dyn SmartSearchRepository>;
}

#[async_trait]
impl SmartSearchRepository for ImmichClient {
    async fn search_smart(&self, request: &SmartSearchRequest) -> Result<Vec<AssetDescriptor>> {
        let url = self.endpoint(SMART_SEARCH_PATH)?;
        let body = serde_json::to_string(request).map_err(|e| {
            ImmichSearchError::ParseError(format!("cannot serialize search request: {e:?}"))
        })?;
        tracing::debug!("smart search: {}", dump_request(&Method::POST, &url, Some(&body)));

        let req = self
            .http_client()
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body.clone());
        let res = self.send(Method::POST, url.clone(), req).await?;

        let status = res.status();
        if status != StatusCode::OK {
            let mes = format!(
                "no smart search response (status={}): {}",
                status.as_u16(),
                dump_request(&Method::POST, &url, Some(&body))
            );
            tracing::warn!("{}", mes);
            return Err(ImmichSearchError::UpstreamError(mes).into());
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| transport_error(&Method::POST, &url, e))?;
        let parsed: SearchResponse = serde_json::from_slice(&bytes).map_err(|e| {
            ImmichSearchError::ParseError(format!("cannot parse smart search response: {e}"))
        })?;
        tracing::debug!(
            "smart search matched {} assets (total={:?})",
            parsed.assets.items.len(),
            parsed.assets.total
        );
        Ok(parsed.assets.items)
    }
}
