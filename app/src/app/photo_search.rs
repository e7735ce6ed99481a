//! Search-then-hydrate pipeline.
//!
//! ```text
//! query ─▶ smart search (1 call) ─▶ [AssetDescriptor; N]
//!                                        │ ordered worker pool (width = min(N, max_parallelism))
//!                                        ▼
//!                       [Result<HydratedAsset>; N] ─▶ assemble(policy) ─▶ PhotoSearchResult
//! ```
//!
//! Output order always equals search order. Cancelling the caller's token aborts
//! the search call or every in-flight download.

use super::{
    HydrationConfig, HydrationFailurePolicy, SearchConfig, UseHydrationConfig, UseSearchConfig,
};
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use debug_stub_derive::DebugStub;
use futures::{stream, StreamExt};
use immich_search_base::error::ImmichSearchError;
use infra::infra::immich::{
    AssetDescriptor, AssetDownloadRepository, SmartSearchRepository, UseAssetDownloadRepository,
    UseSmartSearchRepository,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HydratedAsset {
    pub id: Uuid,
    pub mime_type: String,
    pub data: Bytes,
}

/// A descriptor that could not be hydrated (only reported under the partial policy).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HydrationFailure {
    /// position in the search page
    pub index: usize,
    pub asset_id: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhotoSearchResult {
    pub assets: Vec<HydratedAsset>,
    pub failures: Vec<HydrationFailure>,
}

/// Apply the failure policy to per-index hydration outcomes (same order as the page).
pub fn assemble(
    descriptors: &[AssetDescriptor],
    outcomes: Vec<Result<HydratedAsset>>,
    policy: HydrationFailurePolicy,
) -> Result<PhotoSearchResult> {
    let mut result = PhotoSearchResult::default();
    let mut first_error: Option<anyhow::Error> = None;
    let mut first_cancellation: Option<anyhow::Error> = None;
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(asset) => result.assets.push(asset),
            Err(e) if ImmichSearchError::is_cancellation_error(&e) => {
                // aborted because a sibling failed (or the caller gave up): not a root cause
                first_cancellation.get_or_insert(e);
            }
            Err(e) => {
                result.failures.push(HydrationFailure {
                    index,
                    asset_id: descriptors
                        .get(index)
                        .map(|d| d.id.clone())
                        .unwrap_or_default(),
                    message: e.to_string(),
                });
                first_error.get_or_insert(e);
            }
        }
    }
    match policy {
        HydrationFailurePolicy::AllOrNothing => match (first_error, first_cancellation) {
            (Some(e), _) => Err(e),
            (None, Some(c)) => Err(c),
            (None, None) => Ok(result),
        },
        HydrationFailurePolicy::Partial => match (first_cancellation, first_error) {
            (Some(c), _) => Err(c),
            // nothing to return: surface the first failure
            (None, Some(e)) if result.assets.is_empty() => Err(e),
            _ => Ok(result),
        },
    }
}

fn cancelled(what: &str) -> anyhow::Error {
    ImmichSearchError::CancelledError(what.to_string()).into()
}

#[async_trait]
pub trait PhotoSearchApp:
    UseSmartSearchRepository
    + UseAssetDownloadRepository
    + UseSearchConfig
    + UseHydrationConfig
    + Send
    + Sync
    + 'static
{
    /// Smart search for `query`, then hydrate every matched asset.
    async fn search_photos(
        &self,
        query: &str,
        cancellation_token: CancellationToken,
    ) -> Result<PhotoSearchResult> {
        let descriptors = self.search(query, &cancellation_token).await?;
        tracing::debug!("query {:?} matched {} assets", query, descriptors.len());
        let outcomes = self.hydrate_all(&descriptors, &cancellation_token).await;
        if cancellation_token.is_cancelled() {
            return Err(cancelled("photo search was cancelled"));
        }
        assemble(
            &descriptors,
            outcomes,
            self.hydration_config().failure_policy,
        )
    }

    async fn search(
        &self,
        query: &str,
        cancellation_token: &CancellationToken,
    ) -> Result<Vec<AssetDescriptor>> {
        let request = self.search_config().to_request(query);
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => Err(cancelled("smart search was cancelled")),
            res = self.smart_search_repository().search_smart(&request) => res,
        }
    }

    /// Validate the descriptor and download its original.
    /// The mime type is taken from the descriptor, never from the download.
    async fn hydrate(&self, descriptor: &AssetDescriptor) -> Result<HydratedAsset> {
        let id = Uuid::parse_str(&descriptor.id).map_err(|e| {
            ImmichSearchError::InvalidIdentifier(format!("{}: {}", descriptor.id, e))
        })?;
        let mime_type = descriptor.original_mime_type.clone().ok_or_else(|| {
            ImmichSearchError::UpstreamError(format!("asset {id} has no originalMimeType"))
        })?;
        let data = self.asset_download_repository().download_original(&id).await?;
        Ok(HydratedAsset {
            id,
            mime_type,
            data,
        })
    }

    /// Hydrate all descriptors through an ordered, bounded worker pool.
    ///
    /// Under AllOrNothing the first failure cancels the remaining work; those
    /// slots come back as CancelledError.
    async fn hydrate_all(
        &self,
        descriptors: &[AssetDescriptor],
        cancellation_token: &CancellationToken,
    ) -> Vec<Result<HydratedAsset>> {
        let config = self.hydration_config();
        let abort = cancellation_token.child_token();
        let abort_on_failure = config.failure_policy == HydrationFailurePolicy::AllOrNothing;
        stream::iter(0..descriptors.len())
            .map(|index| {
                let descriptor = &descriptors[index];
                let abort = abort.clone();
                async move {
                    if abort.is_cancelled() {
                        return Err(cancelled("hydration was aborted"));
                    }
                    let res = tokio::select! {
                        biased;
                        _ = abort.cancelled() => Err(cancelled("hydration was aborted")),
                        res = self.hydrate(descriptor) => res,
                    };
                    if let Err(e) = &res {
                        if !ImmichSearchError::is_cancellation_error(e) {
                            tracing::warn!(
                                "hydration of asset {} (index {}) failed: {:?}",
                                descriptor.id,
                                index,
                                e
                            );
                            if abort_on_failure {
                                abort.cancel();
                            }
                        }
                    }
                    res
                }
            })
            .buffered(config.pool_size(descriptors.len()))
            .collect()
            .await
    }
}

type SmartSearchRepo = Arc<dyn SmartSearchRepository>;
type AssetDownloadRepo = Arc<dyn AssetDownloadRepository>;

#[derive(Clone, DebugStub)]
pub struct PhotoSearchAppImpl {
    #[debug_stub = "Arc<dyn SmartSearchRepository>"]
    smart_search_repository: SmartSearchRepo,
    #[debug_stub = "Arc<dyn AssetDownloadRepository>"]
    asset_download_repository: AssetDownloadRepo,
    search_config: SearchConfig,
    hydration_config: HydrationConfig,
}

impl PhotoSearchAppImpl {
    pub fn new(
        smart_search_repository: Arc<dyn SmartSearchRepository>,
        asset_download_repository: Arc<dyn AssetDownloadRepository>,
        search_config: SearchConfig,
        hydration_config: HydrationConfig,
    ) -> Self {
        Self {
            smart_search_repository,
            asset_download_repository,
            search_config,
            hydration_config,
        }
    }
}

impl UseSmartSearchRepository for PhotoSearchAppImpl {
    fn smart_search_repository(&self) -> &Arc<dyn SmartSearchRepository> {
        &self.smart_search_repository
    }
}
impl UseAssetDownloadRepository for PhotoSearchAppImpl {
    fn asset_download_repository(&self) -> &Arc<dyn AssetDownloadRepository> {
        &self.asset_download_repository
    }
}
impl UseSearchConfig for PhotoSearchAppImpl {
    fn search_config(&self) -> &SearchConfig {
        &self.search_config
    }
}
impl UseHydrationConfig for PhotoSearchAppImpl {
    fn hydration_config(&self) -> &HydrationConfig {
        &self.hydration_config
    }
}
impl PhotoSearchApp for PhotoSearchAppImpl {}
