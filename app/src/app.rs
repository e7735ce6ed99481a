pub mod photo_search;

use infra::infra::immich::{AssetType, SmartSearchRequest};
use std::str::FromStr;

/// Paging policy of the smart search call.
///
/// The default is the fixed policy of this server (first page, two images);
/// it is intentionally not read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub page: u32,
    pub size: u32,
    pub asset_type: AssetType,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page: 1,
            size: 2,
            asset_type: AssetType::Image,
        }
    }
}

impl SearchConfig {
    pub fn to_request(&self, query: &str) -> SmartSearchRequest {
        SmartSearchRequest {
            query: query.to_string(),
            page: self.page,
            size: self.size,
            asset_type: self.asset_type,
        }
    }
}

/// What a failed hydration does to the rest of the page.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Default,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HydrationFailurePolicy {
    /// first failure aborts the whole page, nothing is returned
    #[default]
    AllOrNothing,
    /// every asset is attempted, successes are returned and failures reported
    Partial,
}

/// Hydration worker pool settings.
///
/// # Environment Variables
///
/// - `HYDRATION_MAX_PARALLELISM`: max concurrent downloads (default: 4, min: 1)
/// - `HYDRATION_FAILURE_POLICY`: `all_or_nothing` or `partial` (default: all_or_nothing)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HydrationConfig {
    pub max_parallelism: usize,
    pub failure_policy: HydrationFailurePolicy,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            max_parallelism: 4,
            failure_policy: HydrationFailurePolicy::AllOrNothing,
        }
    }
}

impl HydrationConfig {
    pub fn from_env() -> Self {
        Self {
            max_parallelism: std::env::var("HYDRATION_MAX_PARALLELISM")
                .ok()
                .and_then(|s| {
                    s.trim()
                        .parse::<usize>()
                        .inspect_err(|e| {
                            tracing::warn!("invalid HYDRATION_MAX_PARALLELISM {}: {:?}", s, e)
                        })
                        .ok()
                })
                .map(|n| n.max(1))
                .unwrap_or(4),
            failure_policy: std::env::var("HYDRATION_FAILURE_POLICY")
                .ok()
                .and_then(|s| {
                    HydrationFailurePolicy::from_str(s.trim())
                        .inspect_err(|e| {
                            tracing::warn!("invalid HYDRATION_FAILURE_POLICY {}: {:?}", s, e)
                        })
                        .ok()
                })
                .unwrap_or_default(),
        }
    }

    /// worker pool width for a page of `n` assets
    pub fn pool_size(&self, n: usize) -> usize {
        n.min(self.max_parallelism).max(1)
    }
}

pub trait UseSearchConfig {
    fn search_config(&self) -> &SearchConfig;
}

pub trait UseHydrationConfig {
    fn hydration_config(&self) -> &HydrationConfig;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_config() {
        let req = SearchConfig::default().to_request("Mitchell");
        assert_eq!(req.query, "Mitchell");
        assert_eq!(req.page, 1);
        assert_eq!(req.size, 2);
        assert_eq!(req.asset_type, AssetType::Image);
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!(
            "all_or_nothing".parse::<HydrationFailurePolicy>().unwrap(),
            HydrationFailurePolicy::AllOrNothing
        );
        assert_eq!(
            "Partial".parse::<HydrationFailurePolicy>().unwrap(),
            HydrationFailurePolicy::Partial
        );
        assert!("sometimes".parse::<HydrationFailurePolicy>().is_err());
        assert_eq!(HydrationFailurePolicy::Partial.to_string(), "partial");
    }

    #[test]
    fn test_pool_size() {
        let config = HydrationConfig {
            max_parallelism: 4,
            ..Default::default()
        };
        assert_eq!(config.pool_size(2), 2);
        assert_eq!(config.pool_size(10), 4);
        assert_eq!(config.pool_size(0), 1);
    }

    #[test]
    fn test_hydration_config_from_env() {
        std::env::set_var("HYDRATION_MAX_PARALLELISM", "0");
        std::env::set_var("HYDRATION_FAILURE_POLICY", "partial");

        let config = HydrationConfig::from_env();
        assert_eq!(config.max_parallelism, 1);
        assert_eq!(config.failure_policy, HydrationFailurePolicy::Partial);

        std::env::set_var("HYDRATION_MAX_PARALLELISM", "abc");
        std::env::set_var("HYDRATION_FAILURE_POLICY", "sometimes");
        assert_eq!(HydrationConfig::from_env(), HydrationConfig::default());

        std::env::remove_var("HYDRATION_MAX_PARALLELISM");
        std::env::remove_var("HYDRATION_FAILURE_POLICY");

        assert_eq!(HydrationConfig::from_env(), HydrationConfig::default());
    }
}
