use crate::infra::ImmichConfig;
use anyhow::Result;
use debug_stub_derive::DebugStub;
use immich_search_base::error::ImmichSearchError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response, Url};
use std::str::FromStr;

pub const API_KEY_HEADER: &str = "x-api-key";
const API_PATH_PREFIX: &str = "/api";

/// Authenticated http client for one Immich server.
///
/// Every request carries the api key header, and every operation path is
/// rewritten under `/api` (the published openapi paths omit that prefix).
#[derive(Clone, DebugStub)]
pub struct ImmichClient {
    #[debug_stub = "reqwest::Client"]
    client: reqwest::Client,
    base_url: Url,
    max_asset_bytes: u64,
}

impl ImmichClient {
    pub fn new(config: &ImmichConfig) -> Result<Self> {
        let base_url = Url::from_str(config.server_host.as_str()).map_err(|e| {
            ImmichSearchError::ConfigError(format!(
                "cannot parse server host: {}, error= {e:?}",
                config.server_host
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ImmichSearchError::ConfigError(format!(
                "server host is not a base url: {}",
                config.server_host
            ))
            .into());
        }
        let mut api_key = HeaderValue::from_str(config.api_key.as_str()).map_err(|e| {
            ImmichSearchError::ConfigError(format!("invalid api key header value: {e:?}"))
        })?;
        api_key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                ImmichSearchError::ConfigError(format!("http client build error: {e:?}"))
            })?;
        Ok(Self {
            client,
            base_url,
            max_asset_bytes: config.max_asset_bytes,
        })
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn max_asset_bytes(&self) -> u64 {
        self.max_asset_bytes
    }

    /// `<base path>/api<path>` on the configured server.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        let path = path.trim_start_matches('/');
        url.set_path(&format!("{prefix}{API_PATH_PREFIX}/{path}"));
        url.set_query(None);
        Ok(url)
    }

    /// Send a prepared request, mapping connection level failures to TransportError.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        request: reqwest::RequestBuilder,
    ) -> Result<Response> {
        request.send().await.map_err(|e| {
            let kind = if e.is_timeout() {
                "timed out"
            } else if e.is_connect() {
                "connection failed"
            } else {
                "request failed"
            };
            ImmichSearchError::TransportError(format!("{method} {url} {kind}: {e}")).into()
        })
    }
}

/// Diagnostic rendering of a request for UpstreamError messages.
/// The api key header is never included.
pub fn dump_request(method: &Method, url: &Url, body: Option<&str>) -> String {
    match body {
        Some(b) => format!("{method} {url} body={b}"),
        None => format!("{method} {url}"),
    }
}

pub fn transport_error(method: &Method, url: &Url, e: reqwest::Error) -> anyhow::Error {
    ImmichSearchError::TransportError(format!("{method} {url} body read failed: {e}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> ImmichClient {
        ImmichClient::new(&ImmichConfig::new(host, "key")).unwrap()
    }

    #[test]
    fn test_endpoint_prefixes_api() {
        let c = client("http://localhost:2283");
        assert_eq!(
            c.endpoint("/search/smart").unwrap().as_str(),
            "http://localhost:2283/api/search/smart"
        );
        let c = client("http://localhost:2283/");
        assert_eq!(
            c.endpoint("search/smart").unwrap().as_str(),
            "http://localhost:2283/api/search/smart"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("https://example.com/immich/");
        assert_eq!(
            c.endpoint("/assets/abc/original").unwrap().as_str(),
            "https://example.com/immich/api/assets/abc/original"
        );
    }

    #[test]
    fn test_invalid_server_host() {
        let err = ImmichClient::new(&ImmichConfig::new("not a url", "key")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImmichSearchError>(),
            Some(ImmichSearchError::ConfigError(_))
        ));
        let err = ImmichClient::new(&ImmichConfig::new("mailto:someone", "key")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImmichSearchError>(),
            Some(ImmichSearchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_api_key() {
        let err = ImmichClient::new(&ImmichConfig::new("http://localhost", "bad\nkey")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImmichSearchError>(),
            Some(ImmichSearchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_dump_request() {
        let url = Url::parse("http://localhost:2283/api/search/smart").unwrap();
        assert_eq!(
            dump_request(&Method::POST, &url, Some(r#"{"query":"x"}"#)),
            r#"POST http://localhost:2283/api/search/smart body={"query":"x"}"#
        );
        assert_eq!(
            dump_request(&Method::GET, &url, None),
            "GET http://localhost:2283/api/search/smart"
        );
    }

    #[test]
    fn test_debug_hides_client_internals() {
        let c = client("http://localhost:2283");
        let debug = format!("{c:?}");
        assert!(debug.contains("localhost"));
        assert!(!debug.contains("key"));
    }
}
