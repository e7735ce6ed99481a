//! Embedded text resources (`embedded:<key>`).

use anyhow::Result;
use immich_search_base::error::ImmichSearchError;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use url::Url;

pub const EMBEDDED_SCHEME: &str = "embedded";
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// Immutable after first access.
static EMBEDDED_RESOURCES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = BTreeMap::new();
    m.insert("info", "This is the immich search server.");
    m
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedResource {
    pub uri: String,
    pub name: String,
    pub mime_type: String,
    pub text: String,
}

pub fn resource_uri(key: &str) -> String {
    format!("{EMBEDDED_SCHEME}:{key}")
}

/// All registered resources, ordered by key.
pub fn list_embedded_resources() -> Vec<EmbeddedResource> {
    EMBEDDED_RESOURCES
        .iter()
        .map(|(key, text)| EmbeddedResource {
            uri: resource_uri(key),
            name: key.to_string(),
            mime_type: TEXT_MIME_TYPE.to_string(),
            text: text.to_string(),
        })
        .collect()
}

/// Resolve `embedded:<key>` against the registry.
pub fn read_embedded_resource(uri: &str) -> Result<EmbeddedResource> {
    let url = Url::parse(uri).map_err(|e| match e {
        url::ParseError::RelativeUrlWithoutBase => {
            ImmichSearchError::InvalidUriScheme(format!("no scheme in resource uri: {uri}"))
        }
        e => ImmichSearchError::ParseError(format!("cannot parse resource uri {uri}: {e}")),
    })?;
    if url.scheme() != EMBEDDED_SCHEME {
        return Err(ImmichSearchError::InvalidUriScheme(format!(
            "unsupported scheme {} in resource uri: {uri}",
            url.scheme()
        ))
        .into());
    }
    // opaque uri: everything after the scheme is the key
    let key = url.path();
    let text = EMBEDDED_RESOURCES
        .get(key)
        .ok_or_else(|| ImmichSearchError::UnknownResource(uri.to_string()))?;
    Ok(EmbeddedResource {
        uri: uri.to_string(),
        name: key.to_string(),
        mime_type: TEXT_MIME_TYPE.to_string(),
        text: text.to_string(),
    })
}
