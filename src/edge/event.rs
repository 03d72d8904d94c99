//! Edge event data model.
//!
//! Wire-compatible with the JSON event shape the hosting edge platform
//! delivers: a request record carrying URI, query string, a multi-value
//! header map, and an optional custom-origin descriptor; and a response
//! record with a text body and the same header map shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multi-value header map: lowercase name to ordered `{key, value}` pairs.
pub type HeaderMap = BTreeMap<String, Vec<HeaderEntry>>;

/// One header instance. `key` preserves the canonical capitalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Inbound edge request. Constructed by the edge platform, read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRequestContext {
    pub uri: String,

    #[serde(default)]
    pub querystring: String,

    #[serde(default)]
    pub headers: HeaderMap,

    #[serde(default)]
    pub origin: Option<Origin>,
}

/// Origin descriptor attached to the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub custom: Option<CustomOrigin>,
}

/// Custom (non-platform) origin: where the manifest actually lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrigin {
    pub protocol: String,
    pub domain_name: String,
    pub port: u16,
}

/// Outbound edge response. The sole output artifact of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResponse {
    pub status: String,
    pub status_description: String,
    pub headers: HeaderMap,
    pub body_encoding: String,
    pub body: String,
}

impl EdgeResponse {
    /// A 200 text response with the placeholder content type. Diagnostic
    /// bodies use this as-is; successful rewrites replace the header map
    /// with the projected origin headers.
    pub fn text(body: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type".to_string(),
            vec![HeaderEntry::new("Content-Type", "text/plain")],
        );
        Self {
            status: "200".to_string(),
            status_description: "OK".to_string(),
            headers,
            body_encoding: "text".to_string(),
            body: body.into(),
        }
    }
}
