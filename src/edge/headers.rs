//! Header policy: inbound flattening and outbound projection.

use crate::edge::event::{HeaderEntry, HeaderMap};
use std::collections::BTreeMap;

/// Response headers copied from the origin onto the outbound response,
/// as `(lowercase outbound name, canonical key)` pairs. Everything the
/// origin sends outside this table is dropped.
pub const RESPONSE_HEADER_ALLOWLIST: [(&str, &str); 9] = [
    ("content-type", "Content-Type"),
    ("date", "Date"),
    ("cache-control", "Cache-Control"),
    ("access-control-allow-origin", "Access-Control-Allow-Origin"),
    (
        "access-control-allow-credentials",
        "Access-Control-Allow-Credentials",
    ),
    ("vary", "Vary"),
    (
        "x-mediapackage-manifest-last-sequence",
        "X-MediaPackage-Manifest-Last-Sequence",
    ),
    (
        "x-mediapackage-manifest-last-updated",
        "X-MediaPackage-Manifest-Last-Updated",
    ),
    ("x-mediapackage-request-id", "X-MediaPackage-Request-Id"),
];

/// Collapse the multi-value inbound header map to one value per canonical
/// key for the origin request.
///
/// Duplicate-name policy: LAST VALUE WINS. When a name carries several
/// instances, later instances overwrite earlier ones. Existing origins
/// depend on this flattening, so it is a compatibility contract, not an
/// implementation accident.
pub fn flatten_request_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    for entries in headers.values() {
        for entry in entries {
            if !entry.key.is_empty() {
                flat.insert(entry.key.clone(), entry.value.clone());
            }
        }
    }
    flat
}

/// Build the outbound header map in a single pass over the allow-list.
/// Allow-listed headers absent on the origin response are omitted.
pub fn project_response_headers(origin: &reqwest::header::HeaderMap) -> HeaderMap {
    let mut projected = HeaderMap::new();
    for (name, key) in RESPONSE_HEADER_ALLOWLIST {
        let Some(value) = origin.get(name).and_then(|v| v.to_str().ok()) else {
            continue;
        };
        projected.insert(name.to_string(), vec![HeaderEntry::new(key, value)]);
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattening_is_last_value_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "user-agent".to_string(),
            vec![
                HeaderEntry::new("User-Agent", "first"),
                HeaderEntry::new("User-Agent", "second"),
            ],
        );

        let flat = flatten_request_headers(&headers);
        assert_eq!(flat.get("User-Agent").map(String::as_str), Some("second"));
    }

    #[test]
    fn flattening_skips_entries_without_a_key() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-anon".to_string(),
            vec![HeaderEntry::new("", "orphan value")],
        );

        assert!(flatten_request_headers(&headers).is_empty());
    }

    #[test]
    fn projection_copies_only_allowlisted_headers() {
        let mut origin = reqwest::header::HeaderMap::new();
        origin.insert("content-type", "application/vnd.apple.mpegurl".parse().unwrap());
        origin.insert("cache-control", "max-age=2".parse().unwrap());
        origin.insert("x-amz-cf-id", "should-be-dropped".parse().unwrap());

        let projected = project_response_headers(&origin);

        assert_eq!(
            projected["content-type"],
            vec![HeaderEntry::new("Content-Type", "application/vnd.apple.mpegurl")]
        );
        assert_eq!(
            projected["cache-control"],
            vec![HeaderEntry::new("Cache-Control", "max-age=2")]
        );
        assert!(!projected.contains_key("x-amz-cf-id"));
    }

    #[test]
    fn projection_omits_headers_missing_on_the_origin() {
        let origin = reqwest::header::HeaderMap::new();
        assert!(project_response_headers(&origin).is_empty());
    }
}
