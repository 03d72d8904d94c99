//! The edge interceptor: fetch, classify, splice, respond.

use crate::edge::event::{EdgeRequestContext, EdgeResponse};
use crate::edge::headers::{flatten_request_headers, project_response_headers};
use crate::edge::preroll::{splice_preroll, PrerollConfig};
use cuesplice_hls::Playlist;
use reqwest::Client;

/// Body returned when the request carries no custom-origin descriptor.
const ORIGIN_NOT_FOUND: &str = "Origin not found";

/// Stateless per-request interceptor.
///
/// `handle` never fails: missing origin config, upstream failures, and
/// unparsable manifests all degrade to a `"200"` diagnostic text response.
/// The edge layer must not surface a hard error to the viewer, and a forced
/// 200 keeps the platform from retrying or caching an error page in place
/// of the diagnostic.
pub struct Interceptor {
    client: Client,
    preroll: PrerollConfig,
}

impl Interceptor {
    /// The client carries no timeout override and no retry layer; the
    /// hosting platform owns the wall-clock limit.
    pub fn new(preroll: PrerollConfig) -> Self {
        Self {
            client: Client::new(),
            preroll,
        }
    }

    /// Handle one inbound edge request.
    pub async fn handle(&self, request: &EdgeRequestContext) -> EdgeResponse {
        let Some(origin) = request.origin.as_ref().and_then(|o| o.custom.as_ref()) else {
            tracing::warn!("request has no custom origin attached");
            return EdgeResponse::text(ORIGIN_NOT_FOUND);
        };

        // Rebuild the origin URL exactly as received, no re-encoding.
        let url = format!(
            "{}://{}:{}{}?{}",
            origin.protocol, origin.domain_name, origin.port, request.uri, request.querystring
        );
        tracing::debug!(%url, "forwarding request to origin");

        let mut origin_request = self.client.get(&url);
        for (key, value) in flatten_request_headers(&request.headers) {
            origin_request = origin_request.header(key, value);
        }

        let origin_response = match origin_request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%url, error = %err, "origin fetch failed");
                return EdgeResponse::text(format!("{}\n{}", err, url));
            }
        };

        let status = origin_response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "origin returned an error status");
            return EdgeResponse::text(format!(
                "{} {}\n{}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                url
            ));
        }

        let origin_headers = origin_response.headers().clone();
        let body = match origin_response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(%url, error = %err, "failed to read origin body");
                return EdgeResponse::text(format!("{}\n{}", err, url));
            }
        };

        let body = match cuesplice_hls::parse(&body) {
            // Master playlists are out of splice scope; pass through.
            Ok(Playlist::Master(master)) => master.render(),
            Ok(Playlist::Media(mut media)) => {
                splice_preroll(&mut media, &self.preroll);
                media.render()
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "origin body is not a playlist");
                return EdgeResponse::text(format!("unable to parse origin manifest: {}\n{}", err, url));
            }
        };

        let mut response = EdgeResponse::text(body);
        response.headers = project_response_headers(&origin_headers);
        response
    }
}
