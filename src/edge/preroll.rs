//! Preroll splice: the rewrite applied to live media playlists.

use cuesplice_hls::{Marker, MediaPlaylist, Segment, Start};
use serde::{Deserialize, Serialize};

/// How far before the live edge the player is forced to start, in target
/// durations. Three target durations keeps the spliced preroll reachable.
const START_OFFSET_TARGET_DURATIONS: f64 = 3.0;

/// Preroll avail settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrerollConfig {
    /// Placeholder media URI for the slate segments. Players replace the
    /// avail with dynamic ad content; the slate is never fetched in normal
    /// operation.
    #[serde(default = "default_slate_uri")]
    pub slate_uri: String,

    /// Length of the ad avail in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: f64,

    /// Media id carried in the asset-descriptor marker.
    #[serde(default = "default_media_id")]
    pub media_id: String,
}

impl Default for PrerollConfig {
    fn default() -> Self {
        Self {
            slate_uri: default_slate_uri(),
            duration_secs: default_duration(),
            media_id: default_media_id(),
        }
    }
}

fn default_slate_uri() -> String {
    "https://slate.example.com/null.ts".to_string()
}

fn default_duration() -> f64 {
    300.0
}

fn default_media_id() -> String {
    "12345".to_string()
}

/// Splice a preroll avail at the head of a live media playlist.
///
/// Forces playback to start `3 x target_duration` seconds before the live
/// edge (precise), then prepends two slate segments: one opening the avail
/// (asset descriptor + CUE-OUT) and a zero-duration one immediately closing
/// it (CUE-IN). Players treat the zero-duration pair as "insert dynamic ad
/// content here, then resume". Pre-existing segments are untouched and keep
/// their order.
///
/// Not idempotent: each call prepends one more avail pair. The interceptor
/// calls this exactly once per request.
pub fn splice_preroll(playlist: &mut MediaPlaylist, preroll: &PrerollConfig) {
    playlist.start = Some(Start {
        offset_secs: -(playlist.target_duration as f64 * START_OFFSET_TARGET_DURATIONS),
        precise: true,
    });

    let avail_open = Segment::new(
        preroll.slate_uri.clone(),
        preroll.duration_secs,
        vec![
            Marker::Raw {
                tag_name: "EXT-X-ASSET".to_string(),
                value: format!("AD_TYPE=PREROLL,MEDIA_ID={}", preroll.media_id),
            },
            Marker::AdBreakOut {
                duration_secs: preroll.duration_secs,
            },
        ],
    );
    let avail_close = Segment::new(preroll.slate_uri.clone(), 0.0, vec![Marker::AdBreakIn]);

    playlist.segments.splice(0..0, [avail_open, avail_close]);
}
