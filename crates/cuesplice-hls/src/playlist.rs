//! HLS playlist structures.

use std::fmt::Write;

/// A parsed playlist, classified by kind.
///
/// Master playlists list variant streams and carry no segments; cuesplice
/// never rewrites them. Media playlists carry the live segment timeline
/// that preroll markers are spliced into.
#[derive(Debug, Clone)]
pub enum Playlist {
    /// Variant-list playlist, kept verbatim.
    Master(MasterPlaylist),
    /// Time-indexed playlist with segments.
    Media(MediaPlaylist),
}

impl Playlist {
    /// Render back to M3U8 text.
    pub fn render(&self) -> String {
        match self {
            Playlist::Master(master) => master.render(),
            Playlist::Media(media) => media.render(),
        }
    }
}

/// Master playlist. Holds the original text so that passthrough is
/// byte-identical to what the origin served.
#[derive(Debug, Clone)]
pub struct MasterPlaylist {
    /// Verbatim source text.
    pub source: String,
}

impl MasterPlaylist {
    /// Render to M3U8 string (returns the source unchanged).
    pub fn render(&self) -> String {
        self.source.clone()
    }
}

/// Playlist type (#EXT-X-PLAYLIST-TYPE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistType {
    Vod,
    Event,
}

/// Playback start point (#EXT-X-START).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Start {
    /// Offset from the beginning (positive) or end (negative) of the
    /// playlist, in seconds.
    pub offset_secs: f64,
    /// Whether the player must start exactly at the offset.
    pub precise: bool,
}

/// Media playlist for a single rendition.
#[derive(Debug, Clone)]
pub struct MediaPlaylist {
    /// Protocol version (#EXT-X-VERSION).
    pub version: Option<u32>,
    /// Target duration in seconds.
    pub target_duration: u64,
    /// Media sequence number.
    pub media_sequence: u64,
    /// Discontinuity sequence number, if present.
    pub discontinuity_sequence: Option<u64>,
    /// Playlist type (absent for live playlists).
    pub playlist_type: Option<PlaylistType>,
    /// Whether #EXT-X-INDEPENDENT-SEGMENTS was present.
    pub independent_segments: bool,
    /// Playback start point, if present.
    pub start: Option<Start>,
    /// Playlist-level tags the parser does not model, in order.
    pub extra_tags: Vec<String>,
    /// Segment entries, in playlist order.
    pub segments: Vec<Segment>,
    /// Tags after the final segment URI, in order.
    pub trailing_tags: Vec<String>,
    /// Whether this is an ended playlist (#EXT-X-ENDLIST).
    pub ended: bool,
}

impl MediaPlaylist {
    /// Render to M3U8 string.
    pub fn render(&self) -> String {
        let mut out = String::new();

        writeln!(out, "#EXTM3U").unwrap();
        if let Some(version) = self.version {
            writeln!(out, "#EXT-X-VERSION:{}", version).unwrap();
        }
        writeln!(out, "#EXT-X-TARGETDURATION:{}", self.target_duration).unwrap();
        writeln!(out, "#EXT-X-MEDIA-SEQUENCE:{}", self.media_sequence).unwrap();
        if let Some(seq) = self.discontinuity_sequence {
            writeln!(out, "#EXT-X-DISCONTINUITY-SEQUENCE:{}", seq).unwrap();
        }

        match self.playlist_type {
            Some(PlaylistType::Vod) => writeln!(out, "#EXT-X-PLAYLIST-TYPE:VOD").unwrap(),
            Some(PlaylistType::Event) => writeln!(out, "#EXT-X-PLAYLIST-TYPE:EVENT").unwrap(),
            None => {}
        }

        if self.independent_segments {
            writeln!(out, "#EXT-X-INDEPENDENT-SEGMENTS").unwrap();
        }

        if let Some(start) = self.start {
            if start.precise {
                writeln!(
                    out,
                    "#EXT-X-START:TIME-OFFSET={},PRECISE=YES",
                    start.offset_secs
                )
                .unwrap();
            } else {
                writeln!(out, "#EXT-X-START:TIME-OFFSET={}", start.offset_secs).unwrap();
            }
        }

        for tag in &self.extra_tags {
            writeln!(out, "{}", tag).unwrap();
        }

        for segment in &self.segments {
            segment.render_into(&mut out);
        }

        for tag in &self.trailing_tags {
            writeln!(out, "{}", tag).unwrap();
        }

        if self.ended {
            writeln!(out, "#EXT-X-ENDLIST").unwrap();
        }

        out
    }
}

/// A segment entry in a media playlist.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Segment URI.
    pub uri: String,
    /// Duration in seconds. May be zero for marker-only entries.
    pub duration: f64,
    /// Optional EXTINF title.
    pub title: Option<String>,
    /// Discontinuity before this segment.
    pub discontinuity: bool,
    /// Ad markers attached to this segment, in order.
    pub markers: Vec<Marker>,
    /// Segment-level tags the parser does not model, in order.
    pub extra_tags: Vec<String>,
}

impl Segment {
    /// Create a segment from the fields cuesplice synthesizes.
    pub fn new(uri: impl Into<String>, duration: f64, markers: Vec<Marker>) -> Self {
        Self {
            uri: uri.into(),
            duration,
            title: None,
            discontinuity: false,
            markers,
            extra_tags: Vec::new(),
        }
    }

    fn render_into(&self, out: &mut String) {
        for tag in &self.extra_tags {
            writeln!(out, "{}", tag).unwrap();
        }
        for marker in &self.markers {
            marker.render_into(out);
        }
        if self.discontinuity {
            writeln!(out, "#EXT-X-DISCONTINUITY").unwrap();
        }
        if let Some(ref title) = self.title {
            writeln!(out, "#EXTINF:{},{}", self.duration, title).unwrap();
        } else {
            writeln!(out, "#EXTINF:{},", self.duration).unwrap();
        }
        writeln!(out, "{}", self.uri).unwrap();
    }
}

/// Out-of-band annotation attached to a segment.
///
/// Markers signal ad-avail boundaries and custom asset metadata to
/// compliant players.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// Custom passthrough tag, rendered as `#<tag_name>:<value>`.
    Raw { tag_name: String, value: String },
    /// Start of an ad avail (#EXT-X-CUE-OUT).
    AdBreakOut { duration_secs: f64 },
    /// End of an ad avail (#EXT-X-CUE-IN).
    AdBreakIn,
}

impl Marker {
    /// Tag line for this marker, without the trailing newline.
    pub fn to_tag(&self) -> String {
        match self {
            Marker::Raw { tag_name, value } => format!("#{}:{}", tag_name, value),
            Marker::AdBreakOut { duration_secs } => format!("#EXT-X-CUE-OUT:{}", duration_secs),
            Marker::AdBreakIn => "#EXT-X-CUE-IN".to_string(),
        }
    }

    fn render_into(&self, out: &mut String) {
        writeln!(out, "{}", self.to_tag()).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_playlist() -> MediaPlaylist {
        MediaPlaylist {
            version: Some(3),
            target_duration: 6,
            media_sequence: 100,
            discontinuity_sequence: None,
            playlist_type: None,
            independent_segments: false,
            start: None,
            extra_tags: Vec::new(),
            segments: vec![
                Segment::new("seg100.ts", 6.006, vec![]),
                Segment::new("seg101.ts", 6.006, vec![]),
            ],
            trailing_tags: Vec::new(),
            ended: false,
        }
    }

    #[test]
    fn media_playlist_render() {
        let playlist = live_playlist();
        let m3u8 = playlist.render();

        assert!(m3u8.starts_with("#EXTM3U\n"));
        assert!(m3u8.contains("#EXT-X-VERSION:3"));
        assert!(m3u8.contains("#EXT-X-TARGETDURATION:6"));
        assert!(m3u8.contains("#EXT-X-MEDIA-SEQUENCE:100"));
        assert!(m3u8.contains("#EXTINF:6.006,\nseg100.ts"));
        assert!(!m3u8.contains("#EXT-X-ENDLIST"));
    }

    #[test]
    fn integer_durations_render_without_decimal_point() {
        let mut playlist = live_playlist();
        playlist.segments = vec![Segment::new("slate.ts", 300.0, vec![])];

        assert!(playlist.render().contains("#EXTINF:300,\nslate.ts"));
    }

    #[test]
    fn start_renders_precise_offset() {
        let mut playlist = live_playlist();
        playlist.start = Some(Start {
            offset_secs: -18.0,
            precise: true,
        });

        assert!(playlist
            .render()
            .contains("#EXT-X-START:TIME-OFFSET=-18,PRECISE=YES"));
    }

    #[test]
    fn markers_render_before_extinf() {
        let mut playlist = live_playlist();
        playlist.segments.insert(
            0,
            Segment::new(
                "slate.ts",
                300.0,
                vec![
                    Marker::Raw {
                        tag_name: "EXT-X-ASSET".to_string(),
                        value: "AD_TYPE=PREROLL,MEDIA_ID=12345".to_string(),
                    },
                    Marker::AdBreakOut {
                        duration_secs: 300.0,
                    },
                ],
            ),
        );

        let m3u8 = playlist.render();
        let asset = m3u8.find("#EXT-X-ASSET:AD_TYPE=PREROLL,MEDIA_ID=12345").unwrap();
        let cue_out = m3u8.find("#EXT-X-CUE-OUT:300").unwrap();
        let extinf = m3u8.find("#EXTINF:300,").unwrap();
        assert!(asset < cue_out);
        assert!(cue_out < extinf);
    }

    #[test]
    fn trailing_tags_render_after_segments() {
        let mut playlist = live_playlist();
        playlist.trailing_tags =
            vec!["#EXT-X-PROGRAM-DATE-TIME:2024-05-01T00:00:12Z".to_string()];
        playlist.ended = true;

        let m3u8 = playlist.render();
        let last_uri = m3u8.find("seg101.ts").unwrap();
        let trailer = m3u8.find("#EXT-X-PROGRAM-DATE-TIME").unwrap();
        let endlist = m3u8.find("#EXT-X-ENDLIST").unwrap();
        assert!(last_uri < trailer);
        assert!(trailer < endlist);
    }

    #[test]
    fn master_playlist_renders_source_verbatim() {
        let source = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=5000000\nhigh.m3u8\n";
        let master = MasterPlaylist {
            source: source.to_string(),
        };
        assert_eq!(master.render(), source);
    }
}
