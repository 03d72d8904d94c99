//! Line-oriented M3U8 parser.
//!
//! Parses playlist text into the typed model in [`crate::playlist`]. The
//! parser models the tags cuesplice needs to rewrite a live timeline and
//! carries every other tag through verbatim so untouched content survives
//! re-serialization.

use crate::error::{PlaylistError, Result};
use crate::playlist::{Marker, MasterPlaylist, MediaPlaylist, Playlist, PlaylistType, Segment, Start};

/// Accumulates tags seen before the next segment URI.
#[derive(Default)]
struct PendingSegment {
    extinf: Option<(f64, Option<String>)>,
    discontinuity: bool,
    markers: Vec<Marker>,
    extra_tags: Vec<String>,
}

impl PendingSegment {
    fn has_segment_content(&self) -> bool {
        self.extinf.is_some() || self.discontinuity || !self.markers.is_empty()
    }

    /// Tags left over after the last URI keep their text form so nothing
    /// is dropped from the tail of the playlist.
    fn into_trailing_tags(self) -> Vec<String> {
        let mut tags = self.extra_tags;
        tags.extend(self.markers.iter().map(Marker::to_tag));
        if self.discontinuity {
            tags.push("#EXT-X-DISCONTINUITY".to_string());
        }
        if let Some((duration, title)) = self.extinf {
            match title {
                Some(title) => tags.push(format!("#EXTINF:{},{}", duration, title)),
                None => tags.push(format!("#EXTINF:{},", duration)),
            }
        }
        tags
    }

    fn into_segment(mut self, uri: &str) -> Result<Segment> {
        let (duration, title) = self
            .extinf
            .take()
            .ok_or_else(|| PlaylistError::UriWithoutExtinf {
                uri: uri.to_string(),
            })?;
        Ok(Segment {
            uri: uri.to_string(),
            duration,
            title,
            discontinuity: self.discontinuity,
            markers: self.markers,
            extra_tags: self.extra_tags,
        })
    }
}

/// Parse playlist text, classifying master vs media playlists.
///
/// Master playlists (any playlist carrying `#EXT-X-STREAM-INF`) are kept as
/// verbatim source text; media playlists are parsed into segments.
pub fn parse(text: &str) -> Result<Playlist> {
    let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));

    match lines.find(|line| !line.trim().is_empty()) {
        Some("#EXTM3U") => {}
        _ => return Err(PlaylistError::MissingHeader),
    }

    if text.contains("#EXT-X-STREAM-INF") {
        return Ok(Playlist::Master(MasterPlaylist {
            source: text.to_string(),
        }));
    }

    let mut target_duration: Option<u64> = None;
    let mut playlist = MediaPlaylist {
        version: None,
        target_duration: 0,
        media_sequence: 0,
        discontinuity_sequence: None,
        playlist_type: None,
        independent_segments: false,
        start: None,
        extra_tags: Vec::new(),
        segments: Vec::new(),
        trailing_tags: Vec::new(),
        ended: false,
    };
    let mut pending = PendingSegment::default();

    for line in lines {
        if line.is_empty() {
            continue;
        }
        if !line.starts_with('#') {
            let segment = std::mem::take(&mut pending).into_segment(line)?;
            playlist.segments.push(segment);
            continue;
        }
        if !line.starts_with("#EXT") {
            // Comment line, not part of the playlist.
            continue;
        }

        if let Some(value) = line.strip_prefix("#EXT-X-VERSION:") {
            playlist.version = Some(parse_number(value, "EXT-X-VERSION")?);
        } else if let Some(value) = line.strip_prefix("#EXT-X-TARGETDURATION:") {
            target_duration = Some(parse_number(value, "EXT-X-TARGETDURATION")?);
        } else if let Some(value) = line.strip_prefix("#EXT-X-MEDIA-SEQUENCE:") {
            playlist.media_sequence = parse_number(value, "EXT-X-MEDIA-SEQUENCE")?;
        } else if let Some(value) = line.strip_prefix("#EXT-X-DISCONTINUITY-SEQUENCE:") {
            playlist.discontinuity_sequence =
                Some(parse_number(value, "EXT-X-DISCONTINUITY-SEQUENCE")?);
        } else if let Some(value) = line.strip_prefix("#EXT-X-PLAYLIST-TYPE:") {
            playlist.playlist_type = Some(match value {
                "VOD" => PlaylistType::Vod,
                "EVENT" => PlaylistType::Event,
                other => return Err(PlaylistError::malformed("EXT-X-PLAYLIST-TYPE", other)),
            });
        } else if line == "#EXT-X-INDEPENDENT-SEGMENTS" {
            playlist.independent_segments = true;
        } else if let Some(value) = line.strip_prefix("#EXT-X-START:") {
            playlist.start = Some(parse_start(value)?);
        } else if line == "#EXT-X-ENDLIST" {
            playlist.ended = true;
        } else if let Some(value) = line.strip_prefix("#EXTINF:") {
            pending.extinf = Some(parse_extinf(value)?);
        } else if line == "#EXT-X-DISCONTINUITY" {
            pending.discontinuity = true;
        } else if line == "#EXT-X-CUE-IN" {
            pending.markers.push(Marker::AdBreakIn);
        } else if let Some(rest) = line.strip_prefix("#EXT-X-CUE-OUT") {
            match rest.strip_prefix(':') {
                Some(value) => pending.markers.push(Marker::AdBreakOut {
                    duration_secs: parse_cue_out(value)?,
                }),
                // The bare form, EXT-X-CUE-OUT-CONT, and friends pass
                // through untouched.
                None => push_extra(&mut playlist, &mut pending, line),
            }
        } else {
            push_extra(&mut playlist, &mut pending, line);
        }
    }

    playlist.trailing_tags = pending.into_trailing_tags();
    playlist.target_duration = target_duration.ok_or(PlaylistError::MissingTargetDuration)?;
    Ok(Playlist::Media(playlist))
}

/// Unrecognized tags keep their position relative to segments: tags seen
/// before any segment content belong to the playlist header, the rest
/// travel with the next segment.
fn push_extra(playlist: &mut MediaPlaylist, pending: &mut PendingSegment, line: &str) {
    if playlist.segments.is_empty() && !pending.has_segment_content() {
        playlist.extra_tags.push(line.to_string());
    } else {
        pending.extra_tags.push(line.to_string());
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, tag: &'static str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PlaylistError::malformed(tag, value))
}

fn parse_extinf(value: &str) -> Result<(f64, Option<String>)> {
    let (duration, title) = match value.split_once(',') {
        Some((duration, title)) => (duration, title),
        None => (value, ""),
    };
    let duration = duration
        .trim()
        .parse()
        .map_err(|_| PlaylistError::malformed("EXTINF", value))?;
    let title = if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    };
    Ok((duration, title))
}

fn parse_start(value: &str) -> Result<Start> {
    let mut offset_secs = None;
    let mut precise = false;
    for attr in value.split(',') {
        match attr.split_once('=') {
            Some(("TIME-OFFSET", offset)) => {
                offset_secs = Some(
                    offset
                        .trim()
                        .parse()
                        .map_err(|_| PlaylistError::malformed("EXT-X-START", value))?,
                );
            }
            Some(("PRECISE", flag)) => precise = flag == "YES",
            _ => return Err(PlaylistError::malformed("EXT-X-START", value)),
        }
    }
    Ok(Start {
        offset_secs: offset_secs.ok_or_else(|| PlaylistError::malformed("EXT-X-START", value))?,
        precise,
    })
}

/// Both `#EXT-X-CUE-OUT:300` and `#EXT-X-CUE-OUT:DURATION=300` occur in the
/// wild; accept either.
fn parse_cue_out(value: &str) -> Result<f64> {
    let duration = value.strip_prefix("DURATION=").unwrap_or(value);
    duration
        .trim()
        .parse()
        .map_err(|_| PlaylistError::malformed("EXT-X-CUE-OUT", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIVE: &str = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-TARGETDURATION:6\n\
        #EXT-X-MEDIA-SEQUENCE:270\n\
        #EXTINF:6.006,\n\
        seg270.ts\n\
        #EXTINF:6.006,\n\
        seg271.ts\n\
        #EXTINF:5.972,\n\
        seg272.ts\n";

    const MASTER: &str = "#EXTM3U\n\
        #EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080\n\
        high/index.m3u8\n\
        #EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720\n\
        low/index.m3u8\n";

    fn media(playlist: Playlist) -> MediaPlaylist {
        match playlist {
            Playlist::Media(media) => media,
            Playlist::Master(_) => panic!("expected a media playlist"),
        }
    }

    #[test]
    fn parses_live_media_playlist() {
        let playlist = media(parse(LIVE).unwrap());

        assert_eq!(playlist.version, Some(3));
        assert_eq!(playlist.target_duration, 6);
        assert_eq!(playlist.media_sequence, 270);
        assert_eq!(playlist.segments.len(), 3);
        assert_eq!(playlist.segments[0].uri, "seg270.ts");
        assert_eq!(playlist.segments[2].duration, 5.972);
        assert!(!playlist.ended);
    }

    #[test]
    fn classifies_master_playlist_and_keeps_source() {
        match parse(MASTER).unwrap() {
            Playlist::Master(master) => assert_eq!(master.render(), MASTER),
            Playlist::Media(_) => panic!("expected a master playlist"),
        }
    }

    #[test]
    fn media_playlist_round_trips() {
        let playlist = parse(LIVE).unwrap();
        assert_eq!(playlist.render(), LIVE);
    }

    #[test]
    fn unknown_tags_survive_in_position() {
        let text = "#EXTM3U\n\
            #EXT-X-TARGETDURATION:6\n\
            #EXT-X-MEDIA-SEQUENCE:0\n\
            #EXT-X-MAP:URI=\"init.mp4\"\n\
            #EXT-X-PROGRAM-DATE-TIME:2024-05-01T00:00:00Z\n\
            #EXTINF:6,\n\
            seg0.ts\n";

        let playlist = media(parse(text).unwrap());
        assert_eq!(playlist.extra_tags, vec!["#EXT-X-MAP:URI=\"init.mp4\""]);
        assert_eq!(
            playlist.segments[0].extra_tags,
            vec!["#EXT-X-PROGRAM-DATE-TIME:2024-05-01T00:00:00Z"]
        );
        assert_eq!(parse(text).unwrap().render(), text);
    }

    #[test]
    fn trailing_tags_survive_round_trip() {
        let text = "#EXTM3U\n\
            #EXT-X-TARGETDURATION:6\n\
            #EXT-X-MEDIA-SEQUENCE:0\n\
            #EXTINF:6,\n\
            seg0.ts\n\
            #EXT-X-PROGRAM-DATE-TIME:2024-05-01T00:00:06Z\n";

        let playlist = media(parse(text).unwrap());
        assert_eq!(
            playlist.trailing_tags,
            vec!["#EXT-X-PROGRAM-DATE-TIME:2024-05-01T00:00:06Z"]
        );
        assert_eq!(parse(text).unwrap().render(), text);
    }

    #[test]
    fn trailing_cue_in_survives_round_trip() {
        let text = "#EXTM3U\n\
            #EXT-X-TARGETDURATION:6\n\
            #EXT-X-MEDIA-SEQUENCE:0\n\
            #EXT-X-CUE-OUT:30\n\
            #EXTINF:6,\n\
            ad0.ts\n\
            #EXT-X-CUE-IN\n";

        let playlist = media(parse(text).unwrap());
        assert_eq!(playlist.trailing_tags, vec!["#EXT-X-CUE-IN"]);
        assert_eq!(parse(text).unwrap().render(), text);
    }

    #[test]
    fn bare_cue_out_round_trips_verbatim() {
        let text = "#EXTM3U\n\
            #EXT-X-TARGETDURATION:6\n\
            #EXT-X-MEDIA-SEQUENCE:0\n\
            #EXTINF:6,\n\
            seg0.ts\n\
            #EXT-X-CUE-OUT\n\
            #EXTINF:6,\n\
            ad0.ts\n";

        let playlist = media(parse(text).unwrap());
        assert_eq!(playlist.segments[1].extra_tags, vec!["#EXT-X-CUE-OUT"]);
        assert!(playlist.segments[1].markers.is_empty());
        assert_eq!(parse(text).unwrap().render(), text);
    }

    #[test]
    fn parses_cue_markers() {
        let text = "#EXTM3U\n\
            #EXT-X-TARGETDURATION:6\n\
            #EXT-X-CUE-OUT:DURATION=30\n\
            #EXTINF:6,\n\
            ad0.ts\n\
            #EXT-X-CUE-IN\n\
            #EXTINF:6,\n\
            seg0.ts\n";

        let playlist = media(parse(text).unwrap());
        assert_eq!(
            playlist.segments[0].markers,
            vec![Marker::AdBreakOut {
                duration_secs: 30.0
            }]
        );
        assert_eq!(playlist.segments[1].markers, vec![Marker::AdBreakIn]);
    }

    #[test]
    fn parses_start_tag() {
        let text = "#EXTM3U\n\
            #EXT-X-TARGETDURATION:6\n\
            #EXT-X-START:TIME-OFFSET=-18,PRECISE=YES\n\
            #EXTINF:6,\n\
            seg0.ts\n";

        let playlist = media(parse(text).unwrap());
        assert_eq!(
            playlist.start,
            Some(Start {
                offset_secs: -18.0,
                precise: true
            })
        );
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            parse("#EXT-X-TARGETDURATION:6\n"),
            Err(PlaylistError::MissingHeader)
        ));
    }

    #[test]
    fn rejects_missing_target_duration() {
        assert!(matches!(
            parse("#EXTM3U\n#EXTINF:6,\nseg0.ts\n"),
            Err(PlaylistError::MissingTargetDuration)
        ));
    }

    #[test]
    fn rejects_uri_without_extinf() {
        assert!(matches!(
            parse("#EXTM3U\n#EXT-X-TARGETDURATION:6\nseg0.ts\n"),
            Err(PlaylistError::UriWithoutExtinf { .. })
        ));
    }
}
