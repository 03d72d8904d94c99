//! Error types for cuesplice-hls.

use thiserror::Error;

/// Result type for cuesplice-hls operations.
pub type Result<T> = std::result::Result<T, PlaylistError>;

/// Error type for playlist parsing.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Input does not start with the #EXTM3U header line.
    #[error("not an M3U8 playlist: missing #EXTM3U header")]
    MissingHeader,

    /// Media playlist has no #EXT-X-TARGETDURATION tag.
    #[error("media playlist missing #EXT-X-TARGETDURATION")]
    MissingTargetDuration,

    /// A tag carried a value that could not be parsed.
    #[error("malformed {tag} tag: {value}")]
    MalformedTag { tag: &'static str, value: String },

    /// A segment URI appeared without a preceding #EXTINF.
    #[error("segment URI without a preceding #EXTINF: {uri}")]
    UriWithoutExtinf { uri: String },
}

impl PlaylistError {
    /// Create a malformed-tag error.
    pub fn malformed(tag: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedTag {
            tag,
            value: value.into(),
        }
    }
}
