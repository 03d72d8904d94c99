//! Cuesplice-HLS: M3U8 playlist parsing, mutation, and serialization
//!
//! This crate provides the manifest layer for cuesplice. It parses HLS
//! playlists into a typed model, classifies master (variant-list) playlists
//! apart from media (time-indexed) playlists, and serializes the model back
//! to M3U8 text.
//!
//! # Modules
//!
//! - `playlist` - Typed playlist model (media/master, segments, ad markers)
//! - `parse` - Line-oriented M3U8 parser
//! - `error` - Parse error types
//!
//! # Fidelity
//!
//! Media playlists round-trip with value fidelity: tags the parser does not
//! model are carried through verbatim, in order, at both the playlist and
//! segment level. Master playlists are never mutated by cuesplice, so the
//! model keeps their source text untouched.

pub mod error;
pub mod parse;
pub mod playlist;

pub use error::{PlaylistError, Result};
pub use parse::parse;
pub use playlist::{
    Marker, MasterPlaylist, MediaPlaylist, Playlist, PlaylistType, Segment, Start,
};
