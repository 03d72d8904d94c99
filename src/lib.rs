//! Cuesplice - preroll ad splicing for live HLS delivery
//!
//! Cuesplice sits between a content origin and the player, intercepts live
//! media playlists on their way through an edge point-of-presence, and
//! splices a preroll ad avail (CUE-OUT/CUE-IN marker pair) at the head of
//! the segment timeline. Master playlists pass through untouched.
//!
//! This library crate exposes the interceptor core for integration testing.

pub mod config;
pub mod edge;
pub mod server;
