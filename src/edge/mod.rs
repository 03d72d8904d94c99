//! Edge interception core.
//!
//! One inbound edge request, one outbound origin fetch, one rewritten
//! response. The interceptor never fails the edge request: every error is
//! degraded to a 200-status diagnostic text body so the delivery path never
//! serves a hard error in place of a playlist.

pub mod event;
pub mod headers;
pub mod interceptor;
pub mod preroll;

pub use event::{CustomOrigin, EdgeRequestContext, EdgeResponse, HeaderEntry, Origin};
pub use interceptor::Interceptor;
pub use preroll::{splice_preroll, PrerollConfig};
