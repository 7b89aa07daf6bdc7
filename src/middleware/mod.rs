//! Middleware layer.
//!
//! Cross-cutting concerns applied to every request on its way through
//! [`Server`](crate::Server), independent of which handler answers it.
//!
//! - [`cors`]: permissive cross-origin headers and `OPTIONS` preflight
//! - [`trace`]: one structured event per request with method, path, status, latency

pub mod cors;
pub mod trace;
