//! Cross-origin resource sharing.
//!
//! Every origin is allowed. Browsers get `access-control-allow-origin: *` on
//! every response, and `OPTIONS` preflights are answered here with
//! `204 No Content` without reaching a handler.

use crate::method::Method;
use crate::response::Response;
use crate::status::Status;

pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
pub const ALLOW_METHODS: &str = "access-control-allow-methods";
pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
pub const MAX_AGE: &str = "access-control-max-age";

/// Answers a preflight for a path whose routes accept `allowed`.
///
/// The requested headers are echoed back, so any header the client asks for
/// is permitted.
pub fn preflight(allowed: &[Method], requested_headers: Option<&str>) -> Response {
    let methods = allowed
        .iter()
        .chain(std::iter::once(&Method::Options))
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Response::builder()
        .status(Status::NoContent)
        .header(ALLOW_METHODS, &methods)
        .header(ALLOW_HEADERS, requested_headers.unwrap_or("*"))
        .header(MAX_AGE, "86400")
        .no_body()
}

/// Adds the allow-any-origin header to an outgoing response.
pub fn decorate(res: &mut Response) {
    res.set_header(ALLOW_ORIGIN, "*");
}
