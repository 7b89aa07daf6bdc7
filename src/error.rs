//! Unified infrastructure error type.

use std::net::AddrParseError;

use crate::config::ConfigError;

/// The error type returned by postboard's fallible infrastructure operations.
///
/// Application-level errors (400, 404, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// failures outside a request: loading configuration, parsing the bind
/// address, binding to a port.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
