//! Per-request tracing.

use std::time::Instant;

use tracing::{info, warn};

use crate::response::Response;

/// Started when a request arrives; finished with the response it produced.
pub struct RequestTrace {
    method: String,
    path: String,
    started: Instant,
}

impl RequestTrace {
    pub fn start(method: &http::Method, path: &str) -> Self {
        Self { method: method.to_string(), path: path.to_owned(), started: Instant::now() }
    }

    /// Emits one event. Client and server errors are logged at `warn`.
    pub fn finish(self, res: &Response) {
        let status = u16::from(res.status_code());
        let latency_us = self.started.elapsed().as_micros() as u64;
        if status >= 400 {
            warn!(method = %self.method, path = %self.path, status, latency_us, "request failed");
        } else {
            info!(method = %self.method, path = %self.path, status, latency_us, "request");
        }
    }
}
