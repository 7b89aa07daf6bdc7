//! Health-check handlers.
//!
//! | Check | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the service take traffic? Failure → pulled from the load balancer. |
//!
//! Both are generic over the router state, so they register on any router:
//!
//! ```rust
//! use postboard::{Router, health};
//!
//! let app = Router::new(())
//!     .get("/healthz", health::liveness::<()>)
//!     .get("/readyz", health::readiness::<()>);
//! ```

use std::sync::Arc;

use crate::{Request, Response};

/// Liveness check handler.
///
/// Always returns `200 OK` with body `"ok"`. If the process can respond to
/// HTTP at all, it is alive.
pub async fn liveness<S>(_req: Request, _state: Arc<S>) -> Response {
    Response::text("ok")
}

/// Readiness check handler.
///
/// Returns `200 OK` with body `"ready"`. The post store lives in memory and
/// is built before the listener opens, so there is nothing to wait on.
pub async fn readiness<S>(_req: Request, _state: Arc<S>) -> Response {
    Response::text("ready")
}
