//! HTTP server and graceful shutdown.
//!
//! # Graceful shutdown
//!
//! On **SIGTERM** or **Ctrl-C** the server:
//! 1. Immediately stops `listener.accept()`, so no new connections are made.
//! 2. Lets every in-flight connection task run to completion.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::middleware::cors;
use crate::middleware::trace::RequestTrace;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Route, Router};
use crate::status::Status;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// ```rust
    /// use postboard::Server;
    /// let server = Server::bind("0.0.0.0:5002").unwrap();
    /// ```
    pub fn bind(addr: &str) -> Result<Self, Error> {
        let addr = addr.parse().map_err(|source| Error::Addr {
            addr: addr.to_owned(),
            source,
        })?;
        Ok(Self { addr })
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve<S>(self, router: Router<S>) -> Result<(), Error>
    where
        S: Send + Sync + 'static,
    {
        let listener = TcpListener::bind(self.addr).await?;
        serve_with_shutdown(listener, router, shutdown_signal()).await
    }
}

/// Serves `router` on an already-bound listener until `shutdown` resolves,
/// then drains in-flight connections.
///
/// Binding port `0` and reading `listener.local_addr()` first is how the
/// integration tests get an ephemeral port.
pub async fn serve_with_shutdown<S, F>(
    listener: TcpListener,
    router: Router<S>,
    shutdown: F,
) -> Result<(), Error>
where
    S: Send + Sync + 'static,
    F: Future<Output = ()>,
{
    let router = Arc::new(router);
    let local_addr = listener.local_addr()?;

    info!(addr = %local_addr, "postboard listening");

    // JoinSet tracks every spawned connection task so shutdown can wait on them.
    let mut tasks = tokio::task::JoinSet::new();

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // Shutdown is checked first so a SIGTERM stops accepting even
            // while connections are still queued.
            biased;

            () = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let router = Arc::clone(&router);
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    // Called once per request on the connection.
                    let svc = service_fn(move |req| {
                        let router = Arc::clone(&router);
                        async move { dispatch(router, req).await }
                    });

                    // HTTP/1.1 and HTTP/2, whichever the client negotiates.
                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the JoinSet stays bounded.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}

    info!("postboard stopped");
    Ok(())
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request and produces one response.
///
/// Every failure becomes a response (400, 404, 405, 413), so hyper never sees an
/// error.
async fn dispatch<S>(
    router: Arc<Router<S>>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible>
where
    S: Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();
    let trace = RequestTrace::start(&parts.method, parts.uri.path());

    let mut response = route(&router, parts, body).await;
    cors::decorate(&mut response);

    trace.finish(&response);
    Ok(response.into_inner())
}

async fn route<S>(
    router: &Router<S>,
    parts: http::request::Parts,
    body: hyper::body::Incoming,
) -> Response
where
    S: Send + Sync + 'static,
{
    let Ok(method) = Method::try_from(&parts.method) else {
        return Response::error(Status::MethodNotAllowed, Status::MethodNotAllowed.reason());
    };
    let path = parts.uri.path();

    if method == Method::Options {
        let allowed = router.allowed_methods(path);
        if allowed.is_empty() {
            return Response::error(Status::NotFound, Status::NotFound.reason());
        }
        let requested = parts
            .headers
            .get("access-control-request-headers")
            .and_then(|v| v.to_str().ok());
        return cors::preflight(&allowed, requested);
    }

    match router.lookup(method, path) {
        Route::Found(handler, params) => {
            let body = match read_body(body, MAX_BODY_BYTES).await {
                Ok(bytes) => bytes,
                Err(res) => return res,
            };
            let req = Request::new(method, &parts, body, params);
            let mut res = handler.call(req, Arc::clone(router.state())).await;
            // HEAD answers like GET, minus the body.
            if method == Method::Head {
                res.body = Bytes::new();
            }
            res
        }
        Route::MethodNotAllowed(allowed) => {
            let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
            let mut res = Response::error(Status::MethodNotAllowed, Status::MethodNotAllowed.reason());
            res.set_header("allow", &allow);
            res
        }
        Route::NotFound => Response::error(Status::NotFound, Status::NotFound.reason()),
    }
}

/// Largest request body a handler will see.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Buffers a request body, refusing anything over `limit` bytes with `413`.
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, Response>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            warn!(limit, "request body too large");
            Err(Response::error(Status::ContentTooLarge, Status::ContentTooLarge.reason()))
        }
        Err(e) => {
            error!("failed to read request body: {e}");
            Err(Response::error(Status::BadRequest, Status::BadRequest.reason()))
        }
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C).
/// On Windows only Ctrl-C is available. A handler that cannot be installed
/// is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
