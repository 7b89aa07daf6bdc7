//! # postboard
//!
//! A small REST service over an in-memory collection of blog posts, plus the
//! minimal HTTP layer it runs on.
//!
//! ## Endpoints
//!
//! | Method | Path | |
//! |---|---|---|
//! | `GET` | `/api/posts?sort=title\|content&direction=asc\|desc` | list, optionally sorted |
//! | `POST` | `/api/posts` | create; `title` and `content` required |
//! | `GET` | `/api/posts/search?title=..&content=..` | case-insensitive substring search |
//! | `GET` | `/api/posts/{id}` | read one |
//! | `PUT` | `/api/posts/{id}` | merge fields into one |
//! | `DELETE` | `/api/posts/{id}` | remove one |
//! | `GET` | `/healthz`, `/readyz` | health checks |
//!
//! Errors are always `{"error": "<message>"}`. Every origin is allowed.
//!
//! ## The HTTP layer
//!
//! - Radix-tree routing, one tree per method, via [`matchit`]
//! - hyper 1.x connections, HTTP/1.1 and HTTP/2
//! - Graceful shutdown on SIGTERM / Ctrl-C, draining in-flight requests
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use postboard::{PostStore, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postboard::Error> {
//!     let app = postboard::app(Arc::new(PostStore::seeded()));
//!     Server::bind("127.0.0.1:5002")?.serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod posts;

use std::sync::Arc;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use posts::{Post, PostError, PostStore};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::{Server, serve_with_shutdown, shutdown_signal};
pub use status::Status;

/// The full post service routed over `store`.
pub fn app(store: Arc<PostStore>) -> Router<PostStore> {
    use posts::handlers::*;

    Router::with_state(store)
        .get("/api/posts",         list_posts)
        .post("/api/posts",        create_post)
        .get("/api/posts/search",  search_posts)
        .get("/api/posts/{id}",    get_post)
        .put("/api/posts/{id}",    update_post)
        .delete("/api/posts/{id}", delete_post)
        .get("/healthz",           health::liveness::<PostStore>)
        .get("/readyz",            health::readiness::<PostStore>)
}
