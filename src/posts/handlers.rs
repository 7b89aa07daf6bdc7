//! HTTP handlers for `/api/posts`.
//!
//! Each handler parses what it needs from the [`Request`], makes one store
//! call, and renders the outcome. Failures are [`PostError`]s, which render
//! themselves as `{"error": "..."}`.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use super::{Payload, PostError, PostStore, SearchQuery, Sort};
use crate::{Request, Response, Status};

type HandlerResult = Result<Response, PostError>;

/// `GET /api/posts?sort=title|content&direction=asc|desc`
pub async fn list_posts(req: Request, store: Arc<PostStore>) -> HandlerResult {
    let sort = Sort::parse(req.query("sort"), req.query("direction"))?;
    Ok(Response::json(&store.list(sort).await))
}

/// `POST /api/posts`
pub async fn create_post(req: Request, store: Arc<PostStore>) -> HandlerResult {
    let post = store.create(payload(&req)?).await?;
    Ok(Response::builder()
        .status(Status::Created)
        .header("location", &format!("/api/posts/{}", post.id))
        .json(&post))
}

/// `GET /api/posts/{id}`
pub async fn get_post(req: Request, store: Arc<PostStore>) -> HandlerResult {
    let post = store.get(post_id(&req)?).await?;
    Ok(Response::json(&post))
}

/// `PUT /api/posts/{id}`
pub async fn update_post(req: Request, store: Arc<PostStore>) -> HandlerResult {
    let id = post_id(&req)?;
    // A missing post is a 404 whatever the body holds.
    store.get(id).await?;
    let post = store.update(id, payload(&req)?).await?;
    Ok(Response::json(&post))
}

/// `DELETE /api/posts/{id}`
pub async fn delete_post(req: Request, store: Arc<PostStore>) -> HandlerResult {
    let id = post_id(&req)?;
    store.delete(id).await?;
    Ok(Response::json(&json!({
        "message": format!("Post with id {id} has been deleted successfully.")
    })))
}

/// `GET /api/posts/search?title=..&content=..`
pub async fn search_posts(req: Request, store: Arc<PostStore>) -> HandlerResult {
    let query = SearchQuery::new(req.query("title"), req.query("content"));
    Ok(Response::json(&store.search(&query).await))
}

fn post_id(req: &Request) -> Result<u64, PostError> {
    let raw = req.param("id").unwrap_or_default();
    raw.parse().map_err(|_| PostError::UnknownId(raw.to_owned()))
}

/// The body as a JSON object. Anything else is a malformed request.
fn payload(req: &Request) -> Result<Payload, PostError> {
    req.json::<Payload>().map_err(|e| {
        warn!(path = req.path(), "rejected request body: {e}");
        PostError::MalformedBody
    })
}
