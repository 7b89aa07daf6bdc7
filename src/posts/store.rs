use tokio::sync::Mutex;
use tracing::debug;

use super::error::PostError;
use super::model::{Payload, Post};
use super::query::{SearchQuery, Sort};

/// The in-memory post collection.
///
/// Every operation holds one exclusive lock for its whole duration, so id
/// assignment and read-modify-write updates never interleave. Concurrent
/// callers observe the same results as if requests ran one at a time.
#[derive(Debug, Default)]
pub struct PostStore {
    posts: Mutex<Vec<Post>>,
}

impl PostStore {
    /// An empty store. The first post created gets id `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two sample posts the service starts with.
    pub fn seeded() -> Self {
        Self {
            posts: Mutex::new(vec![
                Post::new(1, "First post", "This is the first post."),
                Post::new(2, "Second post", "This is the second post."),
            ]),
        }
    }

    /// All posts, in insertion order or as a sorted copy.
    pub async fn list(&self, sort: Option<Sort>) -> Vec<Post> {
        let mut posts = self.posts.lock().await.clone();
        if let Some(sort) = sort {
            sort.apply(&mut posts);
        }
        posts
    }

    pub async fn get(&self, id: u64) -> Result<Post, PostError> {
        let posts = self.posts.lock().await;
        posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(PostError::NotFound(id))
    }

    /// Validates `payload`, assigns `max id + 1` (or `1` when empty), and
    /// appends the post.
    pub async fn create(&self, payload: Payload) -> Result<Post, PostError> {
        let mut posts = self.posts.lock().await;
        let id = posts.iter().map(|p| p.id).max().map_or(1, |max| max + 1);
        let post = Post::from_payload(id, payload)?;
        posts.push(post.clone());
        debug!(id, total = posts.len(), "post created");
        Ok(post)
    }

    /// Merges `payload` into the post with `id` and returns the result.
    pub async fn update(&self, id: u64, payload: Payload) -> Result<Post, PostError> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PostError::NotFound(id))?;
        post.merge(payload)?;
        debug!(id, "post updated");
        Ok(post.clone())
    }

    /// Removes the post with `id`, keeping the order of the rest.
    pub async fn delete(&self, id: u64) -> Result<Post, PostError> {
        let mut posts = self.posts.lock().await;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(PostError::NotFound(id))?;
        let removed = posts.remove(index);
        debug!(id, total = posts.len(), "post deleted");
        Ok(removed)
    }

    /// Posts matching `query`, in insertion order.
    pub async fn search(&self, query: &SearchQuery) -> Vec<Post> {
        let posts = self.posts.lock().await;
        posts.iter().filter(|p| query.matches(p)).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.posts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.lock().await.is_empty()
    }
}
