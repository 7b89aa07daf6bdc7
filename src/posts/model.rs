use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::PostError;

/// A client-supplied JSON object, as received by create and update.
pub type Payload = Map<String, Value>;

/// A stored post.
///
/// `id`, `title` and `content` are typed; any other field the client sent is
/// kept verbatim in `extra` and serialized next to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id, title: title.into(), content: content.into(), extra: Map::new() }
    }

    /// Validates a create payload and builds the post it describes.
    ///
    /// The title is checked before the content. A client `id` is discarded.
    pub(crate) fn from_payload(id: u64, mut payload: Payload) -> Result<Self, PostError> {
        let title = required_text(&payload, "title").ok_or(PostError::MissingTitle)?;
        let content = required_text(&payload, "content").ok_or(PostError::MissingContent)?;

        payload.remove("id");
        payload.remove("title");
        payload.remove("content");

        Ok(Self { id, title, content, extra: payload })
    }

    /// Merges `payload` over this post.
    ///
    /// Present keys overwrite, absent keys are kept. The `id` never changes.
    /// `title` and `content` must stay strings but may become empty. Nothing
    /// is written unless the whole payload is acceptable.
    pub(crate) fn merge(&mut self, mut payload: Payload) -> Result<(), PostError> {
        let title = optional_text(&payload, "title")?;
        let content = optional_text(&payload, "content")?;

        payload.remove("id");
        payload.remove("title");
        payload.remove("content");

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.extra.extend(payload);
        Ok(())
    }
}

fn required_text(payload: &Payload, key: &str) -> Option<String> {
    match payload.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn optional_text(payload: &Payload, key: &'static str) -> Result<Option<String>, PostError> {
    match payload.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(PostError::InvalidField(key)),
    }
}
