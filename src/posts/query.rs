use std::cmp::Reverse;

use super::error::PostError;
use super::model::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
}

impl SortField {
    fn key(self, post: &Post) -> String {
        match self {
            Self::Title => post.title.to_lowercase(),
            Self::Content => post.content.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// A validated `?sort=&direction=` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}

impl Sort {
    /// Validates raw query values. Empty strings count as absent.
    ///
    /// Returns `Ok(None)` when no sort field was requested. The direction is
    /// validated even then.
    pub fn parse(field: Option<&str>, direction: Option<&str>) -> Result<Option<Self>, PostError> {
        let direction = match direction.filter(|d| !d.is_empty()) {
            None | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => return Err(PostError::InvalidDirection(other.to_owned())),
        };
        let field = match field.filter(|f| !f.is_empty()) {
            None => return Ok(None),
            Some("title") => SortField::Title,
            Some("content") => SortField::Content,
            Some(other) => return Err(PostError::InvalidSortField(other.to_owned())),
        };
        Ok(Some(Self { field, direction }))
    }

    /// Stable sort by the lowercased field. Ties keep their relative order in
    /// both directions.
    pub(crate) fn apply(self, posts: &mut [Post]) {
        match self.direction {
            Direction::Asc => posts.sort_by_cached_key(|p| self.field.key(p)),
            Direction::Desc => posts.sort_by_cached_key(|p| Reverse(self.field.key(p))),
        }
    }
}

/// Case-insensitive substring filters on title and content.
///
/// Both are trimmed and lowercased on construction; an empty filter matches
/// every post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    title: String,
    content: String,
}

impl SearchQuery {
    pub fn new(title: Option<&str>, content: Option<&str>) -> Self {
        Self { title: normalize(title), content: normalize(content) }
    }

    pub fn matches(&self, post: &Post) -> bool {
        contains(&post.title, &self.title) && contains(&post.content, &self.content)
    }
}

fn normalize(raw: Option<&str>) -> String {
    raw.unwrap_or_default().trim().to_lowercase()
}

fn contains(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}
