use thiserror::Error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Everything a post operation can refuse to do.
///
/// Each variant renders as `{"error": "<message>"}` with the status from
/// [`PostError::status`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostError {
    #[error("Invalid sort field. Use 'title' or 'content'.")]
    InvalidSortField(String),

    #[error("Invalid direction. Use 'asc' or 'desc'.")]
    InvalidDirection(String),

    #[error("Incorrect Post Data, the title is missing from the post")]
    MissingTitle,

    #[error("Incorrect Post Data, the content is missing from the post")]
    MissingContent,

    #[error("Incorrect Post Data, the {0} must be a string")]
    InvalidField(&'static str),

    #[error("Bad Request")]
    MalformedBody,

    #[error("Post with id {0} not found")]
    NotFound(u64),

    /// A path id that is not a non-negative integer; no post can have it.
    #[error("Post with id {0} not found")]
    UnknownId(String),
}

impl PostError {
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidSortField(_)
            | Self::InvalidDirection(_)
            | Self::MissingTitle
            | Self::MissingContent
            | Self::InvalidField(_)
            | Self::MalformedBody => Status::BadRequest,
            Self::NotFound(_) | Self::UnknownId(_) => Status::NotFound,
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        Response::error(self.status(), self.to_string())
    }
}
