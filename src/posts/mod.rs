//! The post collection and its HTTP surface.
//!
//! [`PostStore`] owns the records and is the only way to reach them;
//! [`handlers`] translate requests into store calls and store results into
//! responses.

mod error;
mod model;
mod query;
mod store;

pub mod handlers;

pub use error::PostError;
pub use model::{Payload, Post};
pub use query::{Direction, SearchQuery, Sort, SortField};
pub use store::PostStore;
