//! Persistence abstraction for comment records.
//!
//! The store is a flat collection of [`CommentRecord`]s; nothing at this
//! layer knows about trees. Two implementations ship with the crate:
//! [`RedisCommentStore`] for production and [`MemoryCommentStore`] for tests
//! and embedders that do not want a Redis dependency.

mod memory;
mod redis;
mod scripts;

pub use self::memory::MemoryCommentStore;
pub use self::redis::RedisCommentStore;

use crate::{errors::CommentError, model::CommentRecord};

/// Contract consumed by the tree operations and the comment service.
///
/// `find_children` and `find_top_level` return records unordered; ordering
/// is applied by the tree layer.
#[allow(async_fn_in_trait)]
pub trait CommentStore {
    /// Persists a new record. The id was already assigned by the caller.
    async fn insert(&self, record: &CommentRecord) -> Result<(), CommentError>;

    /// Point lookup by id.
    async fn find_by_id(&self, comment_id: &str) -> Result<Option<CommentRecord>, CommentError>;

    /// All direct children of a comment.
    async fn find_children(&self, parent_id: &str) -> Result<Vec<CommentRecord>, CommentError>;

    /// All comments attached directly to a post (no parent).
    async fn find_top_level(&self, post_id: &str) -> Result<Vec<CommentRecord>, CommentError>;

    /// Removes exactly one record. Returns `false` if the id was absent;
    /// deleting a missing record is a no-op, which makes cascade retries safe.
    async fn delete_by_id(&self, comment_id: &str) -> Result<bool, CommentError>;

    /// Count of comments attached directly to a post. Replies carry no
    /// `post_id`, so this is the top-level count.
    async fn count_by_post(&self, post_id: &str) -> Result<u64, CommentError>;

    /// Full scan of every record. Consumed only by the maintenance sweep;
    /// request-path code never calls this.
    async fn scan_all(&self) -> Result<Vec<CommentRecord>, CommentError>;
}
