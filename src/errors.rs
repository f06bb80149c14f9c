use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by every weft operation.
#[derive(Debug, Error)]
pub enum CommentError {
    /// The target post does not exist.
    #[error("post not found: {post_id}")]
    PostNotFound { post_id: String },

    /// The target comment (or parent comment) does not exist.
    #[error("comment not found: {comment_id}")]
    CommentNotFound { comment_id: String },

    /// Comment text was empty.
    #[error("text is required")]
    EmptyText,

    /// A delete was attempted by someone other than the comment's author.
    #[error("user {user_id} is not the author of comment {comment_id}")]
    NotAuthor { comment_id: String, user_id: String },

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Store(#[from] redis::RedisError),

    /// A stored document could not be encoded or decoded.
    #[error("codec error: {message}")]
    Codec { message: Cow<'static, str> },

    /// A cascade delete aborted after removing some of the subtree.
    ///
    /// This is a data-integrity event, not a transient failure: the deleted
    /// nodes are gone and cannot be restored. Re-running the delete is safe
    /// (removing an absent record is a no-op) and will finish the cascade
    /// once the store recovers.
    #[error("partial delete of comment {comment_id}: {deleted} nodes removed before the cascade aborted")]
    PartialDelete {
        comment_id: String,
        deleted: u64,
        #[source]
        source: Box<CommentError>,
    },

    /// Catch-all for failures that have no dedicated variant.
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

/// Coarse classification of a [`CommentError`], for callers that map errors
/// onto a transport (e.g. HTTP status codes) without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Forbidden,
    Store,
}

impl CommentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommentError::PostNotFound { .. } | CommentError::CommentNotFound { .. } => ErrorKind::NotFound,
            CommentError::EmptyText => ErrorKind::InvalidInput,
            CommentError::NotAuthor { .. } => ErrorKind::Forbidden,
            CommentError::Store(_)
            | CommentError::Codec { .. }
            | CommentError::PartialDelete { .. }
            | CommentError::Other { .. } => ErrorKind::Store,
        }
    }

    pub(crate) fn codec(err: serde_json::Error) -> Self {
        CommentError::Codec {
            message: Cow::Owned(err.to_string()),
        }
    }
}
