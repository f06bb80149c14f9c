use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_comment_id;

/// A stored comment. A "reply" is simply a comment whose `parent_id` is set.
///
/// Exactly one of `post_id` / `parent_id` is present on any record: a comment
/// belongs either directly to a post (top-level) or to a parent comment
/// (reply), never both, never neither. The constructors below are the only
/// ways this crate creates records, so the invariant holds by construction.
///
/// Records are immutable once stored. There is no edit operation; the only
/// mutation is the cascade delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    /// A comment attached directly to a post.
    pub fn top_level(author_id: impl Into<String>, post_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: generate_comment_id(),
            author_id: author_id.into(),
            post_id: Some(post_id.into()),
            parent_id: None,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// A reply attached to another comment.
    pub fn reply(author_id: impl Into<String>, parent_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: generate_comment_id(),
            author_id: author_id.into(),
            post_id: None,
            parent_id: Some(parent_id.into()),
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Public-safe author projection. Carries the display name and nothing else;
/// credential and verification fields never pass through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// One node of a materialized comment tree.
///
/// `children` holds the node's replies in ascending `created_at` order
/// (oldest reply first). The tree is a snapshot; mutations made after it was
/// built are not reflected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: String,
    pub text: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub children: Vec<CommentNode>,
}
