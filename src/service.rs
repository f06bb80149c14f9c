//! The public comment operations: orchestration of the tree algorithms with
//! authorization and post-existence checks.
//!
//! Caller identity is threaded explicitly through every operation as a
//! pre-validated `user_id`; there is no ambient session state, and this layer
//! performs no authentication of its own.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    errors::CommentError,
    model::{CommentNode, CommentRecord},
    store::CommentStore,
    tree,
};

/// External collaborator answering whether a post exists. The post entity's
/// own lifecycle is out of scope here; only existence is ever checked.
#[allow(async_fn_in_trait)]
pub trait PostDirectory {
    async fn post_exists(&self, post_id: &str) -> Result<bool, CommentError>;
}

/// External collaborator resolving an author id to a display name.
///
/// This is the only author data that can cross this seam; credential and
/// verification fields stay on the other side. A missing profile resolves to
/// `None`, and the comment is rendered with just the author id.
#[allow(async_fn_in_trait)]
pub trait ProfileResolver {
    async fn display_name(&self, author_id: &str) -> Result<Option<String>, CommentError>;
}

/// Result of creating a top-level comment: the new record plus the updated
/// count of top-level comments on the post.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedComment {
    pub record: CommentRecord,
    pub comment_count: u64,
}

/// A post's full comment forest, newest top-level comment first.
#[derive(Debug, Clone, Serialize)]
pub struct CommentListing {
    pub total_comments: u64,
    pub comments: Vec<CommentNode>,
}

/// Orchestrates the four public comment operations over a store, a post
/// directory, and a profile resolver.
pub struct CommentService<S, P, R> {
    store: S,
    posts: P,
    profiles: R,
}

impl<S, P, R> CommentService<S, P, R>
where
    S: CommentStore,
    P: PostDirectory,
    R: ProfileResolver,
{
    pub fn new(store: S, posts: P, profiles: R) -> Self {
        Self { store, posts, profiles }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a top-level comment to a post.
    ///
    /// Fails with `PostNotFound` if the post does not exist and `EmptyText`
    /// if the text is empty.
    pub async fn add_comment(
        &self,
        user_id: &str,
        post_id: &str,
        text: &str,
    ) -> Result<CreatedComment, CommentError> {
        if !self.posts.post_exists(post_id).await? {
            return Err(CommentError::PostNotFound {
                post_id: post_id.to_string(),
            });
        }
        if text.is_empty() {
            return Err(CommentError::EmptyText);
        }

        let record = CommentRecord::top_level(user_id, post_id, text);
        self.store.insert(&record).await?;
        let comment_count = self.store.count_by_post(post_id).await?;
        log::debug!("user {user_id} commented on post {post_id} (comment {})", record.id);
        Ok(CreatedComment { record, comment_count })
    }

    /// Adds a reply under an existing comment. Replies may nest indefinitely;
    /// no depth limit is enforced.
    ///
    /// Fails with `EmptyText` if the text is empty and `CommentNotFound` if
    /// the parent comment does not exist.
    pub async fn add_reply(
        &self,
        user_id: &str,
        parent_comment_id: &str,
        text: &str,
    ) -> Result<CommentRecord, CommentError> {
        if text.is_empty() {
            return Err(CommentError::EmptyText);
        }
        if self.store.find_by_id(parent_comment_id).await?.is_none() {
            return Err(CommentError::CommentNotFound {
                comment_id: parent_comment_id.to_string(),
            });
        }

        let record = CommentRecord::reply(user_id, parent_comment_id, text);
        self.store.insert(&record).await?;
        log::debug!("user {user_id} replied to comment {parent_comment_id} (reply {})", record.id);
        Ok(record)
    }

    /// Deletes a comment or reply and its entire subtree. Returns the number
    /// of records removed.
    ///
    /// Only the original author may delete; there is no moderator override,
    /// and the rule is the same whether the target is top-level or a reply.
    /// Fails with `CommentNotFound` if the target is absent and `NotAuthor`
    /// if the caller does not own it. See [`tree::delete_subtree`] for the
    /// partial-failure contract.
    pub async fn delete_comment(&self, user_id: &str, comment_id: &str) -> Result<u64, CommentError> {
        let record = self
            .store
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| CommentError::CommentNotFound {
                comment_id: comment_id.to_string(),
            })?;
        if record.author_id != user_id {
            return Err(CommentError::NotAuthor {
                comment_id: comment_id.to_string(),
                user_id: user_id.to_string(),
            });
        }

        let deleted = tree::delete_subtree(&self.store, comment_id).await?;
        log::debug!("user {user_id} deleted comment {comment_id} ({deleted} nodes)");
        Ok(deleted)
    }

    /// Returns the post's full comment forest with author display names
    /// resolved.
    ///
    /// `user_id` is accepted for symmetry with the other operations but does
    /// not gate visibility; the tree is visible to any authenticated caller.
    /// Fails with `PostNotFound` if the post does not exist.
    pub async fn list_comments(&self, user_id: &str, post_id: &str) -> Result<CommentListing, CommentError> {
        if !self.posts.post_exists(post_id).await? {
            return Err(CommentError::PostNotFound {
                post_id: post_id.to_string(),
            });
        }

        let mut comments = tree::list_top_level(&self.store, post_id).await?;
        self.resolve_authors(&mut comments).await?;
        log::debug!("user {user_id} listed {} comment trees for post {post_id}", comments.len());
        Ok(CommentListing {
            total_comments: comments.len() as u64,
            comments,
        })
    }

    /// Fills in display names across a forest, asking the resolver once per
    /// distinct author.
    async fn resolve_authors(&self, comments: &mut [CommentNode]) -> Result<(), CommentError> {
        let mut names: HashMap<String, Option<String>> = HashMap::new();
        let mut stack: Vec<&mut CommentNode> = comments.iter_mut().collect();
        while let Some(node) = stack.pop() {
            let CommentNode { author, children, .. } = node;
            let display_name = match names.get(&author.id) {
                Some(cached) => cached.clone(),
                None => {
                    let resolved = self.profiles.display_name(&author.id).await?;
                    names.insert(author.id.clone(), resolved.clone());
                    resolved
                }
            };
            author.display_name = display_name;
            stack.extend(children.iter_mut());
        }
        Ok(())
    }
}
