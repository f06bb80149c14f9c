#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use weft::{CommentError, CommentRecord, CommentStore, MemoryCommentStore, PostDirectory, ProfileResolver};

/// Post directory over a fixed set of post ids.
pub struct StaticPosts {
    ids: HashSet<String>,
}

impl StaticPosts {
    pub fn with(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl PostDirectory for StaticPosts {
    async fn post_exists(&self, post_id: &str) -> Result<bool, CommentError> {
        Ok(self.ids.contains(post_id))
    }
}

/// Profile resolver over a fixed author-to-name table; unknown authors
/// resolve to `None`.
pub struct StaticProfiles {
    names: HashMap<String, String>,
}

impl StaticProfiles {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            names: entries
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self { names: HashMap::new() }
    }
}

impl ProfileResolver for StaticProfiles {
    async fn display_name(&self, author_id: &str) -> Result<Option<String>, CommentError> {
        Ok(self.names.get(author_id).cloned())
    }
}

/// Memory store with a single injectable fault: deleting one configured id
/// fails until the fault is cleared.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryCommentStore,
    fail_delete_of: Mutex<Option<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_delete_of(&self, comment_id: &str) {
        *self.fail_delete_of.lock().expect("fault lock") = Some(comment_id.to_string());
    }

    pub fn clear_fault(&self) {
        *self.fail_delete_of.lock().expect("fault lock") = None;
    }

    pub fn inner(&self) -> &MemoryCommentStore {
        &self.inner
    }
}

impl CommentStore for FlakyStore {
    async fn insert(&self, record: &CommentRecord) -> Result<(), CommentError> {
        self.inner.insert(record).await
    }

    async fn find_by_id(&self, comment_id: &str) -> Result<Option<CommentRecord>, CommentError> {
        self.inner.find_by_id(comment_id).await
    }

    async fn find_children(&self, parent_id: &str) -> Result<Vec<CommentRecord>, CommentError> {
        self.inner.find_children(parent_id).await
    }

    async fn find_top_level(&self, post_id: &str) -> Result<Vec<CommentRecord>, CommentError> {
        self.inner.find_top_level(post_id).await
    }

    async fn delete_by_id(&self, comment_id: &str) -> Result<bool, CommentError> {
        let is_fault = self
            .fail_delete_of
            .lock()
            .expect("fault lock")
            .as_deref()
            .is_some_and(|target| target == comment_id);
        if is_fault {
            return Err(CommentError::Other {
                message: "injected delete failure".into(),
            });
        }
        self.inner.delete_by_id(comment_id).await
    }

    async fn count_by_post(&self, post_id: &str) -> Result<u64, CommentError> {
        self.inner.count_by_post(post_id).await
    }

    async fn scan_all(&self) -> Result<Vec<CommentRecord>, CommentError> {
        self.inner.scan_all().await
    }
}

/// A top-level record with an explicit timestamp.
pub fn top_level_at(author_id: &str, post_id: &str, text: &str, created_at: DateTime<Utc>) -> CommentRecord {
    let mut record = CommentRecord::top_level(author_id, post_id, text);
    record.created_at = created_at;
    record
}

/// A reply record with an explicit timestamp.
pub fn reply_at(author_id: &str, parent_id: &str, text: &str, created_at: DateTime<Utc>) -> CommentRecord {
    let mut record = CommentRecord::reply(author_id, parent_id, text);
    record.created_at = created_at;
    record
}
