use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{errors::CommentError, model::CommentRecord, store::CommentStore};

/// In-memory comment store backed by a `HashMap`.
///
/// `find_children` and `find_top_level` are filtered scans, mirroring how a
/// document store would answer an adjacency query without an index. Used by
/// the crate's own tests; also handy for embedding the engine without Redis.
#[derive(Debug, Default)]
pub struct MemoryCommentStore {
    records: Mutex<HashMap<String, CommentRecord>>,
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records, top-level and replies alike.
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<String, CommentRecord>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl CommentStore for MemoryCommentStore {
    async fn insert(&self, record: &CommentRecord) -> Result<(), CommentError> {
        self.guard().insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, comment_id: &str) -> Result<Option<CommentRecord>, CommentError> {
        Ok(self.guard().get(comment_id).cloned())
    }

    async fn find_children(&self, parent_id: &str) -> Result<Vec<CommentRecord>, CommentError> {
        Ok(self
            .guard()
            .values()
            .filter(|record| record.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn find_top_level(&self, post_id: &str) -> Result<Vec<CommentRecord>, CommentError> {
        Ok(self
            .guard()
            .values()
            .filter(|record| record.post_id.as_deref() == Some(post_id) && record.parent_id.is_none())
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, comment_id: &str) -> Result<bool, CommentError> {
        Ok(self.guard().remove(comment_id).is_some())
    }

    async fn count_by_post(&self, post_id: &str) -> Result<u64, CommentError> {
        Ok(self
            .guard()
            .values()
            .filter(|record| record.post_id.as_deref() == Some(post_id))
            .count() as u64)
    }

    async fn scan_all(&self) -> Result<Vec<CommentRecord>, CommentError> {
        Ok(self.guard().values().cloned().collect())
    }
}
