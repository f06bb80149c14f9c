use redis::{aio::ConnectionManager, cmd};

use crate::{
    errors::CommentError,
    keys::KeyContext,
    model::CommentRecord,
    store::{CommentStore, scripts::COMMENT_DELETE_SCRIPT},
};

/// Redis-backed comment store.
///
/// Each record is one JSON document under its own key. Two families of index
/// sets provide the adjacency queries: a children set per parent comment and
/// a top-level set per post. Record removal and index cleanup happen in one
/// Lua script, so a single delete is atomic; the cascade across a subtree is
/// not (see the tree layer for the partial-failure contract).
#[derive(Clone)]
pub struct RedisCommentStore {
    conn: ConnectionManager,
    keys: KeyContext,
}

impl RedisCommentStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            keys: KeyContext::new(prefix),
        }
    }

    /// Connect to Redis by URL.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    pub fn key_context(&self) -> &KeyContext {
        &self.keys
    }

    /// Fetch every live member of an index set, pruning ids whose record has
    /// already been deleted (left behind by an aborted cascade).
    async fn fetch_members(&self, index_key: &str) -> Result<Vec<CommentRecord>, CommentError> {
        let mut conn = self.conn.clone();
        let member_ids: Vec<String> = cmd("SMEMBERS").arg(index_key).query_async(&mut conn).await?;

        let mut records = Vec::with_capacity(member_ids.len());
        for member_id in member_ids {
            let payload: Option<String> = cmd("GET")
                .arg(self.keys.record(&member_id))
                .query_async(&mut conn)
                .await?;
            match payload {
                Some(json) => records.push(decode_record(&json)?),
                None => {
                    // Dangling index entry; drop it lazily.
                    let _: i64 = cmd("SREM").arg(index_key).arg(&member_id).query_async(&mut conn).await?;
                }
            }
        }
        Ok(records)
    }
}

fn decode_record(json: &str) -> Result<CommentRecord, CommentError> {
    serde_json::from_str(json).map_err(CommentError::codec)
}

impl CommentStore for RedisCommentStore {
    async fn insert(&self, record: &CommentRecord) -> Result<(), CommentError> {
        let mut conn = self.conn.clone();
        let payload = serde_json::to_string(record).map_err(CommentError::codec)?;
        let index_key = match (&record.parent_id, &record.post_id) {
            (Some(parent_id), _) => self.keys.children(parent_id),
            (None, Some(post_id)) => self.keys.post(post_id),
            (None, None) => {
                return Err(CommentError::Other {
                    message: "comment record has neither post_id nor parent_id".into(),
                });
            }
        };

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("SET")
            .arg(self.keys.record(&record.id))
            .arg(payload)
            .ignore()
            .cmd("SADD")
            .arg(index_key)
            .arg(&record.id)
            .ignore();
        let () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn find_by_id(&self, comment_id: &str) -> Result<Option<CommentRecord>, CommentError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = cmd("GET")
            .arg(self.keys.record(comment_id))
            .query_async(&mut conn)
            .await?;
        match payload {
            Some(json) => Ok(Some(decode_record(&json)?)),
            None => Ok(None),
        }
    }

    async fn find_children(&self, parent_id: &str) -> Result<Vec<CommentRecord>, CommentError> {
        self.fetch_members(&self.keys.children(parent_id)).await
    }

    async fn find_top_level(&self, post_id: &str) -> Result<Vec<CommentRecord>, CommentError> {
        self.fetch_members(&self.keys.post(post_id)).await
    }

    async fn delete_by_id(&self, comment_id: &str) -> Result<bool, CommentError> {
        let mut conn = self.conn.clone();
        let removed: i64 = COMMENT_DELETE_SCRIPT
            .key(self.keys.record(comment_id))
            .arg(self.keys.children_prefix())
            .arg(self.keys.post_prefix())
            .invoke_async(&mut conn)
            .await?;
        Ok(removed == 1)
    }

    async fn count_by_post(&self, post_id: &str) -> Result<u64, CommentError> {
        let mut conn = self.conn.clone();
        let count: u64 = cmd("SCARD").arg(self.keys.post(post_id)).query_async(&mut conn).await?;
        Ok(count)
    }

    async fn scan_all(&self) -> Result<Vec<CommentRecord>, CommentError> {
        const SCAN_COUNT: usize = 512;
        let mut conn = self.conn.clone();
        let pattern = self.keys.record_pattern();
        let mut cursor: u64 = 0;
        let mut records = Vec::new();
        loop {
            let (next_cursor, batch): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;
            for key in batch {
                let payload: Option<String> = cmd("GET").arg(&key).query_async(&mut conn).await?;
                // A record may vanish between SCAN and GET; skip it.
                if let Some(json) = payload {
                    records.push(decode_record(&json)?);
                }
            }
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        Ok(records)
    }
}
