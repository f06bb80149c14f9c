/// Key-construction helpers for the Redis comment store.
///
/// Every key lives under a caller-supplied prefix so multiple deployments
/// (and test runs) can share one Redis instance without colliding.
#[derive(Debug, Clone)]
pub struct KeyContext {
    prefix: String,
}

impl KeyContext {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Key holding one comment record as a JSON document.
    pub fn record(&self, comment_id: &str) -> String {
        format!("{}{}", self.record_prefix(), comment_id)
    }

    /// Set of direct child ids of a comment.
    pub fn children(&self, parent_id: &str) -> String {
        format!("{}{}", self.children_prefix(), parent_id)
    }

    /// Set of top-level comment ids of a post.
    pub fn post(&self, post_id: &str) -> String {
        format!("{}{}", self.post_prefix(), post_id)
    }

    /// SCAN pattern matching every comment record key under this prefix.
    pub fn record_pattern(&self) -> String {
        format!("{}*", self.record_prefix())
    }

    pub fn record_prefix(&self) -> String {
        format!("{}:weft:comments:", self.prefix)
    }

    pub fn children_prefix(&self) -> String {
        format!("{}:weft:children:", self.prefix)
    }

    pub fn post_prefix(&self) -> String {
        format!("{}:weft:post:", self.prefix)
    }
}
