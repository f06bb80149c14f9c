//! weft — threaded comments over a flat document store.
//!
//! Comments form a forest: top-level comments hang off a post, replies hang
//! off other comments, to any depth. Storage stays flat; each record carries
//! at most one self-reference (`parent_id`), and the tree layer reconstructs
//! or destroys whole subtrees by walking the adjacency query.
//!
//! - [`store`] — the persistence contract plus Redis and in-memory backends.
//! - [`tree`] — subtree deletion (bottom-up) and assembly (top-down).
//! - [`service`] — the four public operations with authorization and
//!   post-existence checks.
//! - [`maintenance`] — the orphan sweep that reconciles aborted cascades.

pub mod errors;
pub mod id;
pub mod keys;
pub mod maintenance;
pub mod model;
pub mod service;
pub mod store;
pub mod tree;

pub use errors::{CommentError, ErrorKind};
pub use maintenance::{SweepReport, sweep_orphans};
pub use model::{Author, CommentNode, CommentRecord};
pub use service::{CommentListing, CommentService, CreatedComment, PostDirectory, ProfileResolver};
pub use store::{CommentStore, MemoryCommentStore, RedisCommentStore};
