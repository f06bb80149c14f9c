//! Recursive-descent algorithms over the flat comment store.
//!
//! The parent/child relation is stored as a self-reference on each record,
//! so both traversals work off the store's adjacency query
//! ([`CommentStore::find_children`]). Each walk uses an explicit work list
//! instead of call-stack recursion: discovery appends children behind their
//! parent, giving a parent-before-children order that can be consumed
//! forwards (assembly) or backwards (deletion) without any depth limit on
//! the thread.

use std::collections::HashMap;

use crate::{
    errors::CommentError,
    model::{Author, CommentNode, CommentRecord},
    store::CommentStore,
};

/// Deletes a comment and its entire descendant subtree, children before
/// parents. Returns the number of records removed.
///
/// The cascade is sequential and non-transactional. Discovery runs first and
/// deletes nothing, so a store error there surfaces as a plain failure. Once
/// deletion has started, an error aborts the remaining walk and surfaces as
/// [`CommentError::PartialDelete`]: some descendants are gone, the root (and
/// possibly other descendants) remain. Re-running the delete is safe;
/// removing an absent record is a no-op.
pub async fn delete_subtree<S: CommentStore>(store: &S, comment_id: &str) -> Result<u64, CommentError> {
    let order = collect_subtree_ids(store, comment_id).await?;

    let mut deleted: u64 = 0;
    for id in order.iter().rev() {
        match store.delete_by_id(id).await {
            Ok(true) => deleted += 1,
            // Already gone; a concurrent delete or an earlier aborted cascade
            // got there first.
            Ok(false) => {}
            Err(err) if deleted == 0 => return Err(err),
            Err(err) => {
                log::warn!(
                    "cascade delete of comment {comment_id} aborted after {deleted} of {} nodes: {err}",
                    order.len()
                );
                return Err(CommentError::PartialDelete {
                    comment_id: comment_id.to_string(),
                    deleted,
                    source: Box::new(err),
                });
            }
        }
    }
    Ok(deleted)
}

/// Walks the subtree rooted at `comment_id`, returning every reachable id in
/// discovery order (each parent before its children).
async fn collect_subtree_ids<S: CommentStore>(store: &S, comment_id: &str) -> Result<Vec<String>, CommentError> {
    let mut order = vec![comment_id.to_string()];
    let mut cursor = 0;
    while cursor < order.len() {
        let children = store.find_children(&order[cursor]).await?;
        order.extend(children.into_iter().map(|child| child.id));
        cursor += 1;
    }
    Ok(order)
}

/// Materializes the tree rooted at an already-fetched record.
///
/// Children are ordered ascending by `created_at` (oldest reply first) at
/// every level. The result is a snapshot: one store round-trip per node, no
/// batching, and later mutations are not reflected. Author display names are
/// not resolved here; every node carries a bare [`Author`] with just the id.
pub async fn build_tree<S: CommentStore>(store: &S, root: CommentRecord) -> Result<CommentNode, CommentError> {
    let root_id = root.id.clone();

    // Discovery: parent-before-children, each sibling group sorted oldest
    // first so assembly preserves reply order.
    let mut order: Vec<CommentRecord> = vec![root];
    let mut child_ids: HashMap<String, Vec<String>> = HashMap::new();
    let mut cursor = 0;
    while cursor < order.len() {
        let mut children = store.find_children(&order[cursor].id).await?;
        children.sort_by_key(|child| child.created_at);
        child_ids.insert(order[cursor].id.clone(), children.iter().map(|child| child.id.clone()).collect());
        order.extend(children);
        cursor += 1;
    }

    // Assembly: fold the discovery list in reverse so every node's children
    // exist before the node itself is built.
    let mut built: HashMap<String, CommentNode> = HashMap::with_capacity(order.len());
    for record in order.into_iter().rev() {
        let ids = child_ids.remove(&record.id).unwrap_or_default();
        let mut children = Vec::with_capacity(ids.len());
        for id in ids {
            let child = built.remove(&id).ok_or_else(|| CommentError::Other {
                message: "subtree assembly lost a child node".into(),
            })?;
            children.push(child);
        }
        let id = record.id;
        built.insert(
            id.clone(),
            CommentNode {
                id,
                text: record.text,
                author: Author {
                    id: record.author_id,
                    display_name: None,
                },
                created_at: record.created_at,
                children,
            },
        );
    }

    built.remove(&root_id).ok_or_else(|| CommentError::Other {
        message: "subtree assembly lost the root node".into(),
    })
}

/// Materializes every comment tree of a post.
///
/// Top-level comments are ordered descending by `created_at` (newest first);
/// replies within each tree stay ascending. The asymmetry is deliberate:
/// recent discussions surface first, while a reply chain reads
/// chronologically.
pub async fn list_top_level<S: CommentStore>(store: &S, post_id: &str) -> Result<Vec<CommentNode>, CommentError> {
    let mut roots = store.find_top_level(post_id).await?;
    roots.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut trees = Vec::with_capacity(roots.len());
    for root in roots {
        trees.push(build_tree(store, root).await?);
    }
    Ok(trees)
}
