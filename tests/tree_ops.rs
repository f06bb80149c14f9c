mod support;

use chrono::{Duration, Utc};
use support::*;
use weft::{CommentError, CommentStore, MemoryCommentStore, sweep_orphans, tree};

#[tokio::test]
async fn replies_come_back_oldest_first_regardless_of_insert_order() {
    let store = MemoryCommentStore::new();
    let now = Utc::now();
    let root = top_level_at("u1", "p1", "root", now);
    store.insert(&root).await.expect("insert root");

    // Insert in reverse timestamp order; output must still be ascending.
    let late = reply_at("u2", &root.id, "late", now + Duration::seconds(3));
    let early = reply_at("u3", &root.id, "early", now + Duration::seconds(1));
    let middle = reply_at("u4", &root.id, "middle", now + Duration::seconds(2));
    for record in [&late, &early, &middle] {
        store.insert(record).await.expect("insert reply");
    }

    let node = tree::build_tree(&store, root).await.expect("build tree");
    let texts: Vec<&str> = node.children.iter().map(|child| child.text.as_str()).collect();
    assert_eq!(texts, vec!["early", "middle", "late"]);
}

#[tokio::test]
async fn top_level_listing_is_newest_first() {
    let store = MemoryCommentStore::new();
    let now = Utc::now();
    store
        .insert(&top_level_at("u1", "p1", "first", now))
        .await
        .expect("insert");
    store
        .insert(&top_level_at("u1", "p1", "second", now + Duration::seconds(5)))
        .await
        .expect("insert");

    let trees = tree::list_top_level(&store, "p1").await.expect("list");
    let texts: Vec<&str> = trees.iter().map(|node| node.text.as_str()).collect();
    assert_eq!(texts, vec!["second", "first"]);
}

#[tokio::test]
async fn round_trip_preserves_nested_shape() {
    // A -> [B -> [D], C], with B older than C.
    let store = MemoryCommentStore::new();
    let now = Utc::now();
    let a = top_level_at("u1", "p1", "A", now);
    let b = reply_at("u2", &a.id, "B", now + Duration::seconds(1));
    let c = reply_at("u3", &a.id, "C", now + Duration::seconds(2));
    let d = reply_at("u4", &b.id, "D", now + Duration::seconds(3));
    for record in [&a, &b, &c, &d] {
        store.insert(record).await.expect("insert");
    }

    let trees = tree::list_top_level(&store, "p1").await.expect("list");
    assert_eq!(trees.len(), 1);
    let root = &trees[0];
    assert_eq!(root.text, "A");
    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].text, "B");
    assert_eq!(root.children[1].text, "C");
    assert_eq!(root.children[0].children.len(), 1);
    assert_eq!(root.children[0].children[0].text, "D");
    assert!(root.children[1].children.is_empty());
}

#[tokio::test]
async fn delete_subtree_removes_the_node_and_every_descendant() {
    let store = MemoryCommentStore::new();
    let now = Utc::now();
    let root = top_level_at("u1", "p1", "root", now);
    let keep = top_level_at("u1", "p1", "keep me", now + Duration::seconds(1));
    store.insert(&root).await.expect("insert");
    store.insert(&keep).await.expect("insert");

    // Depth-3 subtree with a branch: 5 descendants below root.
    let r1 = reply_at("u2", &root.id, "r1", now + Duration::seconds(2));
    let r2 = reply_at("u3", &root.id, "r2", now + Duration::seconds(3));
    let r1a = reply_at("u4", &r1.id, "r1a", now + Duration::seconds(4));
    let r1b = reply_at("u5", &r1.id, "r1b", now + Duration::seconds(5));
    let r1a1 = reply_at("u6", &r1a.id, "r1a1", now + Duration::seconds(6));
    let subtree = [&r1, &r2, &r1a, &r1b, &r1a1];
    for record in subtree {
        store.insert(record).await.expect("insert");
    }
    assert_eq!(store.len(), 7);

    let deleted = tree::delete_subtree(&store, &root.id).await.expect("delete");
    assert_eq!(deleted, 6);
    assert_eq!(store.len(), 1);

    for id in std::iter::once(root.id.as_str()).chain(subtree.iter().map(|r| r.id.as_str())) {
        assert!(store.find_by_id(id).await.expect("lookup").is_none());
        assert!(store.find_children(id).await.expect("children").is_empty());
    }
    assert!(store.find_by_id(&keep.id).await.expect("lookup").is_some());
}

#[tokio::test]
async fn deleting_a_missing_id_removes_nothing() {
    let store = MemoryCommentStore::new();
    let deleted = tree::delete_subtree(&store, "ghost").await.expect("delete");
    assert_eq!(deleted, 0);
}

#[tokio::test]
async fn aborted_cascade_surfaces_as_partial_delete_and_retry_finishes_it() {
    // Chain root -> mid -> leaf; fail the delete of mid.
    let store = FlakyStore::new();
    let now = Utc::now();
    let root = top_level_at("u1", "p1", "root", now);
    let mid = reply_at("u2", &root.id, "mid", now + Duration::seconds(1));
    let leaf = reply_at("u3", &mid.id, "leaf", now + Duration::seconds(2));
    for record in [&root, &mid, &leaf] {
        store.insert(record).await.expect("insert");
    }

    store.fail_delete_of(&mid.id);
    let err = tree::delete_subtree(&store, &root.id)
        .await
        .expect_err("cascade should abort");
    match err {
        CommentError::PartialDelete { comment_id, deleted, .. } => {
            assert_eq!(comment_id, root.id);
            assert_eq!(deleted, 1);
        }
        other => panic!("expected PartialDelete, got {other:?}"),
    }

    // The leaf is gone, the root and mid are stranded.
    assert!(store.find_by_id(&leaf.id).await.expect("lookup").is_none());
    assert!(store.find_by_id(&mid.id).await.expect("lookup").is_some());
    assert!(store.find_by_id(&root.id).await.expect("lookup").is_some());

    // Retry after the fault clears; already-deleted nodes are walked
    // harmlessly and the cascade completes.
    store.clear_fault();
    let deleted = tree::delete_subtree(&store, &root.id).await.expect("retry");
    assert_eq!(deleted, 2);
    assert!(store.inner().is_empty());
}

#[tokio::test]
async fn sweep_removes_orphaned_reply_subtrees() {
    let store = MemoryCommentStore::new();
    let now = Utc::now();
    let root = top_level_at("u1", "p1", "root", now);
    let reply = reply_at("u2", &root.id, "reply", now + Duration::seconds(1));
    let nested = reply_at("u3", &reply.id, "nested", now + Duration::seconds(2));
    let intact = top_level_at("u1", "p1", "intact", now + Duration::seconds(3));
    let intact_reply = reply_at("u2", &intact.id, "still fine", now + Duration::seconds(4));
    for record in [&root, &reply, &nested, &intact, &intact_reply] {
        store.insert(record).await.expect("insert");
    }

    // Simulate an aborted cascade: the root vanished, its replies did not.
    store.delete_by_id(&root.id).await.expect("delete root");

    let report = sweep_orphans(&store).await.expect("sweep");
    assert_eq!(report.scanned, 4);
    assert_eq!(report.orphan_roots, 1);
    assert_eq!(report.removed, 2);

    assert!(store.find_by_id(&reply.id).await.expect("lookup").is_none());
    assert!(store.find_by_id(&nested.id).await.expect("lookup").is_none());
    assert!(store.find_by_id(&intact.id).await.expect("lookup").is_some());
    assert!(store.find_by_id(&intact_reply.id).await.expect("lookup").is_some());

    // A second pass finds nothing.
    let report = sweep_orphans(&store).await.expect("second sweep");
    assert_eq!(report.orphan_roots, 0);
    assert_eq!(report.removed, 0);
}
