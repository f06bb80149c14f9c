//! Reconciliation sweep for orphaned reply subtrees.
//!
//! A cascade delete that aborts partway (or a request cancelled mid-cascade)
//! can leave replies whose parent no longer exists. Those records are
//! unreachable through `list_comments`, which only enters a tree from its
//! top-level root. This sweep finds them and finishes the job. It is meant to
//! run periodically, outside the request path.

use std::collections::HashSet;

use serde::Serialize;

use crate::{errors::CommentError, store::CommentStore, tree};

/// Outcome of one orphan sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Records examined.
    pub scanned: u64,
    /// Replies whose parent no longer resolves.
    pub orphan_roots: u64,
    /// Total records removed, orphan roots and their descendants.
    pub removed: u64,
}

/// Scans the whole store and cascade-deletes every reply whose parent is
/// gone.
///
/// Idempotent, and safe to run while traffic flows: at worst it races a
/// concurrent delete, and removing an absent record is a no-op. Descendants
/// of an orphan are not themselves counted as orphan roots; they fall with
/// their subtree.
pub async fn sweep_orphans<S: CommentStore>(store: &S) -> Result<SweepReport, CommentError> {
    let records = store.scan_all().await?;
    let live_ids: HashSet<&str> = records.iter().map(|record| record.id.as_str()).collect();

    let mut report = SweepReport {
        scanned: records.len() as u64,
        ..SweepReport::default()
    };

    for record in &records {
        if let Some(parent_id) = &record.parent_id
            && !live_ids.contains(parent_id.as_str())
        {
            report.orphan_roots += 1;
            report.removed += tree::delete_subtree(store, &record.id).await?;
        }
    }

    if report.orphan_roots > 0 {
        log::warn!(
            "orphan sweep removed {} records under {} dangling replies (scanned {})",
            report.removed,
            report.orphan_roots,
            report.scanned
        );
    }
    Ok(report)
}
