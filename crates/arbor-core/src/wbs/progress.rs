//! Bottom-up progress and status roll-up.
//!
//! A group node's progress is the rounded mean of its direct children's
//! progress, and its status follows from that progress unless it has been
//! put on hold or cancelled by hand. After a mutation, [`walk_ancestors`]
//! restores that rule on every strict ancestor of the mutated node, nearest
//! first, re-reading each ancestor's children right before recomputing it.

use std::collections::HashSet;

use log::debug;

use crate::{
    error::{Result, WbsError},
    models::{Node, NodeStatus},
};

/// Storage seen by the roll-up walk.
///
/// The database layer implements this over an open transaction; tests
/// implement it over a map.
pub trait HierarchyStore {
    /// Loads a node by ID.
    fn node(&mut self, id: u64) -> Result<Node>;

    /// Progress of every direct child of `id`, in any order.
    fn child_progress(&mut self, id: u64) -> Result<Vec<u8>>;

    /// Persists a recomputed progress and status.
    fn write_rollup(&mut self, id: u64, progress: u8, status: NodeStatus) -> Result<()>;
}

/// Outcome of recomputing one ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollup {
    pub id: u64,
    pub progress: u8,
    pub status: NodeStatus,
    /// Whether progress or status differed from the stored values
    pub changed: bool,
}

/// Rounded arithmetic mean, halves rounded up. `None` for no children.
///
/// ```rust
/// use arbor_core::wbs::mean_progress;
///
/// assert_eq!(mean_progress(&[40, 60]), Some(50));
/// assert_eq!(mean_progress(&[0, 0, 1]), Some(0));
/// assert_eq!(mean_progress(&[50, 51]), Some(51));
/// assert_eq!(mean_progress(&[]), None);
/// ```
pub fn mean_progress(children: &[u8]) -> Option<u8> {
    if children.is_empty() {
        return None;
    }
    let count = children.len() as u64;
    let sum: u64 = children.iter().map(|&p| u64::from(p)).sum();
    let rounded = (2 * sum + count) / (2 * count);
    Some(rounded.min(100) as u8)
}

/// Status implied by `progress`, with hold statuses taking precedence.
pub fn derive_status(prior: NodeStatus, progress: u8) -> NodeStatus {
    if prior.is_hold() {
        return prior;
    }
    match progress {
        0 => NodeStatus::Pending,
        100 => NodeStatus::Completed,
        _ => NodeStatus::InProgress,
    }
}

/// Recomputes `id` from its current children.
///
/// Returns `None` without writing if the node has no children: it is then
/// a leaf and its progress is set by hand.
pub fn recompute<S: HierarchyStore + ?Sized>(store: &mut S, node: &Node) -> Result<Option<Rollup>> {
    let children = store.child_progress(node.id)?;
    let Some(progress) = mean_progress(&children) else {
        debug!("node {} has no children, roll-up skipped", node.id);
        return Ok(None);
    };
    let status = derive_status(node.status, progress);
    let changed = progress != node.progress || status != node.status;
    if changed {
        store.write_rollup(node.id, progress, status)?;
    }
    debug!(
        "rolled up node {} ({}) from {} child(ren): {}% {}",
        node.id,
        node.code,
        children.len(),
        progress,
        status.as_str()
    );
    Ok(Some(Rollup {
        id: node.id,
        progress,
        status,
        changed,
    }))
}

/// Walks from `start` (the mutated node's parent) up to its root,
/// recomputing every node on the way.
///
/// The walk never stops early: a childless node on the chain is left as is
/// and the walk carries on to its parent. A parent chain that loops back on
/// itself is reported as [`WbsError::CycleDetected`].
pub fn walk_ancestors<S: HierarchyStore + ?Sized>(
    store: &mut S,
    start: Option<u64>,
) -> Result<Vec<Rollup>> {
    let mut rollups = Vec::new();
    let mut visited = HashSet::new();
    let mut current = start;
    let mut previous = None;

    while let Some(id) = current {
        if !visited.insert(id) {
            return Err(WbsError::CycleDetected {
                id: previous.unwrap_or(id),
                parent_id: id,
            });
        }
        let node = store.node(id)?;
        if let Some(rollup) = recompute(store, &node)? {
            rollups.push(rollup);
        }
        previous = Some(id);
        current = node.parent_id;
    }

    Ok(rollups)
}
