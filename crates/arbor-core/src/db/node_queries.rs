//! Node CRUD operations, sibling allocation and roll-up plumbing.

use std::collections::HashSet;

use jiff::Timestamp;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::{
    project_queries::{ensure_project, touch_project},
    rows::{node_from_row, NODE_COLUMNS},
};
use crate::{
    error::{DatabaseResultExt, Result, WbsError},
    models::{NewNodeRequest, Node, NodeStatus, UpdateNodeRequest},
    params::validate_date_range,
    wbs::{
        code::{next_order, next_sibling, rebase_code, SiblingSlot},
        level::validate_level,
        progress::{derive_status, recompute, walk_ancestors, HierarchyStore, Rollup},
    },
};

const INSERT_NODE_SQL: &str = "INSERT INTO nodes (project_id, parent_id, code, name, description, level, status, progress, node_order, weight, start_date, end_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";
const SIBLING_STATS_SQL: &str = "SELECT COUNT(*), MAX(node_order) FROM nodes WHERE project_id = ?1 AND parent_id IS ?2";
const COUNT_CHILDREN_SQL: &str = "SELECT COUNT(*) FROM nodes WHERE parent_id = ?1";
const SELECT_CHILD_PROGRESS_SQL: &str = "SELECT progress FROM nodes WHERE parent_id = ?1";
const UPDATE_ROLLUP_SQL: &str =
    "UPDATE nodes SET progress = ?1, status = ?2, updated_at = ?3 WHERE id = ?4";
const UPDATE_NODE_SQL: &str = "UPDATE nodes SET name = ?1, description = ?2, status = ?3, progress = ?4, start_date = ?5, end_date = ?6, weight = ?7, updated_at = ?8 WHERE id = ?9";
const UPDATE_NODE_PLACEMENT_SQL: &str =
    "UPDATE nodes SET parent_id = ?1, node_order = ?2, code = ?3, updated_at = ?4 WHERE id = ?5";
const UPDATE_NODE_CODE_SQL: &str = "UPDATE nodes SET code = ?1, updated_at = ?2 WHERE id = ?3";
const SUBTREE_SQL: &str = "WITH RECURSIVE subtree(id, code, level) AS (SELECT id, code, level FROM nodes WHERE id = ?1 UNION ALL SELECT n.id, n.code, n.level FROM nodes n JOIN subtree s ON n.parent_id = s.id) SELECT id, code FROM subtree ORDER BY level DESC, id";
const DELETE_SUBTREE_ASSIGNMENTS_SQL: &str = "DELETE FROM assignments WHERE node_id IN (WITH RECURSIVE subtree(id) AS (SELECT ?1 UNION ALL SELECT n.id FROM nodes n JOIN subtree s ON n.parent_id = s.id) SELECT id FROM subtree)";
const DELETE_NODE_SQL: &str = "DELETE FROM nodes WHERE id = ?1";

fn select_node_sql() -> String {
    format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?1")
}

fn select_children_sql() -> String {
    format!("SELECT {NODE_COLUMNS} FROM nodes WHERE parent_id = ?1 ORDER BY node_order")
}

fn select_project_nodes_sql() -> String {
    format!(
        "SELECT {NODE_COLUMNS} FROM nodes WHERE project_id = ?1 ORDER BY level, COALESCE(parent_id, 0), node_order"
    )
}

/// Loads a node or fails with [`WbsError::NodeNotFound`].
pub(crate) fn load_node(conn: &Connection, id: u64) -> Result<Node> {
    conn.query_row(&select_node_sql(), params![id as i64], node_from_row)
        .optional()
        .db_context("Failed to query node")?
        .ok_or(WbsError::NodeNotFound { id })
}

fn count_children(conn: &Connection, id: u64) -> Result<u32> {
    let count: i64 = conn
        .query_row(COUNT_CHILDREN_SQL, params![id as i64], |row| row.get(0))
        .db_context("Failed to count child nodes")?;
    Ok(count as u32)
}

/// Reserves the next sibling slot under `parent` (or among the roots).
///
/// Must run inside the write transaction that inserts or moves the node so
/// that the count cannot go stale before the row lands.
fn allocate_slot(conn: &Connection, project_id: u64, parent: Option<&Node>) -> Result<SiblingSlot> {
    let (count, max_order): (i64, Option<i64>) = conn
        .query_row(
            SIBLING_STATS_SQL,
            params![project_id as i64, parent.map(|p| p.id as i64)],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .db_context("Failed to count sibling nodes")?;

    let order = next_order(count as u32, max_order.map(|m| m as u32));
    Ok(next_sibling(parent.map(|p| p.code.as_str()), order))
}

/// [`HierarchyStore`] over an open connection or transaction.
struct SqlHierarchy<'a> {
    conn: &'a Connection,
    now: &'a str,
}

impl HierarchyStore for SqlHierarchy<'_> {
    fn node(&mut self, id: u64) -> Result<Node> {
        load_node(self.conn, id)
    }

    fn child_progress(&mut self, id: u64) -> Result<Vec<u8>> {
        let mut stmt = self
            .conn
            .prepare_cached(SELECT_CHILD_PROGRESS_SQL)
            .db_context("Failed to prepare query")?;

        let progress = stmt
            .query_map(params![id as i64], |row| row.get::<_, i64>(0))
            .db_context("Failed to query child progress")?
            .map(|p| p.map(|p| p.clamp(0, 100) as u8))
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch child progress")?;

        Ok(progress)
    }

    fn write_rollup(&mut self, id: u64, progress: u8, status: NodeStatus) -> Result<()> {
        self.conn
            .execute(
                UPDATE_ROLLUP_SQL,
                params![i64::from(progress), status.as_str(), self.now, id as i64],
            )
            .db_context("Failed to update rolled-up progress")?;
        Ok(())
    }
}

fn roll_up(conn: &Connection, start: Option<u64>, now: &str) -> Result<Vec<Rollup>> {
    walk_ancestors(&mut SqlHierarchy { conn, now }, start)
}

/// Fails with [`WbsError::CycleDetected`] if `node_id` is `new_parent` or
/// one of its ancestors.
fn ensure_not_ancestor(conn: &Connection, node_id: u64, new_parent: &Node) -> Result<()> {
    let cycle = || WbsError::CycleDetected {
        id: node_id,
        parent_id: new_parent.id,
    };
    let mut visited = HashSet::new();
    let mut current = Some(new_parent.id);
    while let Some(id) = current {
        if id == node_id || !visited.insert(id) {
            return Err(cycle());
        }
        current = load_node(conn, id)?.parent_id;
    }
    Ok(())
}

/// `(id, code)` for a node and all its descendants, deepest first.
fn subtree(conn: &Connection, id: u64) -> Result<Vec<(u64, String)>> {
    let mut stmt = conn
        .prepare(SUBTREE_SQL)
        .db_context("Failed to prepare subtree query")?;

    let rows = stmt
        .query_map(params![id as i64], |row| {
            Ok((row.get::<_, i64>(0)? as u64, row.get::<_, String>(1)?))
        })
        .db_context("Failed to query subtree")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch subtree")?;

    Ok(rows)
}

impl super::Database {
    /// Runs `op` up to `limit` times while it fails on a write conflict
    /// (lock contention or a code/order uniqueness collision).
    fn with_sibling_retry<T>(
        &mut self,
        project_id: u64,
        parent_id: Option<u64>,
        limit: u32,
        mut op: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let attempts = limit.max(1);
        for attempt in 1..=attempts {
            match op(self) {
                Err(e) if e.is_write_conflict() => {
                    if attempt == attempts {
                        warn!("sibling allocation conflict, retries exhausted: {e}");
                    } else {
                        debug!("sibling allocation conflict on attempt {attempt}/{attempts}: {e}");
                    }
                }
                other => return other,
            }
        }
        Err(WbsError::ConcurrentModification {
            project_id,
            parent_id,
            attempts,
        })
    }

    /// Creates a node under a validated parent (or as a root), assigning its
    /// code and order, then rolls progress up through its new ancestors.
    ///
    /// Sibling counting and the insert share one IMMEDIATE transaction, so a
    /// concurrent creation under the same parent waits for this one to
    /// commit instead of reading the same count.
    pub fn create_node(&mut self, request: &NewNodeRequest, retry_limit: u32) -> Result<Node> {
        validate_date_range(request.start_date, request.end_date)?;
        self.with_sibling_retry(request.project_id, request.parent_id, retry_limit, |db| {
            db.try_create_node(request)
        })
    }

    fn try_create_node(&mut self, request: &NewNodeRequest) -> Result<Node> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        ensure_project(&tx, request.project_id)?;

        let parent = match request.parent_id {
            Some(parent_id) => {
                let parent = load_node(&tx, parent_id).map_err(|e| match e {
                    WbsError::NodeNotFound { .. } => WbsError::ParentNotFound {
                        project_id: request.project_id,
                        parent_id,
                    },
                    other => other,
                })?;
                if parent.project_id != request.project_id {
                    return Err(WbsError::ParentNotFound {
                        project_id: request.project_id,
                        parent_id,
                    });
                }
                Some(parent)
            }
            None => None,
        };

        validate_level(request.level, parent.as_ref().map(|p| p.level))?;

        let slot = allocate_slot(&tx, request.project_id, parent.as_ref())?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_NODE_SQL,
            params![
                request.project_id as i64,
                request.parent_id.map(|id| id as i64),
                &slot.code,
                &request.name,
                request.description.as_deref(),
                i64::from(request.level.depth()),
                NodeStatus::Pending.as_str(),
                0i64,
                i64::from(slot.order),
                i64::from(request.weight),
                request.start_date.map(|d| d.to_string()),
                request.end_date.map(|d| d.to_string()),
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert node")?;

        let id = tx.last_insert_rowid() as u64;

        // A new 0% child changes its parent's mean.
        roll_up(&tx, request.parent_id, &now_str)?;
        touch_project(&tx, request.project_id, &now_str)?;

        tx.commit().db_context("Failed to commit transaction")?;

        debug!("created node {id} with code {} at order {}", slot.code, slot.order);

        Ok(Node {
            id,
            project_id: request.project_id,
            parent_id: request.parent_id,
            code: slot.code,
            name: request.name.clone(),
            description: request.description.clone(),
            level: request.level,
            status: NodeStatus::Pending,
            progress: 0,
            order: slot.order,
            weight: request.weight,
            start_date: request.start_date,
            end_date: request.end_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a single node by its ID.
    pub fn get_node(&self, id: u64) -> Result<Option<Node>> {
        match load_node(&self.connection, id) {
            Ok(node) => Ok(Some(node)),
            Err(WbsError::NodeNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Direct children of a node in sibling order.
    pub fn get_children(&self, id: u64) -> Result<Vec<Node>> {
        load_node(&self.connection, id)?;

        let mut stmt = self
            .connection
            .prepare(&select_children_sql())
            .db_context("Failed to prepare query")?;

        let children = stmt
            .query_map(params![id as i64], node_from_row)
            .db_context("Failed to query child nodes")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch child nodes")?;

        Ok(children)
    }

    /// Bulk-reads every node of a project, ordered by level, parent and
    /// sibling order.
    pub fn get_project_nodes(&self, project_id: u64) -> Result<Vec<Node>> {
        ensure_project(&self.connection, project_id)?;

        let mut stmt = self
            .connection
            .prepare(&select_project_nodes_sql())
            .db_context("Failed to prepare query")?;

        let nodes = stmt
            .query_map(params![project_id as i64], node_from_row)
            .db_context("Failed to query project nodes")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch project nodes")?;

        Ok(nodes)
    }

    /// Applies a partial edit to a node and rolls the change up.
    ///
    /// Progress may only be set on leaves. On a group node, a hold status
    /// (cancelled, on hold) is stored as given and any other status
    /// releases the hold and is re-derived from the current progress. On a
    /// leaf, a progress change without an explicit status re-derives the
    /// status the same way roll-up does. Fields left `None` keep their
    /// stored value.
    pub fn update_node(&mut self, id: u64, request: &UpdateNodeRequest) -> Result<Node> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let current = load_node(&tx, id)?;

        if request.is_empty() {
            return Ok(current);
        }

        let children = count_children(&tx, id)?;
        if children > 0 && request.progress.is_some() {
            return Err(WbsError::NotALeaf { id, children });
        }

        let progress = request.progress.unwrap_or(current.progress);
        let status = match request.status {
            Some(status) if children > 0 && !status.is_hold() => {
                derive_status(NodeStatus::Pending, progress)
            }
            Some(status) => status,
            None if request.progress.is_some() => derive_status(current.status, progress),
            None => current.status,
        };

        let start_date = request.start_date.or(current.start_date);
        let end_date = request.end_date.or(current.end_date);
        validate_date_range(start_date, end_date)?;

        let name = request.name.clone().unwrap_or(current.name);
        let description = request.description.clone().or(current.description);
        let weight = request.weight.unwrap_or(current.weight);

        let now_str = Timestamp::now().to_string();

        tx.execute(
            UPDATE_NODE_SQL,
            params![
                &name,
                &description,
                status.as_str(),
                i64::from(progress),
                start_date.map(|d| d.to_string()),
                end_date.map(|d| d.to_string()),
                i64::from(weight),
                &now_str,
                id as i64
            ],
        )
        .db_context("Failed to update node")?;

        if request.affects_rollup() {
            roll_up(&tx, current.parent_id, &now_str)?;
        }
        touch_project(&tx, current.project_id, &now_str)?;

        let updated = load_node(&tx, id)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }

    /// Deletes a node with its whole subtree and all of their assignments,
    /// then rolls progress up from the former parent. Returns the deleted
    /// node.
    pub fn delete_node(&mut self, id: u64) -> Result<Node> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let node = load_node(&tx, id)?;
        let members = subtree(&tx, id)?;

        tx.execute(DELETE_SUBTREE_ASSIGNMENTS_SQL, params![id as i64])
            .db_context("Failed to delete subtree assignments")?;

        // Deepest first, so no row is removed by a cascade before its own
        // delete runs and every removal is counted here.
        let mut removed = 0u64;
        for (member, _) in &members {
            removed += tx
                .execute(DELETE_NODE_SQL, params![*member as i64])
                .db_context("Failed to delete node")? as u64;
        }

        let expected = members.len() as u64;
        if removed != expected {
            return Err(WbsError::CascadeFailure {
                id,
                expected,
                removed,
            });
        }

        let now_str = Timestamp::now().to_string();
        roll_up(&tx, node.parent_id, &now_str)?;
        touch_project(&tx, node.project_id, &now_str)?;

        tx.commit().db_context("Failed to commit transaction")?;

        debug!("deleted node {id} ({}) and {} descendant(s)", node.code, expected - 1);

        Ok(node)
    }

    /// Moves a node and its subtree under `new_parent_id`.
    ///
    /// The new parent must be in the same project and sit at the same level
    /// as the current parent, and must not lie inside the moved subtree.
    /// The node takes the next sibling slot under its new parent and every
    /// descendant's code is rewritten to match. Both the old and the new
    /// ancestor chains are rolled up.
    pub fn move_node(&mut self, id: u64, new_parent_id: u64, retry_limit: u32) -> Result<Node> {
        let node = load_node(&self.connection, id)?;
        self.with_sibling_retry(node.project_id, Some(new_parent_id), retry_limit, |db| {
            db.try_move_node(id, new_parent_id)
        })
    }

    fn try_move_node(&mut self, id: u64, new_parent_id: u64) -> Result<Node> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let node = load_node(&tx, id)?;

        let new_parent = load_node(&tx, new_parent_id).map_err(|e| match e {
            WbsError::NodeNotFound { .. } => WbsError::ParentNotFound {
                project_id: node.project_id,
                parent_id: new_parent_id,
            },
            other => other,
        })?;
        if new_parent.project_id != node.project_id {
            return Err(WbsError::ParentNotFound {
                project_id: node.project_id,
                parent_id: new_parent_id,
            });
        }

        ensure_not_ancestor(&tx, id, &new_parent)?;
        validate_level(node.level, Some(new_parent.level))?;

        if node.parent_id == Some(new_parent_id) {
            return Ok(node);
        }

        let slot = allocate_slot(&tx, node.project_id, Some(&new_parent))?;
        let now_str = Timestamp::now().to_string();

        // Rewrite descendants first; the node's own row is updated last
        // together with its new parent and order.
        for (member, code) in subtree(&tx, id)? {
            if member == id {
                continue;
            }
            let rebased = rebase_code(&code, &node.code, &slot.code).ok_or_else(|| {
                WbsError::Configuration {
                    message: format!(
                        "Node {member} has code '{code}' outside its ancestor's prefix '{}'",
                        node.code
                    ),
                }
            })?;
            tx.execute(UPDATE_NODE_CODE_SQL, params![&rebased, &now_str, member as i64])
                .db_context("Failed to rewrite descendant code")?;
        }

        tx.execute(
            UPDATE_NODE_PLACEMENT_SQL,
            params![
                new_parent_id as i64,
                i64::from(slot.order),
                &slot.code,
                &now_str,
                id as i64
            ],
        )
        .db_context("Failed to move node")?;

        roll_up(&tx, node.parent_id, &now_str)?;
        roll_up(&tx, Some(new_parent_id), &now_str)?;
        touch_project(&tx, node.project_id, &now_str)?;

        let moved = load_node(&tx, id)?;

        tx.commit().db_context("Failed to commit transaction")?;

        debug!("moved node {id} from {} to {}", node.code, moved.code);

        Ok(moved)
    }

    /// Recomputes a node from its children (if it has any) and then every
    /// ancestor. Entry point for bulk loaders that insert many nodes and
    /// settle progress once at the end.
    pub fn recompute_progress(&mut self, id: u64) -> Result<Vec<Rollup>> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let node = load_node(&tx, id)?;
        let now_str = Timestamp::now().to_string();

        let mut store = SqlHierarchy {
            conn: &tx,
            now: &now_str,
        };
        let mut rollups: Vec<Rollup> = recompute(&mut store, &node)?.into_iter().collect();
        rollups.extend(walk_ancestors(&mut store, node.parent_id)?);

        if rollups.iter().any(|r| r.changed) {
            touch_project(&tx, node.project_id, &now_str)?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(rollups)
    }
}
