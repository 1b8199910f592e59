//! Node operations for the Engine.

use log::{debug, info};

use super::{Engine, TreeView};
use crate::{
    error::Result,
    models::{DelayedNode, NewNodeRequest, Node, UpdateNodeRequest},
    params::{validate_progress, CreateNode, GetTree, Id, MoveNode, SetProgress, UpdateNode},
    wbs::{assemble, flatten, leaves, Rollup},
};

impl Engine {
    /// Creates a node under `parent_id` (or as a root), assigning its code
    /// and sibling order.
    ///
    /// # Errors
    ///
    /// - `WbsError::LevelMismatch` if `level` is not directly below the
    ///   parent's level (or not `L1` for a root)
    /// - `WbsError::ParentNotFound` if the parent is missing or belongs to
    ///   another project
    /// - `WbsError::ConcurrentModification` if sibling allocation kept
    ///   colliding with concurrent writers
    pub async fn create_node(&self, params: &CreateNode) -> Result<Node> {
        let request = NewNodeRequest::try_from(params.clone())?;
        let retry_limit = self.retry_limit;

        let node = self
            .run(move |db| db.create_node(&request, retry_limit))
            .await?;
        info!("created node {} ({}) '{}'", node.id, node.code, node.name);
        Ok(node)
    }

    /// Retrieves a node by its ID.
    pub async fn get_node(&self, params: &Id) -> Result<Option<Node>> {
        let id = params.id;
        self.run(move |db| db.get_node(id)).await
    }

    /// Direct children of a node, in sibling order.
    pub async fn get_children(&self, params: &Id) -> Result<Vec<Node>> {
        let id = params.id;
        self.run(move |db| db.get_children(id)).await
    }

    /// A project's whole tree, nested or flattened in pre-order.
    pub async fn get_tree(&self, params: &GetTree) -> Result<TreeView> {
        let project_id = params.project_id;
        let nodes = self.run(move |db| db.get_project_nodes(project_id)).await?;

        let forest = assemble(nodes);
        if params.flat {
            Ok(TreeView::Flat(flatten(&forest).into_iter().cloned().collect()))
        } else {
            Ok(TreeView::Nested(forest))
        }
    }

    /// Applies a partial edit to a node and rolls progress up.
    ///
    /// # Errors
    ///
    /// - `WbsError::NotALeaf` if progress is set on a node with children
    /// - `WbsError::InvalidInput` for an unknown status, out-of-range
    ///   progress or an inverted date range
    pub async fn update_node(&self, params: &UpdateNode) -> Result<Node> {
        let id = params.id;
        let request = UpdateNodeRequest::try_from(params.clone())?;
        self.run(move |db| db.update_node(id, &request)).await
    }

    /// Sets a leaf's progress and rolls it up through every ancestor.
    ///
    /// # Errors
    ///
    /// - `WbsError::NotALeaf` if the node has children
    /// - `WbsError::InvalidInput` if progress is above 100
    pub async fn update_node_progress(&self, params: &SetProgress) -> Result<Node> {
        validate_progress(params.progress)?;
        let id = params.id;
        let request = UpdateNodeRequest::progress(params.progress);

        let node = self.run(move |db| db.update_node(id, &request)).await?;
        debug!("node {} progress set to {}%", node.id, node.progress);
        Ok(node)
    }

    /// Deletes a node with its subtree and their assignments. Returns the
    /// deleted node.
    pub async fn delete_node(&self, params: &Id) -> Result<Node> {
        let id = params.id;
        let node = self.run(move |db| db.delete_node(id)).await?;
        info!("deleted node {} ({})", node.id, node.code);
        Ok(node)
    }

    /// Moves a node and its subtree under a new parent at the same level as
    /// its current one.
    ///
    /// # Errors
    ///
    /// - `WbsError::CycleDetected` if the new parent lies in the subtree
    /// - `WbsError::LevelMismatch` if the new parent is at another level
    pub async fn move_node(&self, params: &MoveNode) -> Result<Node> {
        let (id, new_parent_id) = (params.id, params.new_parent_id);
        let retry_limit = self.retry_limit;

        let node = self
            .run(move |db| db.move_node(id, new_parent_id, retry_limit))
            .await?;
        info!("moved node {} to {}", node.id, node.code);
        Ok(node)
    }

    /// Recomputes a node and all of its ancestors from their children.
    pub async fn recompute_progress(&self, params: &Id) -> Result<Vec<Rollup>> {
        let id = params.id;
        self.run(move |db| db.recompute_progress(id)).await
    }

    /// Leaves of a project that are past their end date and not finished,
    /// most overdue first.
    pub async fn list_delayed(&self, params: &Id) -> Result<Vec<DelayedNode>> {
        let project_id = params.id;
        let delays = self.delay_evaluator();
        let nodes = self.run(move |db| db.get_project_nodes(project_id)).await?;

        let mut delayed: Vec<DelayedNode> = leaves(&nodes)
            .filter_map(|leaf| delays.evaluate(leaf))
            .collect();
        delayed.sort_by(|a, b| {
            b.delay_days
                .cmp(&a.delay_days)
                .then_with(|| a.node.code.cmp(&b.node.code))
        });
        Ok(delayed)
    }
}
