//! Assignment operations for the Engine.

use log::debug;

use super::Engine;
use crate::{
    error::Result,
    models::Assignment,
    params::{Assign, Id, ReplaceAssignees},
};

impl Engine {
    /// Assigns a person to a node. Returns `false` if they already were.
    pub async fn assign(&self, params: &Assign) -> Result<bool> {
        let (node_id, person_id) = (params.node_id, params.person_id);
        let created = self.run(move |db| db.assign(node_id, person_id)).await?;
        debug!("assign person {person_id} to node {node_id}: created={created}");
        Ok(created)
    }

    /// Removes a person from a node. Returns `false` if they were not
    /// assigned.
    pub async fn unassign(&self, params: &Assign) -> Result<bool> {
        let (node_id, person_id) = (params.node_id, params.person_id);
        self.run(move |db| db.unassign(node_id, person_id)).await
    }

    /// Atomically replaces a node's assignees with `person_ids`.
    pub async fn replace_assignees(&self, params: &ReplaceAssignees) -> Result<Vec<Assignment>> {
        let node_id = params.node_id;
        let person_ids = params.person_ids.clone();
        self.run(move |db| db.replace_assignees(node_id, &person_ids))
            .await
    }

    /// People currently assigned to a node.
    pub async fn list_assignees(&self, params: &Id) -> Result<Vec<Assignment>> {
        let node_id = params.id;
        self.run(move |db| db.list_assignees(node_id)).await
    }
}
