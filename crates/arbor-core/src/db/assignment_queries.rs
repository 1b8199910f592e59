//! Person-to-node assignments.

use jiff::Timestamp;
use rusqlite::{params, Connection};

use super::{node_queries::load_node, rows::timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result},
    models::Assignment,
};

const INSERT_ASSIGNMENT_SQL: &str =
    "INSERT OR IGNORE INTO assignments (node_id, person_id, assigned_at) VALUES (?1, ?2, ?3)";
const DELETE_ASSIGNMENT_SQL: &str =
    "DELETE FROM assignments WHERE node_id = ?1 AND person_id = ?2";
const DELETE_NODE_ASSIGNMENTS_SQL: &str = "DELETE FROM assignments WHERE node_id = ?1";
const SELECT_ASSIGNMENTS_SQL: &str =
    "SELECT node_id, person_id, assigned_at FROM assignments WHERE node_id = ?1 ORDER BY assigned_at, person_id";

fn assignment_from_row(row: &rusqlite::Row) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        node_id: row.get::<_, i64>(0)? as u64,
        person_id: row.get::<_, i64>(1)? as u64,
        assigned_at: timestamp_at(row, 2)?,
    })
}

fn insert_assignment(conn: &Connection, node_id: u64, person_id: u64, now: &str) -> Result<bool> {
    let inserted = conn
        .execute(INSERT_ASSIGNMENT_SQL, params![node_id as i64, person_id as i64, now])
        .db_context("Failed to insert assignment")?;
    Ok(inserted > 0)
}

fn select_assignments(conn: &Connection, node_id: u64) -> Result<Vec<Assignment>> {
    let mut stmt = conn
        .prepare(SELECT_ASSIGNMENTS_SQL)
        .db_context("Failed to prepare query")?;

    let assignments = stmt
        .query_map(params![node_id as i64], assignment_from_row)
        .db_context("Failed to query assignments")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch assignments")?;

    Ok(assignments)
}

impl super::Database {
    /// Assigns a person to a node. Returns `false` if the assignment
    /// already existed.
    pub fn assign(&mut self, node_id: u64, person_id: u64) -> Result<bool> {
        load_node(&self.connection, node_id)?;
        insert_assignment(
            &self.connection,
            node_id,
            person_id,
            &Timestamp::now().to_string(),
        )
    }

    /// Removes a person from a node. Returns `false` if they were not
    /// assigned.
    pub fn unassign(&mut self, node_id: u64, person_id: u64) -> Result<bool> {
        load_node(&self.connection, node_id)?;
        let removed = self
            .connection
            .execute(DELETE_ASSIGNMENT_SQL, params![node_id as i64, person_id as i64])
            .db_context("Failed to delete assignment")?;
        Ok(removed > 0)
    }

    /// Replaces the full set of people assigned to a node. Duplicates in
    /// `person_ids` collapse into one assignment.
    pub fn replace_assignees(
        &mut self,
        node_id: u64,
        person_ids: &[u64],
    ) -> Result<Vec<Assignment>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        load_node(&tx, node_id)?;

        tx.execute(DELETE_NODE_ASSIGNMENTS_SQL, params![node_id as i64])
            .db_context("Failed to clear assignments")?;

        let now_str = Timestamp::now().to_string();
        for &person_id in person_ids {
            insert_assignment(&tx, node_id, person_id, &now_str)?;
        }

        let assignments = select_assignments(&tx, node_id)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(assignments)
    }

    /// People assigned to a node, earliest assignment first.
    pub fn list_assignees(&self, node_id: u64) -> Result<Vec<Assignment>> {
        load_node(&self.connection, node_id)?;
        select_assignments(&self.connection, node_id)
    }
}
