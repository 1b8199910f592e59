//! Project CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};

use super::rows::timestamp_at;
use crate::{
    error::{DatabaseResultExt, Result, WbsError},
    models::Project,
};

const INSERT_PROJECT_SQL: &str =
    "INSERT INTO projects (name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_PROJECT_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM projects WHERE id = ?1";
const SELECT_PROJECTS_SQL: &str =
    "SELECT id, name, description, created_at, updated_at FROM projects ORDER BY id";
const CHECK_PROJECT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?1)";
const UPDATE_PROJECT_TIMESTAMP_SQL: &str = "UPDATE projects SET updated_at = ?1 WHERE id = ?2";
const DELETE_PROJECT_ASSIGNMENTS_SQL: &str =
    "DELETE FROM assignments WHERE node_id IN (SELECT id FROM nodes WHERE project_id = ?1)";
const DELETE_PROJECT_NODES_SQL: &str = "DELETE FROM nodes WHERE project_id = ?1";
const DELETE_PROJECT_SQL: &str = "DELETE FROM projects WHERE id = ?1";

fn project_from_row(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: timestamp_at(row, 3)?,
        updated_at: timestamp_at(row, 4)?,
    })
}

/// Fails with [`WbsError::ProjectNotFound`] unless the project exists.
pub(crate) fn ensure_project(conn: &Connection, project_id: u64) -> Result<()> {
    let exists: bool = conn
        .query_row(CHECK_PROJECT_EXISTS_SQL, params![project_id as i64], |row| {
            row.get(0)
        })
        .db_context("Failed to check project existence")?;

    if exists {
        Ok(())
    } else {
        Err(WbsError::ProjectNotFound { id: project_id })
    }
}

/// Bumps the project's `updated_at` after a change to its tree.
pub(crate) fn touch_project(conn: &Connection, project_id: u64, now: &str) -> Result<()> {
    conn.execute(UPDATE_PROJECT_TIMESTAMP_SQL, params![now, project_id as i64])
        .db_context("Failed to update project timestamp")?;
    Ok(())
}

impl super::Database {
    /// Creates a new, empty project.
    pub fn create_project(&mut self, name: &str, description: Option<&str>) -> Result<Project> {
        if name.trim().is_empty() {
            return Err(WbsError::invalid_input("name").with_reason("Name must not be empty"));
        }

        let now = Timestamp::now();
        let now_str = now.to_string();

        self.connection
            .execute(
                INSERT_PROJECT_SQL,
                params![name.trim(), description, &now_str, &now_str],
            )
            .db_context("Failed to insert project")?;

        let id = self.connection.last_insert_rowid() as u64;

        Ok(Project {
            id,
            name: name.trim().to_string(),
            description: description.map(String::from),
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a project by its ID.
    pub fn get_project(&self, id: u64) -> Result<Option<Project>> {
        self.connection
            .query_row(SELECT_PROJECT_SQL, params![id as i64], project_from_row)
            .optional()
            .db_context("Failed to query project")
    }

    /// Lists all projects, oldest first.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PROJECTS_SQL)
            .db_context("Failed to prepare query")?;

        let projects = stmt
            .query_map([], project_from_row)
            .db_context("Failed to query projects")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch projects")?;

        Ok(projects)
    }

    /// Deletes a project together with its whole tree and every assignment
    /// in it. Returns the deleted project, or `None` if it did not exist.
    pub fn delete_project(&mut self, id: u64) -> Result<Option<Project>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let Some(project) = tx
            .query_row(SELECT_PROJECT_SQL, params![id as i64], project_from_row)
            .optional()
            .db_context("Failed to query project")?
        else {
            return Ok(None);
        };

        tx.execute(DELETE_PROJECT_ASSIGNMENTS_SQL, params![id as i64])
            .db_context("Failed to delete project assignments")?;
        tx.execute(DELETE_PROJECT_NODES_SQL, params![id as i64])
            .db_context("Failed to delete project nodes")?;
        tx.execute(DELETE_PROJECT_SQL, params![id as i64])
            .db_context("Failed to delete project")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Some(project))
    }
}
