//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    models::{Node, Project},
    wbs::Rollup,
};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use arbor_core::{display::CreateResult, models::Project};
/// use jiff::Timestamp;
///
/// let project = Project {
///     id: 1,
///     name: "Bridge".to_string(),
///     description: None,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
/// };
/// let output = format!("{}", CreateResult::new(project));
/// assert!(output.contains("Created project with ID: 1"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Project> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created project with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Node> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Created node {} with ID: {}",
            self.resource.code, self.resource.id
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult<Node> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated node {} with ID: {}",
            self.resource.code, self.resource.id
        )?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Vec<Rollup>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let changed = self.resource.iter().filter(|r| r.changed).count();
        writeln!(
            f,
            "Recomputed {} node(s), {changed} changed",
            self.resource.len()
        )?;
        for rollup in &self.resource {
            writeln!(
                f,
                "- Node {}: {}% {}{}",
                rollup.id,
                rollup.progress,
                rollup.status.with_icon(),
                if rollup.changed { "" } else { " (unchanged)" }
            )?;
        }
        Ok(())
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Project> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted project '{}' (ID: {}) with all of its nodes",
            self.resource.name, self.resource.id
        )
    }
}

impl fmt::Display for DeleteResult<Node> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted node {} '{}' (ID: {}) and its subtree",
            self.resource.code, self.resource.name, self.resource.id
        )
    }
}
