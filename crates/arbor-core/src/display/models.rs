//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so presentation stays separate
//! from the data structures. All output is Markdown.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Level, Node, NodeStatus, Project, ProjectStatistics};

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        Ok(())
    }
}

impl Node {
    /// One-line summary used in outlines and lists.
    pub(crate) fn fmt_line(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "**{}** {} ({}, {}, {}%)",
            self.code,
            self.name,
            self.level,
            self.status.with_icon(),
            self.progress
        )
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} {} (ID: {})", self.code, self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- Level: {}", self.level)?;
        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- Progress: {}%", self.progress)?;
        writeln!(f, "- Weight: {}", self.weight)?;
        match self.parent_id {
            Some(parent) => writeln!(f, "- Parent: {parent}")?,
            None => writeln!(f, "- Parent: none (root)")?,
        }
        if let Some(start) = self.start_date {
            writeln!(f, "- Start: {start}")?;
        }
        if let Some(end) = self.end_date {
            writeln!(f, "- End: {end}")?;
        }
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        Ok(())
    }
}

impl fmt::Display for ProjectStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Statistics for project {}", self.project_id)?;
        writeln!(f)?;
        writeln!(f, "- Overall progress: {}%", self.overall_progress)?;
        writeln!(f, "- Nodes: {}", self.total_nodes)?;
        for (level, count) in &self.nodes_per_level {
            writeln!(f, "  - {level}: {count}")?;
        }
        writeln!(f, "- Leaves: {}", self.leaf_count)?;
        for (status, count) in &self.leaves_per_status {
            writeln!(f, "  - {}: {count}", status.with_icon())?;
        }
        writeln!(f, "- Delayed leaves: {}", self.delayed_leaves)
    }
}
