//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper handles the empty case itself so callers never have to.

use std::fmt;

use crate::models::{Assignment, DelayedNode, Node, Project, TreeNode};

/// Newtype wrapper for displaying a list of projects.
///
/// # Examples
///
/// ```rust
/// use arbor_core::{display::Projects, models::Project};
/// use jiff::Timestamp;
///
/// let project = Project {
///     id: 1,
///     name: "Bridge".to_string(),
///     description: None,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
/// };
/// let output = format!("{}", Projects(&[project]));
/// assert!(output.contains("Bridge"));
/// assert_eq!(format!("{}", Projects(&[])), "No projects found.\n");
/// ```
pub struct Projects<'a>(pub &'a [Project]);

impl fmt::Display for Projects<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No projects found.");
        }
        for project in self.0 {
            writeln!(f, "## {} (ID: {})", project.name, project.id)?;
            writeln!(f)?;
            if let Some(desc) = &project.description {
                writeln!(f, "- **Description**: {desc}")?;
            }
            writeln!(
                f,
                "- **Updated**: {}",
                super::LocalDateTime(&project.updated_at)
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A flat node list, one line per node.
pub struct NodeList<'a>(pub &'a [Node]);

impl fmt::Display for NodeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No nodes found.");
        }
        for node in self.0 {
            write!(f, "- ")?;
            node.fmt_line(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A nested forest rendered as an indented outline.
///
/// ```rust
/// use arbor_core::{display::Forest, models::{Level, Node, NodeStatus, TreeNode}};
/// use jiff::Timestamp;
///
/// let node = |id, code: &str, level| Node {
///     id,
///     project_id: 1,
///     parent_id: None,
///     code: code.to_string(),
///     name: format!("Work {code}"),
///     description: None,
///     level,
///     status: NodeStatus::Pending,
///     progress: 0,
///     order: 0,
///     weight: 1,
///     start_date: None,
///     end_date: None,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
/// };
/// let tree = TreeNode {
///     node: node(1, "1", Level::L1),
///     children: vec![TreeNode::leaf(node(2, "1.1", Level::L2))],
/// };
/// let output = format!("{}", Forest(&[tree]));
/// assert!(output.contains("- **1** Work 1"));
/// assert!(output.contains("  - **1.1** Work 1.1"));
/// ```
pub struct Forest<'a>(pub &'a [TreeNode]);

impl Forest<'_> {
    fn fmt_tree(tree: &TreeNode, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:indent$}- ", "", indent = depth * 2)?;
        tree.node.fmt_line(f)?;
        writeln!(f)?;
        for child in &tree.children {
            Self::fmt_tree(child, depth + 1, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Forest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No nodes found.");
        }
        for tree in self.0 {
            Self::fmt_tree(tree, 0, f)?;
        }
        Ok(())
    }
}

/// Delayed leaves with how late each one is.
pub struct DelayedNodes<'a>(pub &'a [DelayedNode]);

impl fmt::Display for DelayedNodes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No delayed work.");
        }
        for delayed in self.0 {
            write!(f, "- ")?;
            delayed.node.fmt_line(f)?;
            let end = delayed
                .node
                .end_date
                .map(|d| d.to_string())
                .unwrap_or_default();
            writeln!(
                f,
                ": due {end}, {} day{} late",
                delayed.delay_days,
                if delayed.delay_days == 1 { "" } else { "s" }
            )?;
        }
        Ok(())
    }
}

/// People assigned to one node.
pub struct Assignees<'a> {
    pub node_id: u64,
    pub assignments: &'a [Assignment],
}

impl fmt::Display for Assignees<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.assignments.is_empty() {
            return writeln!(f, "Nobody is assigned to node {}.", self.node_id);
        }
        writeln!(f, "Assigned to node {}:", self.node_id)?;
        writeln!(f)?;
        for assignment in self.assignments {
            writeln!(
                f,
                "- Person {} (since {})",
                assignment.person_id,
                super::LocalDateTime(&assignment.assigned_at)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::{Level, NodeStatus};

    fn node(code: &str) -> Node {
        Node {
            id: 7,
            project_id: 1,
            parent_id: None,
            code: code.to_string(),
            name: "Survey".to_string(),
            description: None,
            level: Level::L1,
            status: NodeStatus::InProgress,
            progress: 40,
            order: 0,
            weight: 1,
            start_date: None,
            end_date: Some(date(2026, 1, 1)),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_node_list_lines() {
        let output = format!("{}", NodeList(&[node("1"), node("2")]));
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains("**1** Survey (L1, ➤ In Progress, 40%)"));
    }

    #[test]
    fn test_delayed_nodes_pluralization() {
        let one = DelayedNode {
            node: node("1"),
            delay_days: 1,
        };
        let many = DelayedNode {
            node: node("2"),
            delay_days: 12,
        };
        let output = format!("{}", DelayedNodes(&[one, many]));
        assert!(output.contains("due 2026-01-01, 1 day late"));
        assert!(output.contains("12 days late"));
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(format!("{}", NodeList(&[])), "No nodes found.\n");
        assert_eq!(format!("{}", Forest(&[])), "No nodes found.\n");
        assert_eq!(format!("{}", DelayedNodes(&[])), "No delayed work.\n");
        let assignees = Assignees {
            node_id: 3,
            assignments: &[],
        };
        assert!(format!("{assignees}").contains("Nobody"));
    }
}
