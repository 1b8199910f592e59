//! Node model definition and related functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Level, NodeStatus};

/// A single WBS item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier for the node
    pub id: u64,

    /// ID of the owning project
    pub project_id: u64,

    /// Parent node, `None` for roots
    pub parent_id: Option<u64>,

    /// Hierarchical code such as `2.3.1`, unique within the project
    pub code: String,

    /// Short name of the work item
    pub name: String,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Depth in the tree
    pub level: Level,

    /// Current status
    pub status: NodeStatus,

    /// Completion percentage, 0..=100
    pub progress: u8,

    /// Zero-based position among siblings
    pub order: u32,

    /// Relative contribution to the parent, at least 1
    pub weight: u32,

    /// Planned start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,

    /// Planned end date, used for delay evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,

    /// Timestamp when the node was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the node was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Node {
    /// Whether this node is a root of its project.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A node together with its nested children, as produced by the tree
/// assembler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: Node,

    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Wraps a node with an empty child list.
    pub fn leaf(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Whether this node has no children in the assembled tree.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}
