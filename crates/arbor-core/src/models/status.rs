//! Node status enumeration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of node statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// No work has started
    #[default]
    Pending,

    /// Work is underway
    InProgress,

    /// Work is finished
    Completed,

    /// Work was abandoned
    Cancelled,

    /// Work is paused
    OnHold,
}

impl FromStr for NodeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(NodeStatus::Pending),
            "in_progress" | "inprogress" => Ok(NodeStatus::InProgress),
            "completed" | "done" => Ok(NodeStatus::Completed),
            "cancelled" | "canceled" => Ok(NodeStatus::Cancelled),
            "on_hold" | "onhold" => Ok(NodeStatus::OnHold),
            _ => Err(format!("Invalid node status: {s}")),
        }
    }
}

impl NodeStatus {
    pub const ALL: [NodeStatus; 5] = [
        NodeStatus::Pending,
        NodeStatus::InProgress,
        NodeStatus::Completed,
        NodeStatus::Cancelled,
        NodeStatus::OnHold,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "pending",
            NodeStatus::InProgress => "in_progress",
            NodeStatus::Completed => "completed",
            NodeStatus::Cancelled => "cancelled",
            NodeStatus::OnHold => "on_hold",
        }
    }

    /// Statuses set by hand that progress roll-up never overwrites.
    pub fn is_hold(&self) -> bool {
        matches!(self, NodeStatus::Cancelled | NodeStatus::OnHold)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use arbor_core::models::NodeStatus;
    ///
    /// assert_eq!(NodeStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(NodeStatus::OnHold.with_icon(), "‖ On Hold");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "○ Pending",
            NodeStatus::InProgress => "➤ In Progress",
            NodeStatus::Completed => "✓ Completed",
            NodeStatus::Cancelled => "✗ Cancelled",
            NodeStatus::OnHold => "‖ On Hold",
        }
    }
}
