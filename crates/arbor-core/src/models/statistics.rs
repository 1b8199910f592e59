//! Aggregate figures for a project tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Level, Node, NodeStatus};
use crate::wbs::{leaves, mean_progress, DelayEvaluator};

/// A leaf whose end date has passed without completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DelayedNode {
    #[serde(flatten)]
    pub node: Node,
    /// Whole calendar days past the end date
    pub delay_days: i64,
}

/// Project-wide counts computed from a single bulk read of the tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectStatistics {
    pub project_id: u64,
    pub total_nodes: u32,
    pub nodes_per_level: BTreeMap<Level, u32>,
    pub leaf_count: u32,
    pub leaves_per_status: BTreeMap<NodeStatus, u32>,
    pub delayed_leaves: u32,
    /// Rounded mean of the root nodes' progress, 0 for an empty project
    pub overall_progress: u8,
}

impl ProjectStatistics {
    /// Computes the figures from every node of one project.
    pub fn from_nodes(project_id: u64, nodes: &[Node], delays: &DelayEvaluator) -> Self {
        let mut stats = Self {
            project_id,
            total_nodes: nodes.len() as u32,
            ..Self::default()
        };

        for node in nodes {
            *stats.nodes_per_level.entry(node.level).or_default() += 1;
        }

        for leaf in leaves(nodes) {
            stats.leaf_count += 1;
            *stats.leaves_per_status.entry(leaf.status).or_default() += 1;
            if delays.is_delayed(leaf) {
                stats.delayed_leaves += 1;
            }
        }

        let roots: Vec<u8> = nodes
            .iter()
            .filter(|n| n.is_root())
            .map(|n| n.progress)
            .collect();
        stats.overall_progress = mean_progress(&roots).unwrap_or(0);

        stats
    }
}
