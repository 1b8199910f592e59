//! Flat node list to nested forest.

use std::collections::{HashMap, HashSet};

use crate::models::{Node, TreeNode};

/// Assembles a flat list of a project's nodes into a forest.
///
/// A node whose `parent_id` does not resolve to another node in the input
/// becomes a root. Children and roots are ordered by `order` ascending; ties
/// keep their input order, so the result is a pure function of the input.
/// Nodes caught in a parent cycle are emitted as roots rather than dropped.
pub fn assemble(nodes: Vec<Node>) -> Vec<TreeNode> {
    let index: HashMap<u64, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut roots = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        match node.parent_id.and_then(|parent| index.get(&parent)) {
            Some(&parent) if parent != i => children[parent].push(i),
            _ => roots.push(i),
        }
    }

    let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
    let mut forest: Vec<TreeNode> = roots
        .into_iter()
        .filter_map(|i| build(i, &children, &mut slots))
        .collect();

    // Anything still unclaimed is only reachable through a cycle.
    for i in 0..slots.len() {
        if let Some(tree) = build(i, &children, &mut slots) {
            forest.push(tree);
        }
    }

    sort_by_order(&mut forest);
    forest
}

fn build(
    index: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<Node>],
) -> Option<TreeNode> {
    let node = slots[index].take()?;
    let kids = children[index]
        .iter()
        .filter_map(|&child| build(child, children, slots))
        .collect();
    Some(TreeNode {
        node,
        children: kids,
    })
}

fn sort_by_order(trees: &mut [TreeNode]) {
    trees.sort_by_key(|tree| tree.node.order);
    for tree in trees.iter_mut() {
        sort_by_order(&mut tree.children);
    }
}

/// Flattens a forest back into pre-order (parents before children).
pub fn flatten(forest: &[TreeNode]) -> Vec<&Node> {
    let mut out = Vec::new();
    let mut stack: Vec<&TreeNode> = forest.iter().rev().collect();
    while let Some(tree) = stack.pop() {
        out.push(&tree.node);
        stack.extend(tree.children.iter().rev());
    }
    out
}

/// Nodes of a flat list that no other node in the list names as parent.
pub fn leaves(nodes: &[Node]) -> impl Iterator<Item = &Node> {
    let parents: HashSet<u64> = nodes.iter().filter_map(|n| n.parent_id).collect();
    nodes.iter().filter(move |n| !parents.contains(&n.id))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Level, NodeStatus};

    fn node(id: u64, parent_id: Option<u64>, order: u32) -> Node {
        Node {
            id,
            project_id: 1,
            parent_id,
            code: format!("n{id}"),
            name: format!("Node {id}"),
            description: None,
            level: Level::L1,
            status: NodeStatus::Pending,
            progress: 0,
            order,
            weight: 1,
            start_date: None,
            end_date: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn ids(forest: &[TreeNode]) -> Vec<u64> {
        forest.iter().map(|tree| tree.node.id).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble(Vec::new()).is_empty());
    }

    #[test]
    fn test_children_sorted_by_order() {
        let forest = assemble(vec![
            node(1, None, 0),
            node(2, Some(1), 2),
            node(3, Some(1), 0),
            node(4, Some(1), 1),
            node(5, Some(3), 0),
        ]);
        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![3, 4, 2]);
        assert_eq!(ids(&forest[0].children[0].children), vec![5]);
        assert_eq!(forest[0].size(), 5);
    }

    #[test]
    fn test_children_listed_before_parent() {
        let forest = assemble(vec![node(2, Some(1), 0), node(1, None, 0)]);
        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![2]);
    }

    #[test]
    fn test_roots_sorted_by_order() {
        let forest = assemble(vec![node(1, None, 1), node(2, None, 0)]);
        assert_eq!(ids(&forest), vec![2, 1]);
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let forest = assemble(vec![node(1, None, 0), node(7, Some(99), 1)]);
        assert_eq!(ids(&forest), vec![1, 7]);
        assert!(forest[1].is_leaf());
    }

    #[test]
    fn test_self_parent_becomes_root() {
        let forest = assemble(vec![node(1, Some(1), 0)]);
        assert_eq!(ids(&forest), vec![1]);
    }

    #[test]
    fn test_cycle_nodes_are_not_dropped() {
        let forest = assemble(vec![node(1, Some(2), 0), node(2, Some(1), 0)]);
        let total: usize = forest.iter().map(TreeNode::size).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let input = vec![
            node(1, None, 0),
            node(2, None, 1),
            node(3, Some(2), 1),
            node(4, Some(2), 0),
            node(5, Some(4), 0),
        ];
        assert_eq!(assemble(input.clone()), assemble(input));
    }

    #[test]
    fn test_flatten_is_preorder() {
        let forest = assemble(vec![
            node(1, None, 0),
            node(2, Some(1), 1),
            node(3, Some(1), 0),
            node(4, None, 1),
        ]);
        let order: Vec<u64> = flatten(&forest).iter().map(|n| n.id).collect();
        assert_eq!(order, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_leaves_are_nodes_without_children() {
        let nodes = vec![
            node(1, None, 0),
            node(2, Some(1), 0),
            node(3, Some(1), 1),
            node(4, Some(3), 0),
            node(5, None, 1),
        ];
        let leaf_ids: Vec<u64> = leaves(&nodes).map(|n| n.id).collect();
        assert_eq!(leaf_ids, vec![2, 4, 5]);
    }
}
