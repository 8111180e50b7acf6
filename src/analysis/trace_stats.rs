use crate::types::TraceNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Summary of a forward trace tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceStats {
    /// Every node in the tree, root included
    pub node_count: usize,
    /// Nodes on the longest root-to-leaf path
    pub max_path_length: usize,
    /// Distinct transaction hashes (a hash may recur on sibling branches)
    pub unique_transactions: usize,
    /// Nodes whose lookup failed
    pub error_nodes: usize,
    /// Leaves cut off because their hash was already on the path
    pub already_visited_leaves: usize,
    /// Sum of all parent-to-child edge values in satoshis
    pub total_edge_value: u64,
}

impl TraceStats {
    pub fn from_tree(root: &TraceNode) -> Self {
        let mut stats = TraceStats {
            max_path_length: root.depth(),
            ..TraceStats::default()
        };
        let mut hashes = HashSet::new();

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            stats.node_count += 1;
            hashes.insert(node.hash.as_str());
            if node.is_error() {
                stats.error_nodes += 1;
            }
            if node.already_visited {
                stats.already_visited_leaves += 1;
            }
            for child in &node.children {
                stats.total_edge_value = stats.total_edge_value.saturating_add(child.value);
                stack.push(&child.node);
            }
        }

        stats.unique_transactions = hashes.len();
        stats
    }
}
