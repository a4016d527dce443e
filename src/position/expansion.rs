use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

use super::tree::TreeNode;

/// Which tree nodes are open, by opaque node key.
///
/// Independent of the forest's shape, so a refetch keeps nodes open as long
/// as their keys are stable. Starts fully collapsed.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

/// One line of the rendered tree.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRow {
    pub depth: usize,
    pub key: String,
    pub id: String,
    pub label: String,
    pub has_children: bool,
    pub expanded: bool,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `key`. Returns whether it is expanded afterwards.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.to_string());
            true
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Pre-order walk that descends only into expanded nodes with children.
    pub fn visible_rows(&self, forest: &[TreeNode]) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<(usize, &TreeNode)> = forest.iter().rev().map(|n| (0, n)).collect();

        while let Some((depth, node)) = stack.pop() {
            let expanded = self.is_expanded(&node.key);
            rows.push(VisibleRow {
                depth,
                key: node.key.clone(),
                id: node.id.clone(),
                label: node.label.clone(),
                has_children: node.has_children(),
                expanded,
            });
            if expanded && node.has_children() {
                stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            }
        }
        rows
    }
}
