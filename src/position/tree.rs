//! Flat position list to display forest.
//!
//! The forest is derived data: it is rebuilt from the authoritative list on
//! every fetch and only ever mutated locally by [`remove_subtree`].

use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use super::model::Position;

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    /// Expansion key, unique across the whole forest.
    pub key: String,
    pub description: Option<String>,
    #[schema(no_recursion)]
    pub children: Vec<TreeNode>,
    pub source: Position,
}

impl TreeNode {
    /// This node plus all of its descendants.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_len).sum::<usize>()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Composite `label-id` key. `-` and `\` inside the label are escaped so the
/// first bare `-` always separates label from id and two distinct
/// (label, id) pairs can never collide.
pub fn node_key(label: &str, id: &str) -> String {
    let mut key = String::with_capacity(label.len() + id.len() + 1);
    for ch in label.chars() {
        if ch == '-' || ch == '\\' {
            key.push('\\');
        }
        key.push(ch);
    }
    key.push('-');
    key.push_str(id);
    key
}

/// Links every position under the node whose id equals its
/// `parent_position_id`.
///
/// Never fails. Records whose parent is absent, unknown, themselves, or part
/// of a reference cycle become roots. When ids repeat the last record owns the
/// id and earlier ones are dropped. Children keep input order.
pub fn build_tree(positions: &[Position]) -> Vec<TreeNode> {
    let mut slot: HashMap<&str, usize> = HashMap::with_capacity(positions.len());
    for (idx, position) in positions.iter().enumerate() {
        if let Some(previous) = slot.insert(position.id.as_str(), idx) {
            log::warn!(
                "Duplicate position id {}: record #{} replaces record #{}",
                position.id,
                idx,
                previous
            );
        }
    }

    let live: Vec<usize> = (0..positions.len())
        .filter(|&idx| slot.get(positions[idx].id.as_str()) == Some(&idx))
        .collect();

    let mut parent: Vec<Option<usize>> = vec![None; positions.len()];
    for &idx in &live {
        let position = &positions[idx];
        parent[idx] = match position.parent_position_id.as_deref() {
            None => None,
            Some(pid) if pid == position.id => {
                log::warn!("Position {} is its own parent, shown as root", position.id);
                None
            }
            Some(pid) => slot.get(pid).copied(),
        };
    }
    break_cycles(&mut parent, &live, positions);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); positions.len()];
    let mut roots = Vec::new();
    for &idx in &live {
        match parent[idx] {
            Some(p) => children[p].push(idx),
            None => roots.push(idx),
        }
    }

    roots
        .into_iter()
        .map(|idx| assemble(idx, positions, &children))
        .collect()
}

/// Demotes to root the first record (in input order) of every parent cycle.
fn break_cycles(parent: &mut [Option<usize>], live: &[usize], positions: &[Position]) {
    for &start in live {
        let mut cursor = parent[start];
        let mut steps = 0;
        while let Some(current) = cursor {
            if current == start {
                log::warn!(
                    "Position {} closes a parent cycle, shown as root",
                    positions[start].id
                );
                parent[start] = None;
                break;
            }
            steps += 1;
            if steps > live.len() {
                // entered a cycle that a later record will break
                break;
            }
            cursor = parent[current];
        }
    }
}

fn assemble(idx: usize, positions: &[Position], children: &[Vec<usize>]) -> TreeNode {
    let position = &positions[idx];
    TreeNode {
        id: position.id.clone(),
        label: position.name.clone(),
        key: node_key(&position.name, &position.id),
        description: position.description.clone(),
        children: children[idx]
            .iter()
            .map(|&child| assemble(child, positions, children))
            .collect(),
        source: position.clone(),
    }
}

/// Removes the node with `id` and its whole subtree wherever it sits.
/// Returns how many nodes left the forest.
pub fn remove_subtree(nodes: &mut Vec<TreeNode>, id: &str) -> usize {
    let mut removed = 0;
    nodes.retain(|node| {
        if node.id == id {
            removed += node.subtree_len();
            false
        } else {
            true
        }
    });
    for node in nodes.iter_mut() {
        removed += remove_subtree(&mut node.children, id);
    }
    removed
}

pub fn count_nodes(nodes: &[TreeNode]) -> usize {
    nodes.iter().map(TreeNode::subtree_len).sum()
}

pub fn find_node<'a>(nodes: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    nodes.iter().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            find_node(&node.children, id)
        }
    })
}
