//! Pre-order linearization of a navigation tree.
//!
//! The flattened sequence holds indices into the tree it came from, so a
//! caller can resolve (or mutate, via [`NavTree::get_node_mut`]) the very
//! nodes of the original tree. Each call produces a fresh sequence.

use generational_arena::Index;
use tracing::trace;

use crate::domain::arena::NavTree;

/// Flattens the whole tree, root first.
///
/// An empty tree yields an empty sequence.
pub fn flatten(tree: &NavTree) -> Vec<Index> {
    let flattened: Vec<Index> = tree.iter().map(|(idx, _)| idx).collect();
    trace!("flatten: {} nodes", flattened.len());
    flattened
}

/// Flattens the subtree rooted at `start`.
pub fn flatten_from(tree: &NavTree, start: Index) -> Vec<Index> {
    tree.iter_from(start).map(|(idx, _)| idx).collect()
}

/// True when any node reachable from the root carries a navigation date.
pub fn has_any_nav_date(tree: &NavTree) -> bool {
    flatten(tree)
        .into_iter()
        .filter_map(|idx| tree.get_node(idx))
        .any(|node| node.nav_date.is_some())
}
