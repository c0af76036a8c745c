//! Sibling lookup over a flattened navigation tree.
//!
//! `previous` returns the node immediately before the current one, whatever
//! it holds. `next` skips forward to the first node that has canvases.

use generational_arena::Index;
use tracing::trace;

use crate::domain::arena::{NavTree, TreeNode};
use crate::domain::flatten::flatten;

pub struct SiblingNavigator<'a> {
    tree: &'a NavTree,
    flattened: Vec<Index>,
}

impl<'a> SiblingNavigator<'a> {
    pub fn new(tree: &'a NavTree) -> Self {
        Self::with_flattened(tree, flatten(tree))
    }

    /// Navigates over a sequence previously produced by [`flatten`].
    pub fn with_flattened(tree: &'a NavTree, flattened: Vec<Index>) -> Self {
        Self { tree, flattened }
    }

    pub fn flattened(&self) -> &[Index] {
        &self.flattened
    }

    /// Node preceding `current_id` in pre-order, with no content filter.
    ///
    /// None when `current_id` is first or absent.
    pub fn previous(&self, current_id: &str) -> Option<&'a TreeNode> {
        let position = self.position_of(current_id)?;
        let previous = position.checked_sub(1)?;
        self.tree.get_node(self.flattened[previous])
    }

    /// First node after `current_id` whose canvases are non-empty.
    pub fn next(&self, current_id: &str) -> Option<&'a TreeNode> {
        let position = self.position_of(current_id)?;
        self.flattened[position + 1..]
            .iter()
            .filter_map(|&idx| self.tree.get_node(idx))
            .find(|node| node.data.has_canvases())
    }

    fn position_of(&self, current_id: &str) -> Option<usize> {
        let position = self.flattened.iter().position(|&idx| {
            self.tree
                .get_node(idx)
                .and_then(|node| node.id.as_deref())
                == Some(current_id)
        });
        trace!("position_of {current_id}: {position:?}");
        position
    }
}
