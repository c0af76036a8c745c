use std::fmt;

use chrono::{DateTime, Utc};
use generational_arena::{Arena, Index};
use tracing::instrument;

/// Structural kind of the entity a node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Collection,
    Manifest,
    Range,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Collection => write!(f, "collection"),
            NodeType::Manifest => write!(f, "manifest"),
            NodeType::Range => write!(f, "range"),
        }
    }
}

/// Data payload for tree nodes.
///
/// Native nodes carry a `node_type` and their canvases. Synthetic date
/// grouping nodes have no `node_type` and carry the derived grouping keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeData {
    pub node_type: Option<NodeType>,
    /// Canvas ids reachable from this node
    pub canvases: Vec<String>,
    /// First year of a decade node
    pub start_year: Option<i32>,
    /// Last year of a decade node
    pub end_year: Option<i32>,
    pub year: Option<i32>,
    /// Zero-based month (0 = January)
    pub month: Option<u32>,
}

impl NodeData {
    pub fn of_type(node_type: NodeType) -> Self {
        Self {
            node_type: Some(node_type),
            ..Self::default()
        }
    }

    pub fn with_canvases(mut self, canvases: Vec<String>) -> Self {
        self.canvases = canvases;
        self
    }

    pub fn has_canvases(&self) -> bool {
        !self.canvases.is_empty()
    }
}

/// Tree node in the arena-based navigation tree.
///
/// Parent and child links are owned by the [`NavTree`] the node lives in;
/// a freshly constructed node is detached and has no children.
#[derive(Debug, Clone, Default)]
pub struct TreeNode {
    /// Identifier of the underlying structural entity, None for synthetic nodes
    pub id: Option<String>,
    pub label: String,
    pub nav_date: Option<DateTime<Utc>>,
    pub data: NodeData,
    parent: Option<Index>,
    children: Vec<Index>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_nav_date(mut self, nav_date: Option<DateTime<Utc>>) -> Self {
        self.nav_date = nav_date;
        self
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    /// Child indices in insertion (or last sorted) order.
    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} [{}]", self.label, id),
            None => write!(f, "{}", self.label),
        }
    }
}

/// Arena-based navigation tree.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Every node is owned by exactly one parent; the root has none.
#[derive(Debug, Clone)]
pub struct NavTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for NavTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NavTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Creates a tree holding a single root node.
    pub fn with_root(node: TreeNode) -> Self {
        let mut tree = Self::new();
        tree.insert_node(node, None);
        tree
    }

    /// Inserts `node` under `parent`, or as the new root when `parent` is None.
    ///
    /// Any links the node carried are discarded. An index that is no longer
    /// live in this arena leaves the node detached.
    #[instrument(level = "trace", skip(self, node), fields(label = %node.label))]
    pub fn insert_node(&mut self, mut node: TreeNode, parent: Option<Index>) -> Index {
        node.parent = parent;
        node.children.clear();
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// Appends `child` as the last child of `parent`.
    pub fn add_node(&mut self, parent: Index, child: TreeNode) -> Index {
        self.insert_node(child, Some(parent))
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&TreeNode> {
        self.root.and_then(|idx| self.arena.get(idx))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Children of `idx` paired with their indices, in order.
    pub fn children(&self, idx: Index) -> impl Iterator<Item = (Index, &TreeNode)> + '_ {
        self.arena
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&child| self.arena.get(child).map(|node| (child, node)))
    }

    /// First child of `parent` matching `predicate`.
    pub fn find_child<P>(&self, parent: Index, mut predicate: P) -> Option<Index>
    where
        P: FnMut(&TreeNode) -> bool,
    {
        self.children(parent)
            .find(|(_, node)| predicate(node))
            .map(|(idx, _)| idx)
    }

    /// Stable sort of the children of `parent` by a derived key.
    #[instrument(level = "trace", skip(self, key))]
    pub fn sort_children_by_key<K, F>(&mut self, parent: Index, mut key: F)
    where
        K: Ord,
        F: FnMut(&TreeNode) -> K,
    {
        let Some(node) = self.arena.get_mut(parent) else {
            return;
        };
        let mut children = std::mem::take(&mut node.children);
        let arena = &self.arena;
        children.sort_by_cached_key(|&child| arena.get(child).map(&mut key));
        if let Some(node) = self.arena.get_mut(parent) {
            node.children = children;
        }
    }

    /// Detaches `idx` from its parent and drops it together with its descendants.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) {
        let Some(parent) = self.arena.get(idx).map(|node| node.parent) else {
            return;
        };
        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.retain(|&child| child != idx);
            }
        }
        if self.root == Some(idx) {
            self.root = None;
        }

        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.arena.remove(current) {
                stack.extend(removed.children);
            }
        }
    }

    /// Pre-order traversal from the root: a node is yielded before its
    /// descendants, and siblings in child order.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `start`.
    pub fn iter_from(&self, start: Index) -> TreeIterator {
        TreeIterator::new(self, Some(start))
    }

    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Labels of all leaf nodes, left to right.
    pub fn leaf_labels(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.label.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a NavTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a NavTree, start: Option<Index>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
