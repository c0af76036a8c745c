//! Structural resource model and native tree construction.

use chrono::{DateTime, Utc};
use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{NavTree, NodeData, NodeType, TreeNode};
use crate::domain::error::DomainError;

/// Label of the root node of a manifest's range tree.
pub const MANIFEST_ROOT_LABEL: &str = "root";

/// A single page/view of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pub id: String,
    pub label: String,
}

/// A structural range: a named span of canvases with nested sub-ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Range {
    pub id: String,
    pub label: String,
    pub nav_date: Option<DateTime<Utc>>,
    pub canvas_ids: Vec<String>,
    pub ranges: Vec<Range>,
}

impl Range {
    /// This range and all nested ranges, pre-order.
    pub fn descendants(&self) -> Vec<&Range> {
        let mut out = vec![self];
        for range in &self.ranges {
            out.extend(range.descendants());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    pub id: String,
    pub label: String,
    pub nav_date: Option<DateTime<Utc>>,
    pub canvases: Vec<Canvas>,
    /// Top-level ranges
    pub structures: Vec<Range>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collection {
    pub id: String,
    pub label: String,
    pub nav_date: Option<DateTime<Utc>>,
    pub manifests: Vec<Manifest>,
    pub collections: Vec<Collection>,
}

/// Root structural resource of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Collection(Collection),
    Manifest(Manifest),
}

impl Resource {
    pub fn id(&self) -> &str {
        match self {
            Resource::Collection(c) => &c.id,
            Resource::Manifest(m) => &m.id,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Resource::Collection(_))
    }

    pub fn top_ranges(&self) -> &[Range] {
        match self {
            Resource::Collection(_) => &[],
            Resource::Manifest(m) => &m.structures,
        }
    }

    pub fn all_ranges(&self) -> Vec<&Range> {
        match self {
            Resource::Collection(_) => Vec::new(),
            Resource::Manifest(m) => m.all_ranges(),
        }
    }

    pub fn canvas_ids(&self) -> Vec<&str> {
        match self {
            Resource::Collection(_) => Vec::new(),
            Resource::Manifest(m) => m.canvas_ids(),
        }
    }
}

impl Manifest {
    pub fn all_ranges(&self) -> Vec<&Range> {
        self.structures
            .iter()
            .flat_map(|range| range.descendants())
            .collect()
    }

    pub fn canvas_ids(&self) -> Vec<&str> {
        self.canvases.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn range_by_id(&self, id: &str) -> Option<&Range> {
        self.all_ranges().into_iter().find(|range| range.id == id)
    }

    pub fn canvas_by_id(&self, id: &str) -> Option<&Canvas> {
        self.canvases.iter().find(|canvas| canvas.id == id)
    }
}

/// Builds the native navigation tree of `resource`.
///
/// Collections produce their default tree (manifests, then sub-collections).
/// Manifests produce a tree rooted at the top range `top_range_index`, or a
/// lone root when the manifest has no ranges.
#[instrument(level = "debug", skip(resource), fields(id = resource.id()))]
pub fn build_native_tree(
    resource: &Resource,
    top_range_index: usize,
) -> Result<NavTree, DomainError> {
    match resource {
        Resource::Collection(collection) => {
            let mut tree = NavTree::new();
            add_collection(&mut tree, collection, None);
            Ok(tree)
        }
        Resource::Manifest(manifest) => {
            if manifest.structures.is_empty() {
                debug!("manifest has no ranges, returning bare root");
                return Ok(NavTree::with_root(
                    TreeNode::new(MANIFEST_ROOT_LABEL)
                        .with_id(&manifest.id)
                        .with_nav_date(manifest.nav_date)
                        .with_data(
                            NodeData::of_type(NodeType::Manifest).with_canvases(
                                manifest.canvas_ids().into_iter().map(String::from).collect(),
                            ),
                        ),
                ));
            }
            let top = manifest.structures.get(top_range_index).ok_or(
                DomainError::TopRangeNotFound {
                    index: top_range_index,
                    available: manifest.structures.len(),
                },
            )?;

            let mut tree = NavTree::with_root(range_node(top).with_label(MANIFEST_ROOT_LABEL));
            if let Some(root) = tree.root() {
                let mut stack: Vec<_> = top.ranges.iter().rev().map(|r| (r, root)).collect();
                while let Some((range, parent)) = stack.pop() {
                    let idx = tree.add_node(parent, range_node(range));
                    stack.extend(range.ranges.iter().rev().map(|r| (r, idx)));
                }
            }
            Ok(tree)
        }
    }
}

fn range_node(range: &Range) -> TreeNode {
    TreeNode::new(&range.label)
        .with_id(&range.id)
        .with_nav_date(range.nav_date)
        .with_data(NodeData::of_type(NodeType::Range).with_canvases(range.canvas_ids.clone()))
}

fn add_collection(tree: &mut NavTree, collection: &Collection, parent: Option<Index>) {
    let node = TreeNode::new(&collection.label)
        .with_id(&collection.id)
        .with_nav_date(collection.nav_date)
        .with_data(NodeData::of_type(NodeType::Collection));
    let idx = tree.insert_node(node, parent);

    for manifest in &collection.manifests {
        let node = TreeNode::new(&manifest.label)
            .with_id(&manifest.id)
            .with_nav_date(manifest.nav_date)
            .with_data(
                NodeData::of_type(NodeType::Manifest)
                    .with_canvases(manifest.canvas_ids().into_iter().map(String::from).collect()),
            );
        tree.add_node(idx, node);
    }
    for sub in &collection.collections {
        add_collection(tree, sub, Some(idx));
    }
}
