//! Navigation service
//!
//! Resource-level operations over one loaded document: tree construction
//! with sort dispatch, range lookups and previous/next range navigation.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    build_native_tree, flatten, has_any_nav_date, sort_tree, Canvas, DateHierarchyBuilder,
    Manifest, NavTree, Range, Resource, SiblingNavigator, TreeSortType,
};

/// Service for navigating the structure of a loaded document.
#[derive(Debug, Clone, Default)]
pub struct NavigationService {
    resource: Option<Resource>,
    manifest: Option<Manifest>,
    range_id: Option<String>,
    top_range_index: usize,
    date_builder: DateHierarchyBuilder,
}

impl NavigationService {
    /// Create a service over `resource` with `manifest` as the selected manifest.
    pub fn new(resource: Resource, manifest: Option<Manifest>) -> Self {
        Self {
            resource: Some(resource),
            manifest,
            ..Self::default()
        }
    }

    /// Set the current range used when no explicit range is given.
    pub fn with_range_id(mut self, range_id: Option<String>) -> Self {
        self.range_id = range_id;
        self
    }

    pub fn with_top_range_index(mut self, top_range_index: usize) -> Self {
        self.top_range_index = top_range_index;
        self
    }

    pub fn with_date_builder(mut self, date_builder: DateHierarchyBuilder) -> Self {
        self.date_builder = date_builder;
        self
    }

    pub fn resource(&self) -> ApplicationResult<&Resource> {
        self.resource.as_ref().ok_or(ApplicationError::ManifestNotLoaded)
    }

    pub fn manifest(&self) -> ApplicationResult<&Manifest> {
        self.manifest.as_ref().ok_or(ApplicationError::ManifestNotLoaded)
    }

    /// Build the navigation tree for the root resource.
    ///
    /// Date sorting falls back to the native tree when no node is dated.
    #[instrument(level = "debug", skip(self))]
    pub fn get_tree(
        &self,
        top_range_index: usize,
        sort_type: TreeSortType,
    ) -> ApplicationResult<NavTree> {
        let native = build_native_tree(self.resource()?, top_range_index)?;
        debug!("get_tree: native tree has {} nodes", native.len());
        Ok(sort_tree(native, sort_type, &self.date_builder))
    }

    /// Pre-order node sequence of `tree`, root first.
    pub fn get_flattened_tree(&self, tree: &NavTree) -> Vec<Index> {
        flatten(tree)
    }

    pub fn tree_has_nav_dates(&self, tree: &NavTree) -> bool {
        has_any_nav_date(tree)
    }

    pub fn get_top_ranges(&self) -> ApplicationResult<&[Range]> {
        Ok(&self.manifest()?.structures)
    }

    pub fn get_all_ranges(&self) -> ApplicationResult<Vec<&Range>> {
        Ok(self.manifest()?.all_ranges())
    }

    pub fn get_range_by_id(&self, id: &str) -> ApplicationResult<Option<&Range>> {
        Ok(self.manifest()?.range_by_id(id))
    }

    pub fn get_current_range(&self) -> ApplicationResult<Option<&Range>> {
        match &self.range_id {
            Some(id) => self.get_range_by_id(id),
            None => Ok(None),
        }
    }

    /// Canvases of `range` that exist in the manifest, in range order.
    pub fn get_range_canvases(&self, range: &Range) -> ApplicationResult<Vec<&Canvas>> {
        let manifest = self.manifest()?;
        Ok(range
            .canvas_ids
            .iter()
            .filter_map(|id| manifest.canvas_by_id(id))
            .collect())
    }

    /// Ranges listing `canvas_id` among their canvases.
    ///
    /// Ids are compared after stripping the URL scheme and fragment.
    pub fn get_canvas_ranges(&self, canvas_id: &str) -> ApplicationResult<Vec<&Range>> {
        let wanted = normalise_url(canvas_id);
        Ok(self
            .get_all_ranges()?
            .into_iter()
            .filter(|range| range.canvas_ids.iter().any(|cid| normalise_url(cid) == wanted))
            .collect())
    }

    /// Range preceding `range_id` (or the current range) in the native tree.
    pub fn get_previous_range(&self, range_id: Option<&str>) -> ApplicationResult<Option<&Range>> {
        self.find_sibling_range(range_id, |nav, id| nav.previous(id).and_then(|n| n.id.clone()))
    }

    /// Next range with canvases after `range_id` (or the current range).
    pub fn get_next_range(&self, range_id: Option<&str>) -> ApplicationResult<Option<&Range>> {
        self.find_sibling_range(range_id, |nav, id| nav.next(id).and_then(|n| n.id.clone()))
    }

    fn find_sibling_range<F>(
        &self,
        range_id: Option<&str>,
        find: F,
    ) -> ApplicationResult<Option<&Range>>
    where
        F: Fn(&SiblingNavigator<'_>, &str) -> Option<String>,
    {
        let Some(current) = range_id.or(self.range_id.as_deref()) else {
            return Ok(None);
        };
        let tree = self.get_tree(self.top_range_index, TreeSortType::None)?;
        let navigator = SiblingNavigator::new(&tree);
        match find(&navigator, current) {
            Some(id) => self.get_range_by_id(&id),
            None => Ok(None),
        }
    }
}

/// Strips scheme and fragment so `http://a/b#x` and `https://a/b` compare equal.
fn normalise_url(url: &str) -> &str {
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.split('#').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_url() {
        assert_eq!(normalise_url("https://ex.org/c/1"), "ex.org/c/1");
        assert_eq!(normalise_url("http://ex.org/c/1#xywh=1,2,3,4"), "ex.org/c/1");
        assert_eq!(normalise_url("c1"), "c1");
    }

    #[test]
    fn given_no_resource_when_getting_tree_then_manifest_not_loaded() {
        let service = NavigationService::default();
        let err = service.get_tree(0, TreeSortType::None).unwrap_err();
        assert!(matches!(err, ApplicationError::ManifestNotLoaded));
        assert_eq!(err.to_string(), "manifest not loaded");
    }

    #[test]
    fn given_tree_when_flattening_through_service_then_matches_tree_order() {
        let service = NavigationService::default();
        let mut tree = NavTree::with_root(crate::domain::TreeNode::new("root"));
        let root = tree.root().unwrap();
        let child = tree.add_node(root, crate::domain::TreeNode::new("child"));

        assert_eq!(service.get_flattened_tree(&tree), vec![root, child]);
        assert!(!service.tree_has_nav_dates(&tree));
    }
}
