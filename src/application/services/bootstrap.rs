//! Manifest selection within a loaded resource.

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, NavigationService};
use crate::domain::{Collection, DateHierarchyBuilder, Manifest, Resource};

/// Which part of a collection to open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Sub-collection to descend into; None opens the collection's own manifests
    pub collection_index: Option<usize>,
    pub manifest_index: usize,
    pub range_id: Option<String>,
    pub top_range_index: usize,
}

/// Resolves the manifest to display and creates the [`NavigationService`].
#[derive(Debug, Clone, Default)]
pub struct Bootstrapper {
    options: BootstrapOptions,
    date_builder: DateHierarchyBuilder,
}

impl Bootstrapper {
    pub fn new(options: BootstrapOptions) -> Self {
        Self {
            options,
            date_builder: DateHierarchyBuilder::default(),
        }
    }

    pub fn with_date_builder(mut self, date_builder: DateHierarchyBuilder) -> Self {
        self.date_builder = date_builder;
        self
    }

    #[instrument(level = "debug", skip(self, resource), fields(id = resource.id()))]
    pub fn bootstrap(&self, resource: Resource) -> ApplicationResult<NavigationService> {
        let manifest = match &resource {
            Resource::Manifest(manifest) => manifest.clone(),
            Resource::Collection(collection) => self.select_manifest(collection)?.clone(),
        };
        debug!("bootstrap: selected manifest {}", manifest.id);

        Ok(NavigationService::new(resource, Some(manifest))
            .with_range_id(self.options.range_id.clone())
            .with_top_range_index(self.options.top_range_index)
            .with_date_builder(self.date_builder.clone()))
    }

    fn select_manifest<'a>(&self, root: &'a Collection) -> ApplicationResult<&'a Manifest> {
        let manifest_index = self.options.manifest_index;
        let mut collection_index = self.options.collection_index;
        let mut collection = root;

        loop {
            // Only sub-collections available: open the first one
            if collection.manifests.is_empty() && collection_index.is_none() {
                collection_index = Some(0);
            }

            let Some(index) = collection_index.filter(|_| !collection.collections.is_empty())
            else {
                return collection
                    .manifests
                    .get(manifest_index)
                    .ok_or(ApplicationError::ManifestNotFound(manifest_index));
            };

            let sub = collection
                .collections
                .get(index)
                .ok_or(ApplicationError::CollectionNotFound(index))?;

            if sub.manifests.is_empty() && manifest_index == 0 && !sub.collections.is_empty() {
                debug!("collection {} has only sub-collections, descending", sub.id);
                collection = sub;
                collection_index = Some(0);
                continue;
            }

            return sub
                .manifests
                .get(manifest_index)
                .ok_or(ApplicationError::ManifestNotFound(manifest_index));
        }
    }
}
