//! Service container for dependency injection
//!
//! Wires up settings, the filesystem boundary and the document loader.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::{BootstrapOptions, Bootstrapper, NavigationService};
use crate::config::Settings;
use crate::domain::DateHierarchyBuilder;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{DocumentLoader, InfraResult};

/// Container holding shared dependencies and building services on demand.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    pub fn loader(&self) -> DocumentLoader {
        DocumentLoader::new(Arc::clone(&self.fs))
    }

    pub fn date_builder(&self) -> DateHierarchyBuilder {
        DateHierarchyBuilder::new().with_date_format(&self.settings.date_format)
    }

    /// Bootstrap options from settings.
    pub fn bootstrap_options(&self) -> BootstrapOptions {
        BootstrapOptions {
            collection_index: self.settings.collection_index,
            manifest_index: self.settings.manifest_index,
            range_id: None,
            top_range_index: self.settings.top_range_index,
        }
    }

    /// Load `path` and open it with `options`.
    pub fn open(&self, path: &Path, options: BootstrapOptions) -> InfraResult<NavigationService> {
        debug!("open: {} with {:?}", path.display(), options);
        let resource = self.loader().load(path)?;
        let service = Bootstrapper::new(options)
            .with_date_builder(self.date_builder())
            .bootstrap(resource)?;
        Ok(service)
    }
}
