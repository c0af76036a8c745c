//! Domain layer: navigation trees and the structural resource model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod annotation;
pub mod arena;
pub mod dates;
pub mod error;
pub mod flatten;
pub mod navigator;
pub mod resource;
pub mod sort;

pub use annotation::{AnnotationGroup, AnnotationRect};
pub use arena::{NavTree, NodeData, NodeType, TreeNode};
pub use dates::DateHierarchyBuilder;
pub use error::DomainError;
pub use flatten::{flatten, flatten_from, has_any_nav_date};
pub use navigator::SiblingNavigator;
pub use resource::{
    build_native_tree, Canvas, Collection, Manifest, Range, Resource, MANIFEST_ROOT_LABEL,
};
pub use sort::{sort_tree, TreeSortType};
