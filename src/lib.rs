//! Navigable table-of-contents trees for digitized documents.
//!
//! Builds a navigation tree from a collection or manifest, flattens it in
//! document order, steps between sibling entries and re-groups dated entries
//! into a decade/year/month hierarchy.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
