use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::arena::NavTree;
use crate::domain::dates::DateHierarchyBuilder;
use crate::domain::flatten::has_any_nav_date;

/// Requested ordering of a navigation tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TreeSortType {
    /// Native structural order
    #[default]
    None,
    /// Decade → year → month → item hierarchy
    Date,
}

impl FromStr for TreeSortType {
    type Err = std::convert::Infallible;

    /// Unrecognized modes fall back to [`TreeSortType::None`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "date" => TreeSortType::Date,
            _ => TreeSortType::None,
        })
    }
}

impl From<String> for TreeSortType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for TreeSortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSortType::None => write!(f, "none"),
            TreeSortType::Date => write!(f, "date"),
        }
    }
}

/// Returns the tree to display for `sort_type`.
///
/// Date sorting without any dated node degrades to the native tree.
pub fn sort_tree(
    native: NavTree,
    sort_type: TreeSortType,
    builder: &DateHierarchyBuilder,
) -> NavTree {
    match sort_type {
        TreeSortType::Date if has_any_nav_date(&native) => builder.build(&native),
        TreeSortType::Date => {
            debug!("sort_tree: no navigation dates, keeping native order");
            native
        }
        TreeSortType::None => native,
    }
}
