//! Date-based re-hierarchization: decade → year → month → item.

use std::fmt::Write;

use chrono::{DateTime, Datelike, Utc};
use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NavTree, NodeData, NodeType, TreeNode};
use crate::domain::flatten::flatten;

/// Default chrono format for date leaf labels, e.g. `Tue May 01 1923`.
pub const DEFAULT_DATE_FORMAT: &str = "%a %b %d %Y";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Decade bounds for a year: 1923 → (1920, 1929), 2005 → (2000, 2009).
pub fn decade_bounds(year: i32) -> (i32, i32) {
    let start = year - year.rem_euclid(10);
    (start, start + 9)
}

pub fn decade_label(start_year: i32, end_year: i32) -> String {
    format!("{start_year}–{end_year}")
}

/// English month name for a zero-based month index.
pub fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES
        .get(month0 as usize)
        .copied()
        .unwrap_or_default()
}

/// Builds the synthetic decade/year/month tree from a native tree.
///
/// Grouping keys come from each node's `nav_date` (in UTC). Nodes without a
/// date are skipped. Only manifest nodes become month entries and date
/// leaves; decades left without any year are pruned.
#[derive(Debug, Clone)]
pub struct DateHierarchyBuilder {
    date_format: String,
}

impl Default for DateHierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DateHierarchyBuilder {
    pub fn new() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Uses `format` (chrono strftime syntax) for date leaf labels.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    #[instrument(level = "debug", skip(self, native))]
    pub fn build(&self, native: &NavTree) -> NavTree {
        let root_label = native
            .root_node()
            .map(|node| node.label.clone())
            .unwrap_or_default();
        let mut sorted = NavTree::with_root(TreeNode::new(root_label));
        let Some(root) = sorted.root() else {
            return sorted;
        };

        let nodes: Vec<&TreeNode> = flatten(native)
            .into_iter()
            .filter_map(|idx| native.get_node(idx))
            .collect();
        let items: Vec<&TreeNode> = nodes
            .iter()
            .copied()
            .filter(|node| node.data.node_type == Some(NodeType::Manifest))
            .collect();
        debug!("build: {} nodes, {} items", nodes.len(), items.len());

        self.create_decade_nodes(&mut sorted, root, &nodes);
        sorted.sort_children_by_key(root, |n| n.data.start_year);

        self.create_year_nodes(&mut sorted, root, &nodes);
        for decade in child_indices(&sorted, root) {
            sorted.sort_children_by_key(decade, |n| n.data.year);
        }

        self.create_month_nodes(&mut sorted, root, &items);
        for decade in child_indices(&sorted, root) {
            for year in child_indices(&sorted, decade) {
                sorted.sort_children_by_key(year, |n| n.data.month);
            }
        }

        self.create_date_nodes(&mut sorted, root, &items);
        self.prune_decade_nodes(&mut sorted, root);

        sorted
    }

    fn create_decade_nodes(&self, tree: &mut NavTree, root: Index, nodes: &[&TreeNode]) {
        for (node, nav_date) in dated(nodes) {
            let year = nav_date.year();
            if decade_node(tree, root, year).is_some() {
                continue;
            }
            let (start_year, end_year) = decade_bounds(year);
            trace!("decade {start_year}-{end_year}");
            let decade = TreeNode::new(decade_label(start_year, end_year))
                .with_nav_date(node.nav_date)
                .with_data(NodeData {
                    start_year: Some(start_year),
                    end_year: Some(end_year),
                    ..NodeData::default()
                });
            tree.add_node(root, decade);
        }
    }

    fn create_year_nodes(&self, tree: &mut NavTree, root: Index, nodes: &[&TreeNode]) {
        for (node, nav_date) in dated(nodes) {
            let year = nav_date.year();
            let Some(decade) = decade_node(tree, root, year) else {
                continue;
            };
            if year_node(tree, decade, year).is_some() {
                continue;
            }
            let year_node = TreeNode::new(year.to_string())
                .with_nav_date(node.nav_date)
                .with_data(NodeData {
                    year: Some(year),
                    ..NodeData::default()
                });
            tree.add_node(decade, year_node);
        }
    }

    fn create_month_nodes(&self, tree: &mut NavTree, root: Index, items: &[&TreeNode]) {
        for (node, nav_date) in dated(items) {
            let (year, month) = (nav_date.year(), nav_date.month0());
            let Some(year_idx) =
                decade_node(tree, root, year).and_then(|decade| year_node(tree, decade, year))
            else {
                continue;
            };
            if month_node(tree, year_idx, month).is_some() {
                continue;
            }
            let month_node = TreeNode::new(month_name(month))
                .with_nav_date(node.nav_date)
                .with_data(NodeData {
                    year: Some(year),
                    month: Some(month),
                    ..NodeData::default()
                });
            tree.add_node(year_idx, month_node);
        }
    }

    fn create_date_nodes(&self, tree: &mut NavTree, root: Index, items: &[&TreeNode]) {
        for (node, nav_date) in dated(items) {
            let (year, month) = (nav_date.year(), nav_date.month0());
            let month_idx = decade_node(tree, root, year)
                .and_then(|decade| year_node(tree, decade, year))
                .and_then(|year_idx| month_node(tree, year_idx, month));
            let Some(month_idx) = month_idx else {
                trace!("no month node for {:?}, dropping", node.id);
                continue;
            };

            let mut data = node.data.clone();
            data.node_type = Some(NodeType::Manifest);
            data.year = Some(year);
            data.month = Some(month);

            let mut date_node = TreeNode::new(self.display_date(&nav_date))
                .with_nav_date(Some(nav_date))
                .with_data(data);
            date_node.id = node.id.clone();
            tree.add_node(month_idx, date_node);
        }
    }

    /// Renders a leaf label, falling back to the default format when the
    /// configured one does not render.
    fn display_date(&self, nav_date: &DateTime<Utc>) -> String {
        let mut label = String::new();
        if write!(label, "{}", nav_date.format(&self.date_format)).is_err() {
            label = nav_date.format(DEFAULT_DATE_FORMAT).to_string();
        }
        label
    }

    fn prune_decade_nodes(&self, tree: &mut NavTree, root: Index) {
        let empty: Vec<Index> = tree
            .children(root)
            .filter(|(_, decade)| decade.is_leaf())
            .map(|(idx, _)| idx)
            .collect();
        for decade in empty {
            debug!("pruning empty decade");
            tree.remove_subtree(decade);
        }
    }
}

fn dated<'a>(
    nodes: &'a [&'a TreeNode],
) -> impl Iterator<Item = (&'a TreeNode, DateTime<Utc>)> + 'a {
    nodes
        .iter()
        .filter_map(|&node| node.nav_date.map(|nav_date| (node, nav_date)))
}

fn child_indices(tree: &NavTree, parent: Index) -> Vec<Index> {
    tree.get_node(parent)
        .map(|node| node.children().to_vec())
        .unwrap_or_default()
}

fn decade_node(tree: &NavTree, root: Index, year: i32) -> Option<Index> {
    tree.find_child(root, |n| match (n.data.start_year, n.data.end_year) {
        (Some(start), Some(end)) => (start..=end).contains(&year),
        _ => false,
    })
}

fn year_node(tree: &NavTree, decade: Index, year: i32) -> Option<Index> {
    tree.find_child(decade, |n| n.data.year == Some(year))
}

fn month_node(tree: &NavTree, year: Index, month: u32) -> Option<Index> {
    tree.find_child(year, |n| n.data.month == Some(month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1923, (1920, 1929))]
    #[case(1920, (1920, 1929))]
    #[case(1929, (1920, 1929))]
    #[case(2005, (2000, 2009))]
    #[case(2010, (2010, 2019))]
    fn test_decade_bounds(#[case] year: i32, #[case] expected: (i32, i32)) {
        assert_eq!(decade_bounds(year), expected);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(0), "January");
        assert_eq!(month_name(4), "May");
        assert_eq!(month_name(11), "December");
        assert_eq!(month_name(12), "");
    }

    #[test]
    fn test_decade_label() {
        assert_eq!(decade_label(1920, 1929), "1920–1929");
    }
}
