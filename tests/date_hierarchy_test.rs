//! Tests for DateHierarchyBuilder: decade → year → month → item regrouping.

use generational_arena::Index;

use navtree::domain::{
    build_native_tree, Collection, DateHierarchyBuilder, NavTree, NodeType, Resource,
};
use navtree::util::testing::{
    book_manifest, init_test_setup, issue, periodical_collection, utc_date,
};

fn build(collection: Collection) -> NavTree {
    init_test_setup();
    let native = build_native_tree(&Resource::Collection(collection), 0).unwrap();
    DateHierarchyBuilder::new().build(&native)
}

fn child_labels(tree: &NavTree, parent: Index) -> Vec<String> {
    tree.children(parent).map(|(_, n)| n.label.clone()).collect()
}

fn child_by_label(tree: &NavTree, parent: Index, label: &str) -> Index {
    tree.find_child(parent, |n| n.label == label)
        .unwrap_or_else(|| panic!("no child {label}"))
}

// ============================================================
// Scenario
// ============================================================

#[test]
fn given_dated_and_undated_issues_when_building_then_groups_by_decade_year_month() {
    let tree = build(periodical_collection());
    let root = tree.root().unwrap();

    assert_eq!(child_labels(&tree, root), vec!["1920–1929", "1930–1939"]);

    let twenties = child_by_label(&tree, root, "1920–1929");
    assert_eq!(child_labels(&tree, twenties), vec!["1923"]);

    let y1923 = child_by_label(&tree, twenties, "1923");
    assert_eq!(child_labels(&tree, y1923), vec!["May", "November"]);

    let thirties = child_by_label(&tree, root, "1930–1939");
    let y1931 = child_by_label(&tree, thirties, "1931");
    assert_eq!(child_labels(&tree, y1931), vec!["February"]);
}

#[test]
fn given_undated_issue_when_building_then_it_is_absent() {
    let tree = build(periodical_collection());
    assert!(tree
        .iter()
        .all(|(_, node)| node.id.as_deref() != Some("m-undated")));
}

#[test]
fn given_native_root_when_building_then_synthetic_root_keeps_label_only() {
    let tree = build(periodical_collection());
    let root = tree.root_node().unwrap();
    assert_eq!(root.label, "Periodical");
    assert!(root.id.is_none());
    assert!(root.data.start_year.is_none(), "root is never a decade");
}

// ============================================================
// Date leaves
// ============================================================

#[test]
fn given_dated_issue_when_building_then_leaf_keeps_identity_and_payload() {
    let tree = build(periodical_collection());
    let (_, leaf) = tree
        .iter()
        .find(|(_, n)| n.id.as_deref() == Some("m-1923-05"))
        .unwrap();

    assert_eq!(leaf.label, "Tue May 01 1923");
    assert!(leaf.is_leaf());
    assert_eq!(leaf.nav_date, utc_date("1923-05-01"));
    assert_eq!(leaf.data.node_type, Some(NodeType::Manifest));
    assert_eq!(leaf.data.canvases, vec!["m-1923-05-c1".to_string()]);
    assert_eq!(leaf.data.year, Some(1923));
    assert_eq!(leaf.data.month, Some(4));
}

#[test]
fn given_custom_date_format_when_building_then_leaf_labels_use_it() {
    init_test_setup();
    let native = build_native_tree(&Resource::Collection(periodical_collection()), 0).unwrap();
    let tree = DateHierarchyBuilder::new()
        .with_date_format("%Y-%m-%d")
        .build(&native);

    let mut leaves = tree.leaf_labels();
    leaves.sort();
    assert_eq!(leaves, vec!["1923-05-01", "1923-11-20", "1931-02-14"]);
}

#[test]
fn given_invalid_date_format_when_building_then_falls_back_to_default() {
    init_test_setup();
    let native = build_native_tree(&Resource::Collection(periodical_collection()), 0).unwrap();
    let tree = DateHierarchyBuilder::new().with_date_format("%J").build(&native);

    assert!(tree.leaf_labels().contains(&"Sat Feb 14 1931".to_string()));
}

// ============================================================
// Uniqueness and ordering
// ============================================================

#[test]
fn given_issues_in_same_month_when_building_then_share_one_month_node() {
    let collection = Collection {
        id: "c".into(),
        label: "C".into(),
        manifests: vec![
            issue("a", Some("1923-05-15")),
            issue("b", Some("1923-05-01")),
            issue("c", Some("1925-01-01")),
            issue("d", Some("1923-06-01")),
        ],
        ..Collection::default()
    };
    let tree = build(collection);
    let root = tree.root().unwrap();

    assert_eq!(child_labels(&tree, root), vec!["1920–1929"]);
    let decade = child_by_label(&tree, root, "1920–1929");
    assert_eq!(child_labels(&tree, decade), vec!["1923", "1925"]);

    let y1923 = child_by_label(&tree, decade, "1923");
    assert_eq!(child_labels(&tree, y1923), vec!["May", "June"]);

    // first-seen order within a month
    let may = child_by_label(&tree, y1923, "May");
    let ids: Vec<_> = tree
        .children(may)
        .filter_map(|(_, n)| n.id.clone())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn given_issues_out_of_order_when_building_then_every_level_is_ascending() {
    let collection = Collection {
        id: "c".into(),
        label: "C".into(),
        manifests: vec![
            issue("m1", Some("2005-12-01")),
            issue("m2", Some("1999-03-01")),
            issue("m3", Some("2001-07-01")),
            issue("m4", Some("2001-02-01")),
            issue("m5", Some("1990-01-01")),
        ],
        ..Collection::default()
    };
    let tree = build(collection);
    let root = tree.root().unwrap();

    let decades: Vec<_> = tree.children(root).map(|(_, n)| n.data.start_year).collect();
    assert_eq!(decades, vec![Some(1990), Some(2000)]);

    for (decade_idx, _) in tree.children(root) {
        let years: Vec<_> = tree.children(decade_idx).map(|(_, n)| n.data.year).collect();
        let mut sorted = years.clone();
        sorted.sort();
        assert_eq!(years, sorted);

        for (year_idx, _) in tree.children(decade_idx) {
            let months: Vec<_> = tree.children(year_idx).map(|(_, n)| n.data.month).collect();
            let mut sorted = months.clone();
            sorted.sort();
            assert_eq!(months, sorted);
        }
    }

    let noughties = child_by_label(&tree, root, "2000–2009");
    assert_eq!(child_labels(&tree, noughties), vec!["2001", "2005"]);
    let y2001 = child_by_label(&tree, noughties, "2001");
    assert_eq!(child_labels(&tree, y2001), vec!["February", "July"]);
}

#[test]
fn given_many_issues_when_building_then_grouping_keys_are_unique() {
    let manifests = (0..40)
        .map(|i| {
            let date = format!("19{:02}-{:02}-01", 20 + i % 15, 1 + i % 12);
            issue(&format!("m{i}"), Some(&date))
        })
        .collect();
    let collection = Collection {
        id: "c".into(),
        label: "C".into(),
        manifests,
        ..Collection::default()
    };
    let tree = build(collection);
    let root = tree.root().unwrap();

    let mut decades: Vec<_> = tree
        .children(root)
        .map(|(_, n)| (n.data.start_year, n.data.end_year))
        .collect();
    let count = decades.len();
    decades.dedup();
    assert_eq!(decades.len(), count);

    for (decade_idx, decade) in tree.children(root) {
        assert!(!decade.is_leaf(), "empty decade {}", decade.label);
        let mut years: Vec<_> = tree.children(decade_idx).map(|(_, n)| n.data.year).collect();
        let count = years.len();
        years.dedup();
        assert_eq!(years.len(), count);

        for (year_idx, _) in tree.children(decade_idx) {
            let mut months: Vec<_> = tree.children(year_idx).map(|(_, n)| n.data.month).collect();
            let count = months.len();
            months.dedup();
            assert_eq!(months.len(), count);
        }
    }

    assert_eq!(tree.leaf_labels().len(), 40);
}

// ============================================================
// Non-item dates
// ============================================================

#[test]
fn given_dated_ranges_only_when_building_then_years_have_no_months() {
    init_test_setup();
    let mut manifest = book_manifest();
    manifest.structures[0].ranges[0].nav_date = utc_date("1950-03-01");
    let native = build_native_tree(&Resource::Manifest(manifest), 0).unwrap();

    let tree = DateHierarchyBuilder::new().build(&native);
    let root = tree.root().unwrap();

    assert_eq!(child_labels(&tree, root), vec!["1950–1959"]);
    let decade = child_by_label(&tree, root, "1950–1959");
    assert_eq!(child_labels(&tree, decade), vec!["1950"]);
    let year = child_by_label(&tree, decade, "1950");
    assert!(tree.get_node(year).unwrap().is_leaf());
}

#[test]
fn given_dated_collection_when_building_then_year_exists_without_items() {
    let mut collection = periodical_collection();
    collection.nav_date = utc_date("1945-01-01");
    let tree = build(collection);
    let root = tree.root().unwrap();

    assert_eq!(
        child_labels(&tree, root),
        vec!["1920–1929", "1930–1939", "1940–1949"]
    );
    let forties = child_by_label(&tree, root, "1940–1949");
    assert_eq!(child_labels(&tree, forties), vec!["1945"]);
}

#[test]
fn given_native_tree_when_building_then_native_tree_is_untouched() {
    init_test_setup();
    let native = build_native_tree(&Resource::Collection(periodical_collection()), 0).unwrap();
    let before: Vec<_> = native.iter().map(|(_, n)| n.label.clone()).collect();

    let _ = DateHierarchyBuilder::new().build(&native);

    let after: Vec<_> = native.iter().map(|(_, n)| n.label.clone()).collect();
    assert_eq!(before, after);
}
