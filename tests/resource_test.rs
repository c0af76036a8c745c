//! Tests for the structural resource model and native tree construction.

use navtree::domain::{
    build_native_tree, Manifest, NodeType, Resource, MANIFEST_ROOT_LABEL,
};
use navtree::util::testing::{book_manifest, issue, periodical_collection, utc_date};

#[test]
fn given_manifest_resource_when_querying_then_exposes_ranges_and_canvases() {
    let resource = Resource::Manifest(book_manifest());

    assert!(!resource.is_collection());
    assert_eq!(resource.id(), "book");
    assert_eq!(resource.top_ranges().len(), 2);
    assert_eq!(resource.all_ranges().len(), 8);
    assert_eq!(resource.canvas_ids(), vec!["c1", "c2", "c3", "c4", "c5"]);
}

#[test]
fn given_collection_resource_when_querying_then_has_no_ranges() {
    let resource = Resource::Collection(periodical_collection());

    assert!(resource.is_collection());
    assert!(resource.top_ranges().is_empty());
    assert!(resource.all_ranges().is_empty());
    assert!(resource.canvas_ids().is_empty());
}

#[test]
fn given_manifest_without_ranges_when_building_then_single_root_with_all_canvases() {
    let manifest = Manifest {
        nav_date: utc_date("1923-05-01"),
        ..issue("lonely", None)
    };
    let tree = build_native_tree(&Resource::Manifest(manifest), 3).unwrap();

    assert_eq!(tree.len(), 1);
    let root = tree.root_node().unwrap();
    assert_eq!(root.label, MANIFEST_ROOT_LABEL);
    assert_eq!(root.id.as_deref(), Some("lonely"));
    assert_eq!(root.data.node_type, Some(NodeType::Manifest));
    assert_eq!(root.data.canvases, vec!["lonely-c1".to_string()]);
    assert_eq!(root.nav_date, utc_date("1923-05-01"));
}

#[test]
fn given_range_tree_when_building_then_nodes_carry_range_payload() {
    let tree = build_native_tree(&Resource::Manifest(book_manifest()), 0).unwrap();
    let (_, chapter) = tree
        .iter()
        .find(|(_, n)| n.id.as_deref() == Some("r3"))
        .unwrap();

    assert_eq!(chapter.label, "Range r3");
    assert_eq!(chapter.data.node_type, Some(NodeType::Range));
    assert_eq!(chapter.data.canvases, vec!["c2".to_string(), "c3".to_string()]);
}

#[test]
fn given_collection_when_building_then_manifest_nodes_hold_canvases() {
    let tree = build_native_tree(&Resource::Collection(periodical_collection()), 0).unwrap();
    let root = tree.root().unwrap();

    assert_eq!(
        tree.root_node().unwrap().data.node_type,
        Some(NodeType::Collection)
    );
    let kinds: Vec<_> = tree.children(root).map(|(_, n)| n.data.node_type).collect();
    assert_eq!(kinds, vec![Some(NodeType::Manifest); 4]);
    assert!(tree.children(root).all(|(_, n)| n.data.has_canvases()));
}
