use canopy_tree::{DataLoadErrorKind, Error, Hierarchy, HierarchyNode};
use proptest::prelude::*;

#[test]
fn missing_id_is_a_missing_required_field() {
    let err = Hierarchy::from_root(
        HierarchyNode::new("root", "Root").with_children(vec![HierarchyNode::new("", "Nameless")]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingField {
            field: "id",
            position: 1
        }
    ));
    assert_eq!(err.kind(), DataLoadErrorKind::MissingRequiredField);
}

#[test]
fn missing_label_is_a_missing_required_field() {
    let err = Hierarchy::from_root(HierarchyNode::new("root", "  ")).unwrap_err();
    assert_eq!(err.kind(), DataLoadErrorKind::MissingRequiredField);
}

#[test]
fn unknown_parent_is_a_dangling_reference() {
    let err = Hierarchy::from_nodes(vec![
        HierarchyNode::new("root", "Root"),
        HierarchyNode::new("x", "X").with_parent("nope"),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), DataLoadErrorKind::DanglingReference);
}

#[test]
fn structural_problems_are_validation_failures() {
    let dup = Hierarchy::from_nodes(vec![
        HierarchyNode::new("root", "Root"),
        HierarchyNode::new("root", "Again").with_parent("root"),
    ])
    .unwrap_err();
    assert!(matches!(dup, Error::DuplicateId { .. }));

    let two_roots = Hierarchy::from_nodes(vec![
        HierarchyNode::new("a", "A"),
        HierarchyNode::new("b", "B"),
    ])
    .unwrap_err();
    assert!(matches!(two_roots, Error::MultipleRoots { ref roots } if roots == &["a", "b"]));

    let cycle = Hierarchy::from_nodes(vec![
        HierarchyNode::new("root", "Root"),
        HierarchyNode::new("x", "X").with_parent("y"),
        HierarchyNode::new("y", "Y").with_parent("x"),
    ])
    .unwrap_err();
    assert!(matches!(cycle, Error::Cycle { .. }));

    let negative = Hierarchy::from_root(HierarchyNode::leaf("root", "Root", -1.0)).unwrap_err();
    assert!(matches!(negative, Error::InvalidValue { .. }));

    for err in [dup, two_roots, cycle, negative] {
        assert_eq!(err.kind(), DataLoadErrorKind::ValidationFailure);
    }
}

#[test]
fn nested_child_with_conflicting_parent_is_rejected() {
    let err = Hierarchy::from_root(HierarchyNode::new("root", "Root").with_children(vec![
        HierarchyNode::new("a", "A"),
        HierarchyNode::new("b", "B").with_parent("a"),
    ]))
    .unwrap_err();
    assert!(matches!(err, Error::ParentMismatch { .. }));
}

#[test]
fn json_loading_accepts_objects_and_arrays() {
    let nested = Hierarchy::from_json(
        r##"{ "id": "energy", "title": "Energy", "children": [
            { "id": "coal", "label": "Coal", "value": 18, "color": "#333" },
            { "id": "solar", "name": "Solar", "value": 7 }
        ] }"##,
    )
    .unwrap();
    assert_eq!(nested.len(), 3);
    assert_eq!(nested.get("coal").unwrap().color.as_deref(), Some("#333"));
    assert_eq!(nested.get("solar").unwrap().label, "Solar");

    let flat = Hierarchy::from_json(
        r#"[
            { "id": "r", "label": "R" },
            { "id": "c", "label": "C", "parent": "r" }
        ]"#,
    )
    .unwrap();
    assert_eq!(flat.path_to("c").unwrap(), ["r", "c"]);

    let broken = Hierarchy::from_json("{ not json").unwrap_err();
    assert_eq!(broken.kind(), DataLoadErrorKind::ValidationFailure);
}

#[test]
fn path_to_unknown_id_is_none() {
    let h = Hierarchy::from_root(HierarchyNode::new("root", "Root")).unwrap();
    assert_eq!(h.path_to("root").unwrap(), ["root"]);
    assert!(h.path_to("ghost").is_none());
}

/// Builds a random tree where node `i > 0` hangs under `parents[i - 1] % i`.
fn random_tree(parents: &[usize]) -> Vec<HierarchyNode> {
    let mut nodes = vec![HierarchyNode::new("n0", "N0")];
    for (k, p) in parents.iter().enumerate() {
        let i = k + 1;
        nodes.push(
            HierarchyNode::leaf(format!("n{i}"), format!("N{i}"), 1.0)
                .with_parent(format!("n{}", p % i)),
        );
    }
    nodes
}

proptest! {
    #[test]
    fn breadcrumb_ends_at_node_and_walks_parent_links(
        parents in prop::collection::vec(0usize..1000, 0..60),
    ) {
        let h = Hierarchy::from_nodes(random_tree(&parents)).unwrap();
        for node in h.nodes() {
            let path = h.path_to(&node.id).unwrap();
            prop_assert_eq!(path.last(), Some(&node.id));
            prop_assert_eq!(path.first().map(String::as_str), Some("n0"));
            prop_assert_eq!(path.len(), node.depth + 1);
            for pair in path.windows(2) {
                let child = h.get(&pair[1]).unwrap();
                let parent = child.parent.map(|p| h.node(p).id.clone());
                prop_assert_eq!(parent.as_deref(), Some(pair[0].as_str()));
            }
        }
    }
}
