use canopy_geom::Config;
use canopy_tree::{
    ClusterOptions, Hierarchy, HierarchyNode, PartitionOptions, cluster, partition,
};

fn sample() -> Hierarchy {
    Hierarchy::from_root(HierarchyNode::new("root", "Root").with_children(vec![
        HierarchyNode::new("a", "A").with_children(vec![
            HierarchyNode::leaf("a1", "A1", 1.0),
            HierarchyNode::leaf("a2", "A2", 1.0),
            HierarchyNode::leaf("a3", "A3", 2.0),
        ]),
        HierarchyNode::leaf("b", "B", 4.0),
        HierarchyNode::new("c", "C").with_children(vec![
            HierarchyNode::leaf("c1", "C1", 1.0),
            HierarchyNode::new("c2", "C2")
                .with_children(vec![HierarchyNode::leaf("c2x", "C2X", 1.0)]),
        ]),
    ]))
    .unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn cluster_top_level_spans_fill_the_circle_minus_gaps() {
    let h = sample();
    let opts = ClusterOptions {
        separation: 6.0,
        ..Default::default()
    };
    let layout = cluster(&h, &opts);

    let top: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|id| layout.get(id).unwrap())
        .collect();
    let total: f64 = top.iter().map(|n| n.angular_span().unwrap()).sum();
    assert!(approx(total, 360.0 - 3.0 * 6.0));

    for pair in top.windows(2) {
        assert!(pair[0].angle_end.unwrap() <= pair[1].angle_start.unwrap() + 1e-9);
    }
}

#[test]
fn cluster_without_separation_gives_equal_leaf_slots() {
    let h = sample();
    let layout = cluster(&h, &ClusterOptions::default());
    let leaves: Vec<_> = h
        .leaves()
        .into_iter()
        .map(|i| layout.get(&h.node(i).id).unwrap())
        .collect();
    assert_eq!(leaves.len(), 6);
    for leaf in &leaves {
        assert!(approx(leaf.angular_span().unwrap(), 60.0));
        assert_eq!(leaf.radius, Some(300.0));
    }
    // Leaf centers follow traversal order.
    let angles: Vec<f64> = leaves.iter().map(|l| l.angle.unwrap()).collect();
    assert!(angles.windows(2).all(|w| w[0] < w[1]));
    assert!(approx(angles[0], 30.0));
}

#[test]
fn cluster_internal_nodes_sit_at_mean_leaf_angle() {
    let h = sample();
    let layout = cluster(&h, &ClusterOptions::default());
    let a = layout.get("a").unwrap();
    let mean = ["a1", "a2", "a3"]
        .iter()
        .map(|id| layout.get(id).unwrap().angle.unwrap())
        .sum::<f64>()
        / 3.0;
    assert!(approx(a.angle.unwrap(), mean));
    // depth 1 of max depth 3.
    assert!(approx(a.radius.unwrap(), 100.0));
}

#[test]
fn cluster_sibling_spans_never_overlap() {
    let h = sample();
    let layout = cluster(
        &h,
        &ClusterOptions {
            separation: 12.0,
            inner_radius: 20.0,
            ..Default::default()
        },
    );
    for node in h.nodes() {
        let spans: Vec<(f64, f64)> = node
            .children
            .iter()
            .map(|&c| {
                let p = layout.get(&h.node(c).id).unwrap();
                (p.angle_start.unwrap(), p.angle_end.unwrap())
            })
            .collect();
        for w in spans.windows(2) {
            assert!(w[0].1 <= w[1].0 + 1e-9, "overlap under {}", node.id);
        }
        if let Some(parent) = layout.get(&node.id) {
            for (s, e) in &spans {
                assert!(*s >= parent.angle_start.unwrap() - 1e-9);
                assert!(*e <= parent.angle_end.unwrap() + 1e-9);
            }
        }
    }
    assert_eq!(layout.get("root").unwrap().radius, Some(20.0));
}

#[test]
fn cluster_is_deterministic() {
    let opts = ClusterOptions {
        separation: 4.0,
        ..Default::default()
    };
    let first = cluster(&sample(), &opts);
    let second = cluster(&sample(), &opts);
    assert_eq!(first, second);
}

#[test]
fn cluster_of_a_single_node_sits_at_the_center() {
    let h = Hierarchy::from_root(HierarchyNode::new("only", "Only")).unwrap();
    let layout = cluster(&h, &ClusterOptions::default());
    let n = layout.get("only").unwrap();
    assert!(n.x.abs() < 1e-9 && n.y.abs() < 1e-9);
    assert_eq!(layout.link_paths().len(), 0);
}

#[test]
fn cluster_links_connect_every_child_to_its_parent() {
    let h = sample();
    let layout = cluster(&h, &ClusterOptions::default());
    let links = layout.link_paths();
    assert_eq!(links.len(), h.len() - 1);
    for (parent, child, path) in &links {
        assert_eq!(path.start_point(), Some(layout.get(parent).unwrap().position()));
        assert_eq!(path.end_point(), Some(layout.get(child).unwrap().position()));
    }
}

#[test]
fn cluster_options_read_from_config() {
    let cfg = Config::from_json(
        r#"{ "cluster": { "innerRadius": 10, "outerRadius": 90, "separation": -5 } }"#,
    )
    .unwrap();
    let opts = ClusterOptions::from_config(&cfg);
    assert_eq!(opts.inner_radius, 10.0);
    assert_eq!(opts.outer_radius, 90.0);
    assert_eq!(opts.separation, 0.0);
    assert_eq!(opts.end_angle, 360.0);
}

#[test]
fn partition_spans_follow_values() {
    let h = sample();
    let layout = partition(&h, &PartitionOptions::default());
    // total value: a = 4, b = 4, c = 2.
    assert!(approx(layout.get("a").unwrap().angular_span().unwrap(), 144.0));
    assert!(approx(layout.get("b").unwrap().angular_span().unwrap(), 144.0));
    assert!(approx(layout.get("c").unwrap().angular_span().unwrap(), 72.0));
    assert_eq!(layout.get("root").unwrap().value, Some(10.0));

    // Four rings of 75px.
    let a3 = layout.get("a3").unwrap();
    assert_eq!(a3.inner_radius, Some(150.0));
    assert_eq!(a3.radius, Some(225.0));
    let root = layout.get("root").unwrap();
    assert_eq!((root.x, root.y), (0.0, 0.0));
}

#[test]
fn partition_without_values_falls_back_to_leaf_counts() {
    let h = Hierarchy::from_root(HierarchyNode::new("r", "R").with_children(vec![
        HierarchyNode::new("x", "X"),
        HierarchyNode::new("y", "Y")
            .with_children(vec![HierarchyNode::new("y1", "Y1"), HierarchyNode::new("y2", "Y2")]),
    ]))
    .unwrap();
    let layout = partition(&h, &PartitionOptions::default());
    assert!(approx(layout.get("x").unwrap().angular_span().unwrap(), 120.0));
    assert!(approx(layout.get("y").unwrap().angular_span().unwrap(), 240.0));
}

#[test]
fn partition_arcs_render_for_every_node() {
    let h = sample();
    let layout = partition(
        &h,
        &PartitionOptions {
            pad_angle: 1.0,
            ..Default::default()
        },
    );
    for node in &layout.nodes {
        let path = layout.arc_path(&node.node_id).unwrap().to_string();
        assert!(path.starts_with('M'));
        assert!(path.ends_with('Z'));
    }
    let b = layout.get("b").unwrap();
    assert!(approx(b.angular_span().unwrap(), 143.0));
}
