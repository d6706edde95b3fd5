use canopy_flow::{
    DataLoadErrorKind, Error, ExpansionState, FlowData, FlowGraph, FlowLink, FlowNode,
    LoadOptions, compute_visibility,
};
use canopy_geom::Config;

fn energy(aggregate: f64) -> FlowData {
    FlowData {
        nodes: vec![
            FlowNode::new("coal", "Coal").expandable(),
            FlowNode::new("coal-plant-a", "Plant A").with_parent("coal"),
            FlowNode::new("coal-plant-b", "Plant B").with_parent("coal"),
            FlowNode::new("residential", "Residential"),
        ],
        links: vec![
            FlowLink::aggregate("coal", "residential", aggregate),
            FlowLink::detail("coal-plant-a", "residential", 10.0),
            FlowLink::detail("coal-plant-b", "residential", 8.0),
        ],
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn collapsed_source_shows_only_aggregate_links() {
    init_logging();
    let g = FlowGraph::new(energy(18.0)).unwrap();
    let s = ExpansionState::from_graph(&g);
    let v = compute_visibility(&g, &s);

    assert_eq!(v.nodes, vec!["coal", "residential"]);
    assert!(v.has_link("coal", "residential"));
    assert!(!v.has_link("coal-plant-a", "residential"));
    assert!(!v.has_link("coal-plant-b", "residential"));
    assert_eq!(v.link_indices, vec![0]);
    assert_eq!(v.links[0].value, 18.0);
}

#[test]
fn expanding_swaps_aggregate_for_detail_links() {
    let g = FlowGraph::new(energy(18.0)).unwrap();
    let mut s = ExpansionState::new();
    s.expand(&g, "coal");
    let v = compute_visibility(&g, &s);

    assert!(v.is_node_visible("coal-plant-a"));
    assert!(v.is_node_visible("coal-plant-b"));
    assert!(!v.has_link("coal", "residential"));
    assert!(v.has_link("coal-plant-a", "residential"));
    assert!(v.has_link("coal-plant-b", "residential"));
    assert_eq!(v.link_indices, vec![1, 2]);

    s.collapse(&g, "coal");
    assert_eq!(compute_visibility(&g, &s).link_indices, vec![0]);
}

#[test]
fn visible_links_never_touch_hidden_nodes() {
    let g = FlowGraph::new(energy(18.0)).unwrap();
    for expanded in [false, true] {
        let mut s = ExpansionState::new();
        if expanded {
            s.expand(&g, "coal");
        }
        let v = compute_visibility(&g, &s);
        for l in &v.links {
            assert!(v.is_node_visible(&l.source));
            assert!(v.is_node_visible(&l.target));
        }
    }
}

#[test]
fn plain_ancestors_never_hide_their_children() {
    let g = FlowGraph::new(FlowData {
        nodes: vec![
            FlowNode::new("root", "Energy"),
            FlowNode::new("coal", "Coal").expandable().with_parent("root"),
            FlowNode::new("coal-plant-a", "Plant A")
                .expandable()
                .with_parent("coal"),
            FlowNode::new("coal-plant-a-unit1", "Unit 1").with_parent("coal-plant-a"),
            FlowNode::new("coal-plant-b", "Plant B").with_parent("coal"),
            FlowNode::new("residential", "Residential"),
        ],
        links: vec![
            FlowLink::aggregate("coal", "residential", 5.0),
            FlowLink::detail("coal-plant-b", "residential", 5.0),
        ],
    })
    .unwrap();
    let mut s = ExpansionState::new();

    let v = compute_visibility(&g, &s);
    assert_eq!(v.nodes, vec!["root", "coal", "residential"]);
    assert_eq!(v.link_indices, vec![0]);

    assert!(s.expand(&g, "coal"));
    let v = compute_visibility(&g, &s);
    assert_eq!(
        v.nodes,
        vec!["root", "coal", "coal-plant-a", "coal-plant-b", "residential"]
    );
    assert_eq!(v.link_indices, vec![1]);

    assert!(s.expand(&g, "coal-plant-a"));
    assert!(compute_visibility(&g, &s).is_node_visible("coal-plant-a-unit1"));

    s.collapse(&g, "coal");
    let v = compute_visibility(&g, &s);
    assert!(!v.is_node_visible("coal-plant-a"));
    assert!(!v.is_node_visible("coal-plant-a-unit1"));
}

#[test]
fn strict_loading_rejects_mismatched_link_sums() {
    let err = FlowGraph::load(
        energy(20.0),
        &LoadOptions {
            strict_link_sums: true,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::LinkSumMismatch { aggregate, detail, .. } if aggregate == 20.0 && detail == 18.0
    ));
    assert_eq!(err.kind(), DataLoadErrorKind::ValidationFailure);
}

#[test]
fn lenient_loading_keeps_mismatched_data() {
    init_logging();
    let g = FlowGraph::new(energy(20.0)).unwrap();
    let mismatches = g.check_link_sums();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].source, "coal");
    assert_eq!(mismatches[0].detail_sum, 18.0);
}

#[test]
fn strictness_comes_from_config() {
    let cfg = Config::from_json(r#"{"flow":{"strictLinkSums":true}}"#).unwrap();
    let opts = LoadOptions::from_config(&cfg);
    assert!(opts.strict_link_sums);
    assert!(FlowGraph::load(energy(18.0), &opts).is_ok());
    assert!(FlowGraph::load(energy(17.0), &opts).is_err());
}
