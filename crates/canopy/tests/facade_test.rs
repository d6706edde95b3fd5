use canopy::flow::ExpansionState;
use canopy::{DataLoadErrorKind, Error, parse_config, parse_config_layers};

const TREE: &str = r#"{
    "id": "root", "label": "Root", "children": [
        { "id": "a", "label": "A", "value": 2 },
        { "id": "b", "label": "B", "value": 1 }
    ]
}"#;

const FLOW: &str = r#"{
    "nodes": [
        { "id": "coal", "label": "Coal", "expandable": true },
        { "id": "coal-plant-a", "label": "Plant A", "parent": "coal" },
        { "id": "residential", "label": "Residential" }
    ],
    "links": [
        { "kind": "aggregate", "source": "coal", "target": "residential", "value": 18 },
        { "source": "coal-plant-a", "target": "residential", "value": 10 }
    ]
}"#;

#[test]
fn cluster_and_partition_from_json() {
    let cfg = parse_config(r#"{"cluster":{"outerRadius":100}}"#).unwrap();
    let (h, layout) = canopy::cluster_from_json(TREE, &cfg).unwrap();
    assert_eq!(h.len(), 3);
    assert_eq!(layout.nodes.len(), 3);

    let (_, sunburst) = canopy::partition_from_json(TREE, &parse_config("").unwrap()).unwrap();
    assert_eq!(sunburst.nodes.len(), 3);
}

#[test]
fn flow_strictness_follows_config() {
    let lenient = parse_config("{}").unwrap();
    let g = canopy::flow_from_json(FLOW, &lenient).unwrap();
    let layout = canopy::layout_flow(&g, &ExpansionState::new(), &lenient).unwrap();
    assert_eq!(layout.nodes.len(), 2);

    let strict = parse_config(r#"{"flow":{"strictLinkSums":true}}"#).unwrap();
    let err = canopy::flow_from_json(FLOW, &strict).unwrap_err();
    assert!(matches!(err, Error::Flow(_)));
    assert_eq!(err.kind(), DataLoadErrorKind::ValidationFailure);
}

#[test]
fn canvas_errors_keep_their_kind() {
    let err = canopy::canvas_from_json(r#"{"cards":[{"id":"a"}]}"#).unwrap_err();
    assert_eq!(err.kind(), DataLoadErrorKind::MissingRequiredField);
    assert!(matches!(parse_config("{"), Err(Error::Config(_))));
}

#[test]
fn later_config_layers_win() {
    let cfg = parse_config_layers(&[
        r#"{"sankey":{"width":600,"height":300},"flow":{"strictLinkSums":true}}"#,
        "",
        r#"{"sankey":{"width":900}}"#,
    ])
    .unwrap();
    assert_eq!(cfg.get_f64("sankey.width"), Some(900.0));
    assert_eq!(cfg.get_f64("sankey.height"), Some(300.0));
    assert_eq!(cfg.get_bool("flow.strictLinkSums"), Some(true));

    assert!(matches!(
        parse_config_layers(&["{}", "[1,"]),
        Err(Error::Config(_))
    ));
}
