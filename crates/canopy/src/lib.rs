#![forbid(unsafe_code)]

//! `canopy` is a headless layout engine for hierarchical visualizations.
//!
//! It computes geometry only; drawing, animation and input handling belong to the caller.
//!
//! # Features
//!
//! - `tree`: hierarchy loading, radial cluster and sunburst layouts, fuzzy search (`canopy::tree`)
//! - `flow`: expandable flow graphs and their sankey layout (`canopy::flow`)
//! - `canvas`: nested card maps with navigation and connection routing (`canopy::canvas`)

pub use canopy_geom as geom;
pub use canopy_geom::{Bounds, Config, ConnectionStyle, Point, Size, Viewport, ZoomLimits};

#[cfg(feature = "canvas")]
pub use canopy_canvas as canvas;
#[cfg(feature = "flow")]
pub use canopy_flow as flow;
#[cfg(feature = "tree")]
pub use canopy_tree as tree;
#[cfg(feature = "tree")]
pub use canopy_tree::DataLoadErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[cfg(feature = "tree")]
    #[error(transparent)]
    Tree(#[from] canopy_tree::Error),
    #[cfg(feature = "flow")]
    #[error(transparent)]
    Flow(#[from] canopy_flow::Error),
    #[cfg(feature = "canvas")]
    #[error(transparent)]
    Canvas(#[from] canopy_canvas::Error),
    #[error("config JSON error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    #[cfg(feature = "tree")]
    pub fn kind(&self) -> DataLoadErrorKind {
        match self {
            Error::Tree(e) => e.kind(),
            #[cfg(feature = "flow")]
            Error::Flow(e) => e.kind(),
            #[cfg(feature = "canvas")]
            Error::Canvas(e) => e.kind(),
            Error::Config(_) => DataLoadErrorKind::ValidationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parses a JSON config document; an empty string yields an empty config.
pub fn parse_config(text: &str) -> Result<Config> {
    parse_config_layers(&[text])
}

/// Parses config documents in order, each one laid over the ones before it. Blank documents
/// are skipped.
pub fn parse_config_layers(layers: &[&str]) -> Result<Config> {
    let mut cfg = Config::empty_object();
    for text in layers.iter().filter(|t| !t.trim().is_empty()) {
        let layer: serde_json::Value = serde_json::from_str(text)?;
        cfg.overlay(&layer);
    }
    Ok(cfg)
}

/// Loads a hierarchy (nested or flat JSON) and lays it out as a radial cluster.
#[cfg(feature = "tree")]
pub fn cluster_from_json(
    text: &str,
    config: &Config,
) -> Result<(canopy_tree::Hierarchy, canopy_tree::RadialLayout)> {
    let h = canopy_tree::Hierarchy::from_json(text)?;
    let layout = canopy_tree::cluster(&h, &canopy_tree::ClusterOptions::from_config(config));
    Ok((h, layout))
}

/// Loads a hierarchy and lays it out as a sunburst partition.
#[cfg(feature = "tree")]
pub fn partition_from_json(
    text: &str,
    config: &Config,
) -> Result<(canopy_tree::Hierarchy, canopy_tree::RadialLayout)> {
    let h = canopy_tree::Hierarchy::from_json(text)?;
    let layout = canopy_tree::partition(&h, &canopy_tree::PartitionOptions::from_config(config));
    Ok((h, layout))
}

/// Loads a flow graph honoring `flow.strictLinkSums`.
#[cfg(feature = "flow")]
pub fn flow_from_json(text: &str, config: &Config) -> Result<canopy_flow::FlowGraph> {
    let opts = canopy_flow::LoadOptions::from_config(config);
    Ok(canopy_flow::FlowGraph::from_json(text, &opts)?)
}

/// Visibility plus sankey layout for one expansion state.
#[cfg(feature = "flow")]
pub fn layout_flow(
    graph: &canopy_flow::FlowGraph,
    state: &canopy_flow::ExpansionState,
    config: &Config,
) -> Result<canopy_flow::SankeyLayout> {
    let visible = canopy_flow::compute_visibility(graph, state);
    let opts = canopy_flow::SankeyOptions::from_config(config);
    Ok(canopy_flow::layout_sankey(graph, &visible, &opts)?)
}

#[cfg(feature = "canvas")]
pub fn canvas_from_json(text: &str) -> Result<canopy_canvas::Canvas> {
    Ok(canopy_canvas::Canvas::from_json(text)?)
}
