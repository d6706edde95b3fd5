#![forbid(unsafe_code)]

//! Expandable flow diagrams.
//!
//! A [`FlowGraph`] is a forest of nodes plus value-carrying links. The caller owns an
//! [`ExpansionState`]; [`compute_visibility`] turns graph + state into the node and link sets to
//! draw, and [`layout_sankey`] places them in columns.

pub mod error;
pub mod expansion;
pub mod integrity;
pub mod model;
pub mod sankey;
pub mod visibility;

pub use error::{DataLoadErrorKind, Error, Result};
pub use expansion::ExpansionState;
pub use integrity::{LinkSumMismatch, check_link_sums};
pub use model::{FlowData, FlowGraph, FlowIdx, FlowLink, FlowNode, LinkKind, LoadOptions};
pub use sankey::{NodeAlign, SankeyLayout, SankeyLink, SankeyNode, SankeyOptions, layout_sankey};
pub use visibility::{Visibility, compute_visibility, is_node_visible};
