#![forbid(unsafe_code)]

//! Hierarchy loading and radial layouts.
//!
//! A [`Hierarchy`] is validated once at load time; layouts ([`cluster`], [`partition`]) are
//! pure functions of the hierarchy and their options and are recomputed in full on each call.

pub mod cluster;
pub mod error;
pub mod hierarchy;
pub mod partition;
pub mod radial;
pub mod search;

pub use cluster::{ClusterOptions, cluster};
pub use error::{DataLoadErrorKind, Error, Result};
pub use hierarchy::{Hierarchy, HierarchyNode, NodeIdx, TreeNode};
pub use partition::{PartitionOptions, partition};
pub use radial::{PositionedNode, RadialLayout};
pub use search::{SearchHit, fuzzy_rank, search};
