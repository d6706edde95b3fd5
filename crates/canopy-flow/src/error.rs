pub use canopy_tree::DataLoadErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("flow node #{position} is missing required field `{field}`")]
    MissingField {
        field: &'static str,
        position: usize,
    },

    #[error("duplicate flow node id: {id}")]
    DuplicateId { id: String },

    #[error("flow node {id} references unknown parent {parent}")]
    DanglingParent { id: String, parent: String },

    #[error("link #{index} references unknown node {node_id}")]
    DanglingLink { index: usize, node_id: String },

    #[error("parent chain of {id} loops back on itself")]
    ParentCycle { id: String },

    #[error("link #{index} has invalid value {value}")]
    InvalidValue { index: usize, value: f64 },

    #[error(
        "aggregate link {source_id} -> {target_id} carries {aggregate} but its detail links sum to {detail}"
    )]
    LinkSumMismatch {
        source_id: String,
        target_id: String,
        aggregate: f64,
        detail: f64,
    },

    #[error("visible links form a cycle")]
    CircularLink,

    #[error("flow JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> DataLoadErrorKind {
        match self {
            Error::MissingField { .. } => DataLoadErrorKind::MissingRequiredField,
            Error::DanglingParent { .. } | Error::DanglingLink { .. } => {
                DataLoadErrorKind::DanglingReference
            }
            Error::DuplicateId { .. }
            | Error::ParentCycle { .. }
            | Error::InvalidValue { .. }
            | Error::LinkSumMismatch { .. }
            | Error::CircularLink
            | Error::Json(_) => DataLoadErrorKind::ValidationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
