/// Coarse classification of a load-time validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataLoadErrorKind {
    MissingRequiredField,
    DanglingReference,
    ValidationFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node #{position} is missing required field `{field}`")]
    MissingField {
        field: &'static str,
        position: usize,
    },

    #[error("node {id} references unknown parent {parent}")]
    DanglingParent { id: String, parent: String },

    #[error("duplicate node id: {id}")]
    DuplicateId { id: String },

    #[error("hierarchy has no root node")]
    NoRoot,

    #[error("hierarchy has more than one root: {roots:?}")]
    MultipleRoots { roots: Vec<String> },

    #[error("parent chain of {id} never reaches the root")]
    Cycle { id: String },

    #[error("node {id} has invalid value {value}")]
    InvalidValue { id: String, value: f64 },

    #[error("node {id} is nested under {nested_in} but declares parent {declared}")]
    ParentMismatch {
        id: String,
        nested_in: String,
        declared: String,
    },

    #[error("hierarchy JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> DataLoadErrorKind {
        match self {
            Error::MissingField { .. } => DataLoadErrorKind::MissingRequiredField,
            Error::DanglingParent { .. } => DataLoadErrorKind::DanglingReference,
            Error::DuplicateId { .. }
            | Error::NoRoot
            | Error::MultipleRoots { .. }
            | Error::Cycle { .. }
            | Error::InvalidValue { .. }
            | Error::ParentMismatch { .. }
            | Error::Json(_) => DataLoadErrorKind::ValidationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
