pub use canopy_tree::DataLoadErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("card at {location} is missing required field `{field}`")]
    MissingField {
        field: &'static str,
        location: String,
    },

    #[error("duplicate card id: {id}")]
    DuplicateId { id: String },

    #[error("connection {from} -> {to} inside {scope} references unknown sibling {missing}")]
    DanglingConnection {
        scope: String,
        from: String,
        to: String,
        missing: String,
    },

    #[error("default card {id} does not exist")]
    DanglingDefaultCard { id: String },

    #[error("card {id} has invalid size {width}x{height}")]
    InvalidSize { id: String, width: f64, height: f64 },

    #[error("canvas JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> DataLoadErrorKind {
        match self {
            Error::MissingField { .. } => DataLoadErrorKind::MissingRequiredField,
            Error::DanglingConnection { .. } | Error::DanglingDefaultCard { .. } => {
                DataLoadErrorKind::DanglingReference
            }
            Error::DuplicateId { .. } | Error::InvalidSize { .. } | Error::Json(_) => {
                DataLoadErrorKind::ValidationFailure
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
