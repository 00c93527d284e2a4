use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("invalid json path '{path}': {reason}")]
    InvalidJsonPath { path: String, reason: String },
}
