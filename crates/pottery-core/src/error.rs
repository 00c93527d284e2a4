use pottery_model::{Field, OperationId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{operation}: missing field: {field}")]
    MissingField {
        operation: OperationId,
        field: Field,
    },
}

impl BuildError {
    /// Field whose absence aborted the build.
    pub fn field(&self) -> Field {
        match self {
            BuildError::MissingField { field, .. } => *field,
        }
    }
}
