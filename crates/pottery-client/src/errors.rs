use std::path::PathBuf;

use pottery_core::BuildError;
use pottery_model::{ModelError, OperationId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("operation not in catalog: {0}")]
    UnknownOperation(OperationId),

    #[error("dispatch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
