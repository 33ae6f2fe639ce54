use tee_model::ModelError;
use thiserror::Error;

use crate::{runner::RunnerError, store::StoreError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("profile store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
