use thiserror::Error;

use crate::{fees::error::FeeModelError, oracle::error::OracleError};

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("ApplicationError - FeeModel: {0}")]
    FeeModel(#[from] FeeModelError),
    #[error("ApplicationError - Oracle: {0}")]
    Oracle(#[from] OracleError),
    #[error("ApplicationError - Io: {0}")]
    Io(#[from] std::io::Error),
    #[error("ApplicationError - Serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
