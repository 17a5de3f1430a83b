use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("OracleError - Transport: {0}")]
    Transport(#[from] reqwest_middleware::Error),
    #[error("OracleError - BadStatus: wallet backend returned {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("OracleError - CouldNotDecodeResponseBody: {0}")]
    CouldNotDecodeResponseBody(#[from] reqwest::Error),
}
