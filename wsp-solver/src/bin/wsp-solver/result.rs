use thiserror::Error;
use wsp_solver::core::encoding::EncodingError;
use wsp_solver::core::encoding::OpbError;
use wsp_solver::core::instance::MalformedInstance;
use wsp_solver::file_format;

pub(crate) type WspSolverResult<T> = Result<T, WspSolverError>;

#[derive(Error, Debug)]
pub(crate) enum WspSolverError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Failed to read {path}, more details: {source}")]
    InvalidFile {
        path: String,
        source: file_format::Error,
    },
    #[error("The instance is malformed: {0}")]
    MalformedInstance(#[from] MalformedInstance),
    #[error("Failed to encode the instance: {0}")]
    Encoding(#[from] EncodingError),
    #[error("Failed to export the model: {0}")]
    Opb(#[from] OpbError),
    #[error("The backend {backend} does not support {mode} models.")]
    UnsupportedBackend { backend: &'static str, mode: String },
    #[error("{violated} of {total} checks are violated.")]
    VerificationFailed { violated: usize, total: usize },
}

impl WspSolverError {
    pub(crate) fn invalid_file(path: impl std::fmt::Display, source: file_format::Error) -> Self {
        Self::InvalidFile {
            path: format!("{path}"),
            source,
        }
    }
}
