use rust_bert::RustBertError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosTaggerError {
    #[error("Endpoint not available error: {0}")]
    FileDownloadError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Provisioning error: {0}")]
    ProvisioningError(String),

    #[error("Invalid configuration error: {0}")]
    InvalidConfigurationError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("{0}")]
    TaggingError(String),
}

impl From<cached_path::Error> for PosTaggerError {
    fn from(error: cached_path::Error) -> Self {
        PosTaggerError::FileDownloadError(error.to_string())
    }
}

impl From<std::io::Error> for PosTaggerError {
    fn from(error: std::io::Error) -> Self {
        PosTaggerError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for PosTaggerError {
    fn from(error: serde_json::Error) -> Self {
        PosTaggerError::InvalidConfigurationError(error.to_string())
    }
}

impl From<RustBertError> for PosTaggerError {
    fn from(error: RustBertError) -> Self {
        PosTaggerError::ModelError(error.to_string())
    }
}
