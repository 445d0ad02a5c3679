use sea_orm::DbErr;

/// Errors surfaced by catalog operations. Each variant maps to one HTTP
/// status in `http_server::error`.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Text generation failed: {0}")]
    Upstream(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors reported by text generation adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("{0} is not set in the environment variables")]
    MissingCredential(&'static str),
    #[error("{provider}: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },
}

impl GenerationError {
    pub fn upstream(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
        }
    }
}

impl From<GenerationError> for CatalogError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredential(_) => Self::Configuration(err.to_string()),
            GenerationError::Upstream { .. } => Self::Upstream(err.to_string()),
        }
    }
}
