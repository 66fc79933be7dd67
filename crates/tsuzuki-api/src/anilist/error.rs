use thiserror::Error;
use tsuzuki_core::source::CatalogError;

/// Errors from the AniList API client.
#[derive(Debug, Error)]
pub enum AniListError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<AniListError> for CatalogError {
    fn from(e: AniListError) -> Self {
        match e {
            AniListError::Auth(msg) => CatalogError::Auth(msg),
            AniListError::NotFound(msg) => CatalogError::NotFound(msg),
            other => CatalogError::Transport(other.to_string()),
        }
    }
}
