use thiserror::Error;
use tsuzuki_core::source::LibraryError;

/// Errors from the Plex API client.
#[derive(Debug, Error)]
pub enum PlexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<PlexError> for LibraryError {
    fn from(e: PlexError) -> Self {
        match e {
            PlexError::Parse(msg) => LibraryError::Parse(msg),
            other => LibraryError::Transport(other.to_string()),
        }
    }
}
