use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors. Fatal: the run stops before any reconciliation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {}", .0.display())]
    SettingsNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("invalid mapping file: {0}")]
    Mapping(String),
}
