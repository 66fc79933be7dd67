use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mapping::DEFAULT_MAPPING_FILE;

/// File name looked up in the working directory before the config dir.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub anilist: AniListConfig,
    pub plex: PlexConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniListConfig {
    pub username: String,
    pub access_token: String,
    /// Match but never update the list.
    #[serde(default)]
    pub skip_list_update: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    pub url: String,
    pub token: String,
    /// Library section titles to search. Empty means every show section.
    #[serde(default)]
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_mapping_file")]
    pub mapping_file: PathBuf,
    /// Seconds to wait before querying Plex so just-finished playback
    /// is registered as watched.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mapping_file: default_mapping_file(),
            settle_delay_secs: default_settle_delay(),
        }
    }
}

fn default_mapping_file() -> PathBuf {
    PathBuf::from(DEFAULT_MAPPING_FILE)
}

const fn default_settle_delay() -> u64 {
    5
}

impl Settings {
    /// Load settings from `path`, or from the default locations when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };

        if !path.exists() {
            return Err(ConfigError::SettingsNotFound(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings =
            toml::from_str(content).map_err(|e| ConfigError::Settings(e.to_string()))?;

        settings.anilist.access_token = settings.anilist.access_token.trim().to_string();
        settings.anilist.username = settings.anilist.username.trim().to_string();

        if settings.anilist.username.is_empty() {
            return Err(ConfigError::Settings("anilist.username is empty".into()));
        }
        url::Url::parse(&settings.plex.url)
            .map_err(|e| ConfigError::Settings(format!("plex.url: {e}")))?;

        Ok(settings)
    }

    /// `settings.toml` in the working directory if present, otherwise the
    /// user config dir (XDG on Linux, AppData on Windows).
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(SETTINGS_FILE);
        if local.exists() {
            return local;
        }
        Self::project_dirs()
            .map(|d| d.config_dir().join(SETTINGS_FILE))
            .unwrap_or(local)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "tsuzuki")
    }
}
