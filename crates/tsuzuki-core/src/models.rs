use serde::{Deserialize, Serialize};

/// Status of an entry on the remote list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListStatus {
    Current,
    Planning,
    Completed,
    Dropped,
    Paused,
    Repeating,
}

impl ListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "Watching",
            Self::Planning => "Plan to Watch",
            Self::Completed => "Completed",
            Self::Dropped => "Dropped",
            Self::Paused => "On Hold",
            Self::Repeating => "Rewatching",
        }
    }
}

impl std::fmt::Display for ListStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry from the user's remote list, read-only for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteListEntry {
    pub media_id: u64,
    /// Cumulative episodes marked watched on the remote service.
    pub progress: u32,
    pub status: ListStatus,
    pub total_episodes: Option<u32>,
    /// Every known title variant (romaji, english, synonyms).
    pub titles: Vec<String>,
}

impl RemoteListEntry {
    /// Returns the best available display title.
    pub fn preferred_title(&self) -> &str {
        self.titles.first().map(String::as_str).unwrap_or("Unknown")
    }
}

/// Locally watched state of one season of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalWatchedSeason {
    pub season: u32,
    pub watched_episodes: u32,
    pub total_episodes: u32,
}

/// Opaque reference to a series in the local library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesHandle {
    pub id: String,
    pub title: String,
}
