use serde::Deserialize;

use tsuzuki_core::models::{LocalWatchedSeason, SeriesHandle};

#[derive(Debug, Deserialize)]
pub struct PlexResponse {
    #[serde(rename = "MediaContainer")]
    pub media_container: MediaContainer,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaContainer {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<Directory>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<Metadata>,
}

/// A library section.
#[derive(Debug, Deserialize)]
pub struct Directory {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A show or a season, depending on the endpoint.
#[derive(Debug, Deserialize)]
pub struct Metadata {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,
    pub title: String,
    #[serde(rename = "originalTitle")]
    pub original_title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub index: Option<u32>,
    #[serde(rename = "leafCount")]
    pub leaf_count: Option<u32>,
    #[serde(rename = "viewedLeafCount")]
    pub viewed_leaf_count: Option<u32>,
}

impl Directory {
    pub fn is_show_section(&self) -> bool {
        self.kind == "show"
    }
}

impl Metadata {
    pub fn into_series_handle(self) -> SeriesHandle {
        SeriesHandle {
            id: self.rating_key,
            title: self.title,
        }
    }

    /// Titles this show can be matched by.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str()).chain(self.original_title.as_deref())
    }

    /// Season watched state. Specials (season 0) and non-season rows
    /// yield `None`.
    pub fn to_watched_season(&self) -> Option<LocalWatchedSeason> {
        if self.kind.as_deref().is_some_and(|k| k != "season") {
            return None;
        }
        let season = self.index.filter(|&i| i > 0)?;
        Some(LocalWatchedSeason {
            season,
            watched_episodes: self.viewed_leaf_count.unwrap_or(0),
            total_episodes: self.leaf_count.unwrap_or(0),
        })
    }
}
