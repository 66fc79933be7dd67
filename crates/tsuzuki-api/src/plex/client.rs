use reqwest::Client;
use url::Url;

use tsuzuki_core::models::{LocalWatchedSeason, SeriesHandle};
use tsuzuki_core::normalize::normalize;
use tsuzuki_core::source::{LibraryError, MediaServer};

use super::error::PlexError;
use super::types::{Directory, Metadata, PlexResponse};

/// Plex search type for shows.
const SHOW_TYPE: &str = "2";

/// Plex Media Server HTTP client.
pub struct PlexClient {
    base: Url,
    token: String,
    sections: Vec<String>,
    http: Client,
}

impl PlexClient {
    /// `sections` restricts searches to library sections with these titles.
    /// Empty means every show section.
    pub fn new(url: &str, token: String, sections: Vec<String>) -> Result<Self, PlexError> {
        let mut base = Url::parse(url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            token,
            sections,
            http: Client::new(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<PlexResponse, PlexError> {
        let url = self.base.join(path)?;
        tracing::debug!(path, "Plex request");

        let resp = self
            .http
            .get(url)
            .query(query)
            .header("X-Plex-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(path, status = status_code, "Plex API error");
            return Err(PlexError::Api {
                status: status_code,
                message: body,
            });
        }

        resp.json::<PlexResponse>()
            .await
            .map_err(|e| PlexError::Parse(e.to_string()))
    }

    /// Show sections to search, filtered by the configured section titles.
    pub async fn show_sections(&self) -> Result<Vec<Directory>, PlexError> {
        let resp = self.get("library/sections", &[]).await?;
        Ok(select_sections(resp.media_container.directories, &self.sections))
    }

    /// Find a show whose title matches `title` after normalization.
    pub async fn find_show(&self, title: &str) -> Result<Option<Metadata>, PlexError> {
        let sections = self.show_sections().await?;
        if sections.is_empty() {
            tracing::warn!(sections = ?self.sections, "No matching Plex show sections");
        }

        for section in sections {
            let path = format!("library/sections/{}/all", section.key);
            let resp = self
                .get(&path, &[("type", SHOW_TYPE), ("title", title)])
                .await?;
            if let Some(show) = select_show(resp.media_container.metadata, title) {
                tracing::debug!(section = %section.title, rating_key = %show.rating_key, "Found Plex show");
                return Ok(Some(show));
            }
        }

        Ok(None)
    }

    /// Watched state of every regular season of the show `rating_key`.
    pub async fn seasons(&self, rating_key: &str) -> Result<Vec<LocalWatchedSeason>, PlexError> {
        let path = format!("library/metadata/{rating_key}/children");
        let resp = self.get(&path, &[]).await?;
        Ok(resp
            .media_container
            .metadata
            .iter()
            .filter_map(Metadata::to_watched_season)
            .collect())
    }
}

/// Keep show sections, restricted to `wanted` titles when non-empty.
fn select_sections(directories: Vec<Directory>, wanted: &[String]) -> Vec<Directory> {
    directories
        .into_iter()
        .filter(Directory::is_show_section)
        .filter(|d| wanted.is_empty() || wanted.iter().any(|w| w.eq_ignore_ascii_case(&d.title)))
        .collect()
}

/// Plex's title filter is a substring search; keep only a normalized match.
fn select_show(candidates: Vec<Metadata>, title: &str) -> Option<Metadata> {
    let wanted = normalize(title);
    candidates
        .into_iter()
        .find(|show| show.titles().any(|t| normalize(t) == wanted))
}

impl MediaServer for PlexClient {
    async fn find_series_by_title(&self, title: &str) -> Result<Option<SeriesHandle>, LibraryError> {
        Ok(self.find_show(title).await?.map(Metadata::into_series_handle))
    }

    async fn get_watched_seasons(
        &self,
        series: &SeriesHandle,
    ) -> Result<Vec<LocalWatchedSeason>, LibraryError> {
        Ok(self.seasons(&series.id).await?)
    }
}
