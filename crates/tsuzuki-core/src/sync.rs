use thiserror::Error;
use tracing::{error, info};

use crate::matcher::TitleMatcher;
use crate::reconcile::{Reconciler, SyncReport};
use crate::source::{CatalogError, LibraryError, MediaServer, ProgressWriter, RemoteCatalog};

/// Series-level failures. None of them attempts a remote write.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("unable to retrieve AniList list: {0}")]
    RemoteList(#[source] CatalogError),

    #[error("no items found on the AniList list of {0}")]
    EmptyRemoteList(String),

    #[error("media server query failed: {0}")]
    Library(#[source] LibraryError),

    #[error("no series titled {0:?} found on the media server")]
    SeriesNotFound(String),
}

impl SyncError {
    /// Every variant means one of the two sources could not be used.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(
            self,
            Self::RemoteList(_)
                | Self::EmptyRemoteList(_)
                | Self::Library(_)
                | Self::SeriesNotFound(_)
        )
    }
}

/// Fetch both sources for `title` and reconcile them.
///
/// The remote list is fetched first; nothing is queried on the media
/// server when it is unavailable or empty.
pub async fn sync_series<C, S, M>(
    title: &str,
    username: &str,
    catalog: &C,
    media_server: &S,
    reconciler: &Reconciler<'_, M>,
) -> Result<SyncReport, SyncError>
where
    C: RemoteCatalog + ProgressWriter,
    S: MediaServer,
    M: TitleMatcher,
{
    let remote_entries = catalog.fetch_user_list(username).await.map_err(|e| {
        error!(username, error = %e, "Unable to retrieve AniList list, check your username and access token");
        SyncError::RemoteList(e)
    })?;
    if remote_entries.is_empty() {
        error!(username, "No items found on your AniList list to process");
        return Err(SyncError::EmptyRemoteList(username.to_string()));
    }
    info!(username, entries = remote_entries.len(), "Fetched AniList list");

    let series = media_server
        .find_series_by_title(title)
        .await
        .map_err(|e| {
            error!(title, error = %e, "Unable to search Plex for the show");
            SyncError::Library(e)
        })?
        .ok_or_else(|| {
            error!(title, "Found no Plex shows for processing");
            SyncError::SeriesNotFound(title.to_string())
        })?;

    let seasons = media_server
        .get_watched_seasons(&series)
        .await
        .map_err(|e| {
            error!(title = %series.title, error = %e, "Found no watched shows on Plex for processing");
            SyncError::Library(e)
        })?;
    info!(title = %series.title, seasons = seasons.len(), "Fetched Plex watched state");

    // Overrides are keyed by the library's own title, not the query.
    let report = reconciler
        .reconcile(&series.title, &remote_entries, &seasons, catalog)
        .await;
    info!(
        title = %series.title,
        updates = report.updates(),
        unresolved = report.unresolved(),
        failed_writes = report.failed_writes(),
        "Plex to AniList sync finished"
    );
    Ok(report)
}
