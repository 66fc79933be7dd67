//! Interfaces of the external collaborators the sync consumes.
//!
//! The remote catalog (AniList) and the media server (Plex) are I/O
//! adapters. Implementations live in `tsuzuki-api`; tests use in-memory
//! fakes.

use std::future::Future;

use thiserror::Error;

use crate::models::{ListStatus, LocalWatchedSeason, RemoteListEntry, SeriesHandle};

/// Errors from the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("remote catalog error: {0}")]
    Transport(String),
}

/// Errors from the media server.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("media server error: {0}")]
    Transport(String),

    #[error("unexpected media server response: {0}")]
    Parse(String),
}

/// Progress change sent for a single remote entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub progress: u32,
    pub status: Option<ListStatus>,
}

/// Read side of the remote catalog.
pub trait RemoteCatalog: Send + Sync {
    /// Fetch every entry on `username`'s anime list.
    fn fetch_user_list(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Vec<RemoteListEntry>, CatalogError>> + Send;
}

/// Write side of the remote catalog.
pub trait ProgressWriter: Send + Sync {
    /// Set the cumulative progress of `remote_id`.
    fn push_progress(
        &self,
        remote_id: u64,
        update: ProgressUpdate,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;
}

/// The local media library.
pub trait MediaServer: Send + Sync {
    /// Find a series by title in the configured library sections.
    fn find_series_by_title(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<Option<SeriesHandle>, LibraryError>> + Send;

    /// Watched episode counts for every regular season of `series`.
    fn get_watched_seasons(
        &self,
        series: &SeriesHandle,
    ) -> impl Future<Output = Result<Vec<LocalWatchedSeason>, LibraryError>> + Send;
}
