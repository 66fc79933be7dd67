use reqwest::Client;

use tsuzuki_core::models::RemoteListEntry;
use tsuzuki_core::source::{CatalogError, ProgressUpdate, ProgressWriter, RemoteCatalog};

use super::error::AniListError;
use super::types::{
    classify_error, map_status_to_anilist, GraphQLResponse, MediaListCollectionResponse,
    SaveMediaListEntryResponse,
};

const API_URL: &str = "https://graphql.anilist.co";

const USER_LIST_QUERY: &str = r#"
query ($userName: String) {
    MediaListCollection(userName: $userName, type: ANIME) {
        lists {
            entries {
                mediaId
                progress
                status
                media {
                    id
                    title { romaji english }
                    episodes
                    synonyms
                }
            }
        }
    }
}
"#;

const SAVE_PROGRESS_MUTATION: &str = r#"
mutation ($mediaId: Int, $progress: Int, $status: MediaListStatus) {
    SaveMediaListEntry(mediaId: $mediaId, progress: $progress, status: $status) {
        id
        progress
    }
}
"#;

/// AniList GraphQL API client.
pub struct AniListClient {
    access_token: String,
    endpoint: String,
    http: Client,
}

impl AniListClient {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            endpoint: API_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at a different GraphQL endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let resp = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        tracing::debug!(operation, status = %status, "AniList response received");

        // AniList reports GraphQL errors in the body, with or without an
        // error status.
        let parsed: Result<GraphQLResponse<T>, _> = serde_json::from_str(&body);
        match parsed {
            Ok(resp) => {
                if let Some(err) = resp.errors.into_iter().next() {
                    tracing::warn!(operation, status = status.as_u16(), message = %err.message, "AniList API error");
                    return Err(err.into_error(status.as_u16()));
                }
                resp.data
                    .ok_or_else(|| AniListError::Parse("response has no data".into()))
            }
            Err(_) if !status.is_success() => {
                tracing::warn!(operation, status = status.as_u16(), "AniList API error");
                Err(classify_error(status.as_u16(), &body))
            }
            Err(e) => Err(AniListError::Parse(e.to_string())),
        }
    }

    /// Fetch every entry on `username`'s anime list.
    pub async fn get_user_list(&self, username: &str) -> Result<Vec<RemoteListEntry>, AniListError> {
        let resp: MediaListCollectionResponse = self
            .graphql_request(
                "UserList",
                USER_LIST_QUERY,
                serde_json::json!({ "userName": username }),
            )
            .await?;

        let collection = resp
            .media_list_collection
            .ok_or_else(|| AniListError::NotFound(username.to_string()))?;
        Ok(collection.into_remote_entries())
    }

    /// Save progress (and optionally status) for `media_id`.
    pub async fn save_progress(
        &self,
        media_id: u64,
        update: ProgressUpdate,
    ) -> Result<(), AniListError> {
        // AniList ignores null variables.
        let mut vars = serde_json::json!({
            "mediaId": media_id,
            "progress": update.progress,
        });
        if let Some(status) = update.status {
            vars["status"] = serde_json::json!(map_status_to_anilist(status));
        }

        let resp: SaveMediaListEntryResponse = self
            .graphql_request("SaveMediaListEntry", SAVE_PROGRESS_MUTATION, vars)
            .await?;
        if resp.save_media_list_entry.is_none() {
            return Err(AniListError::Parse("SaveMediaListEntry returned null".into()));
        }
        Ok(())
    }
}

impl RemoteCatalog for AniListClient {
    async fn fetch_user_list(&self, username: &str) -> Result<Vec<RemoteListEntry>, CatalogError> {
        Ok(self.get_user_list(username).await?)
    }
}

impl ProgressWriter for AniListClient {
    async fn push_progress(
        &self,
        remote_id: u64,
        update: ProgressUpdate,
    ) -> Result<(), CatalogError> {
        Ok(self.save_progress(remote_id, update).await?)
    }
}
