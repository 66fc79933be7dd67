use serde::Deserialize;

use tsuzuki_core::models::{ListStatus, RemoteListEntry};

use super::error::AniListError;

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    pub status: Option<u16>,
}

// ── User list query ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MediaListCollectionResponse {
    #[serde(rename = "MediaListCollection")]
    pub media_list_collection: Option<MediaListCollection>,
}

#[derive(Debug, Deserialize)]
pub struct MediaListCollection {
    pub lists: Vec<MediaListGroup>,
}

#[derive(Debug, Deserialize)]
pub struct MediaListGroup {
    pub entries: Vec<MediaListEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MediaListEntry {
    #[serde(rename = "mediaId")]
    pub media_id: u64,
    pub progress: Option<u32>,
    pub status: Option<String>,
    pub media: AniListMedia,
}

#[derive(Debug, Deserialize)]
pub struct AniListMedia {
    pub id: u64,
    pub title: Option<AniListTitle>,
    pub episodes: Option<u32>,
    pub synonyms: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AniListTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
}

// ── Save mutation ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveMediaListEntryResponse {
    #[serde(rename = "SaveMediaListEntry")]
    pub save_media_list_entry: Option<SavedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SavedEntry {
    pub id: u64,
    pub progress: Option<u32>,
}

// ── Conversions ──────────────────────────────────────────────────

pub fn map_anilist_status(s: &str) -> ListStatus {
    match s {
        "CURRENT" => ListStatus::Current,
        "PLANNING" => ListStatus::Planning,
        "COMPLETED" => ListStatus::Completed,
        "DROPPED" => ListStatus::Dropped,
        "PAUSED" => ListStatus::Paused,
        "REPEATING" => ListStatus::Repeating,
        _ => ListStatus::Current,
    }
}

pub fn map_status_to_anilist(status: ListStatus) -> &'static str {
    match status {
        ListStatus::Current => "CURRENT",
        ListStatus::Planning => "PLANNING",
        ListStatus::Completed => "COMPLETED",
        ListStatus::Dropped => "DROPPED",
        ListStatus::Paused => "PAUSED",
        ListStatus::Repeating => "REPEATING",
    }
}

impl MediaListEntry {
    pub fn into_remote_entry(self) -> RemoteListEntry {
        let mut titles = Vec::new();
        if let Some(title) = self.media.title {
            titles.extend(title.romaji);
            titles.extend(title.english);
        }
        titles.extend(self.media.synonyms.unwrap_or_default());

        RemoteListEntry {
            media_id: self.media_id,
            progress: self.progress.unwrap_or(0),
            status: self
                .status
                .as_deref()
                .map(map_anilist_status)
                .unwrap_or(ListStatus::Current),
            total_episodes: self.media.episodes,
            titles,
        }
    }
}

impl MediaListCollection {
    /// Flatten every list group, keeping the first occurrence of each media id.
    ///
    /// Custom lists repeat entries that are also in a status list.
    pub fn into_remote_entries(self) -> Vec<RemoteListEntry> {
        let mut entries: Vec<RemoteListEntry> = Vec::new();
        for entry in self.lists.into_iter().flat_map(|group| group.entries) {
            if entries.iter().any(|e| e.media_id == entry.media_id) {
                continue;
            }
            entries.push(entry.into_remote_entry());
        }
        entries
    }
}

/// Classify an AniList error by HTTP status and message.
pub fn classify_error(status: u16, message: &str) -> AniListError {
    let lower = message.to_lowercase();
    if status == 401 || lower.contains("invalid token") || lower.contains("unauthorized") {
        AniListError::Auth(message.to_string())
    } else if status == 404 || lower.contains("not found") {
        AniListError::NotFound(message.to_string())
    } else {
        AniListError::Api {
            status,
            message: message.to_string(),
        }
    }
}

impl GraphQLError {
    pub fn into_error(self, http_status: u16) -> AniListError {
        classify_error(self.status.unwrap_or(http_status), &self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_user_list_response() {
        let json = r#"{
            "data": {
                "MediaListCollection": {
                    "lists": [
                        {
                            "entries": [
                                {
                                    "mediaId": 154587,
                                    "progress": 14,
                                    "status": "CURRENT",
                                    "media": {
                                        "id": 154587,
                                        "title": {
                                            "romaji": "Sousou no Frieren",
                                            "english": "Frieren: Beyond Journey's End"
                                        },
                                        "episodes": 28,
                                        "synonyms": ["Frieren at the Funeral"]
                                    }
                                }
                            ]
                        },
                        {
                            "entries": [
                                {
                                    "mediaId": 16498,
                                    "progress": 25,
                                    "status": "COMPLETED",
                                    "media": {
                                        "id": 16498,
                                        "title": { "romaji": "Shingeki no Kyojin", "english": null },
                                        "episodes": 25
                                    }
                                },
                                {
                                    "mediaId": 154587,
                                    "progress": 14,
                                    "status": "CURRENT",
                                    "media": { "id": 154587 }
                                }
                            ]
                        }
                    ]
                }
            }
        }"#;

        let resp: GraphQLResponse<MediaListCollectionResponse> =
            serde_json::from_str(json).unwrap();
        assert!(resp.errors.is_empty());

        let entries = resp
            .data
            .unwrap()
            .media_list_collection
            .unwrap()
            .into_remote_entries();
        assert_eq!(entries.len(), 2);

        let frieren = &entries[0];
        assert_eq!(frieren.media_id, 154587);
        assert_eq!(frieren.progress, 14);
        assert_eq!(frieren.status, ListStatus::Current);
        assert_eq!(frieren.total_episodes, Some(28));
        assert_eq!(
            frieren.titles,
            vec![
                "Sousou no Frieren".to_string(),
                "Frieren: Beyond Journey's End".to_string(),
                "Frieren at the Funeral".to_string(),
            ]
        );

        let aot = &entries[1];
        assert_eq!(aot.status, ListStatus::Completed);
        assert_eq!(aot.titles, vec!["Shingeki no Kyojin".to_string()]);
    }

    #[test]
    fn test_deserialize_user_not_found() {
        let json = r#"{
            "errors": [ { "message": "User not found", "status": 404 } ],
            "data": { "MediaListCollection": null }
        }"#;

        let resp: GraphQLResponse<MediaListCollectionResponse> =
            serde_json::from_str(json).unwrap();
        assert!(resp.data.unwrap().media_list_collection.is_none());

        let err = resp.errors.into_iter().next().unwrap().into_error(200);
        assert!(matches!(err, AniListError::NotFound(_)));
    }

    #[test]
    fn test_deserialize_invalid_token() {
        let json = r#"{
            "errors": [ { "message": "Invalid token", "status": 400 } ],
            "data": null
        }"#;

        let resp: GraphQLResponse<MediaListCollectionResponse> =
            serde_json::from_str(json).unwrap();
        assert!(resp.data.is_none());

        let err = resp.errors.into_iter().next().unwrap().into_error(400);
        assert!(matches!(err, AniListError::Auth(_)));
    }

    #[test]
    fn test_classify_error() {
        assert!(matches!(classify_error(401, ""), AniListError::Auth(_)));
        assert!(matches!(classify_error(404, ""), AniListError::NotFound(_)));
        assert!(matches!(
            classify_error(500, "Internal Server Error"),
            AniListError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_deserialize_minimal_entry() {
        let json = r#"{ "mediaId": 1, "progress": null, "status": null, "media": { "id": 1 } }"#;
        let entry: MediaListEntry = serde_json::from_str(json).unwrap();
        let remote = entry.into_remote_entry();
        assert_eq!(remote.progress, 0);
        assert_eq!(remote.status, ListStatus::Current);
        assert!(remote.titles.is_empty());
        assert!(remote.total_episodes.is_none());
    }

    #[test]
    fn test_deserialize_save_response() {
        let json = r#"{ "data": { "SaveMediaListEntry": { "id": 99, "progress": 15 } } }"#;
        let resp: GraphQLResponse<SaveMediaListEntryResponse> =
            serde_json::from_str(json).unwrap();
        let saved = resp.data.unwrap().save_media_list_entry.unwrap();
        assert_eq!(saved.id, 99);
        assert_eq!(saved.progress, Some(15));
    }

    #[test]
    fn test_status_mapping() {
        for status in [
            ListStatus::Current,
            ListStatus::Planning,
            ListStatus::Completed,
            ListStatus::Dropped,
            ListStatus::Paused,
            ListStatus::Repeating,
        ] {
            assert_eq!(map_anilist_status(map_status_to_anilist(status)), status);
        }
        assert_eq!(map_anilist_status("SOMETHING_NEW"), ListStatus::Current);
    }
}
