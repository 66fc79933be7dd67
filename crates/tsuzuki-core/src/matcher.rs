use crate::models::RemoteListEntry;
use crate::normalize::{normalize, ordinal};

/// Resolves a local (title, season) to a remote list entry when no
/// override exists.
pub trait TitleMatcher: Send + Sync {
    fn match_season<'a>(
        &self,
        title: &str,
        season: u32,
        entries: &'a [RemoteListEntry],
    ) -> Option<&'a RemoteListEntry>;
}

/// Exact match on normalized titles.
///
/// Season 1 matches the bare title. Later seasons match the common
/// sequel naming forms: "Title Season 2", "Title 2", "Title 2nd Season",
/// and "Title Part 2".
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedTitleMatcher;

impl TitleMatcher for NormalizedTitleMatcher {
    fn match_season<'a>(
        &self,
        title: &str,
        season: u32,
        entries: &'a [RemoteListEntry],
    ) -> Option<&'a RemoteListEntry> {
        if title.trim().is_empty() || entries.is_empty() {
            return None;
        }

        let candidates = candidate_titles(title, season);
        entries.iter().find(|entry| {
            entry
                .titles
                .iter()
                .any(|t| candidates.contains(&normalize(t)))
        })
    }
}

/// Normalized titles a remote entry may carry for `season` of `title`.
fn candidate_titles(title: &str, season: u32) -> Vec<String> {
    let base = normalize(title);
    if season <= 1 {
        return vec![base];
    }

    vec![
        format!("{base} season {season}"),
        format!("{base} {season}"),
        format!("{base} {} season", ordinal(season)),
        format!("{base} part {season}"),
    ]
}
