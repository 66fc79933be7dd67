use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::mapping::MappingRegistry;
use crate::matcher::{NormalizedTitleMatcher, TitleMatcher};
use crate::models::{ListStatus, LocalWatchedSeason, RemoteListEntry};
use crate::source::{ProgressUpdate, ProgressWriter};

/// Offset used when no override exists.
const DEFAULT_START: u32 = 1;

/// Run-mode settings for the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Compute decisions but never write to the remote list.
    pub skip_write: bool,
}

/// What should happen to the remote entry of one local season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// Remote is already at or ahead of the local progress.
    NoChange {
        remote_id: u64,
        remote_progress: u32,
        cumulative: u32,
    },
    /// Remote progress should become `to`.
    Update {
        remote_id: u64,
        from: u32,
        to: u32,
        status: ListStatus,
    },
    /// Neither an override nor a title match was found.
    Unresolved,
}

/// Decision for a single local season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonDecision {
    pub season: u32,
    pub kind: DecisionKind,
}

/// Result of one remote write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// Dry-run: the write was not sent.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonWrite {
    pub season: u32,
    pub remote_id: u64,
    pub outcome: WriteOutcome,
}

/// Everything the engine decided and did for one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub title: String,
    pub decisions: Vec<SeasonDecision>,
    pub writes: Vec<SeasonWrite>,
}

impl SyncReport {
    pub fn updates(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d.kind, DecisionKind::Update { .. }))
            .count()
    }

    pub fn unresolved(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.kind == DecisionKind::Unresolved)
            .count()
    }

    pub fn failed_writes(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w.outcome, WriteOutcome::Failed(_)))
            .count()
    }
}

/// Where a season's remote entry came from.
struct Resolved<'e> {
    remote_id: u64,
    start_offset: u32,
    entry: Option<&'e RemoteListEntry>,
}

/// Decides, per local season, whether the remote list needs an update.
pub struct Reconciler<'r, M = NormalizedTitleMatcher> {
    registry: &'r MappingRegistry,
    matcher: M,
    options: SyncOptions,
}

impl<'r> Reconciler<'r, NormalizedTitleMatcher> {
    pub fn new(registry: &'r MappingRegistry, options: SyncOptions) -> Self {
        Self::with_matcher(registry, NormalizedTitleMatcher, options)
    }
}

impl<'r, M: TitleMatcher> Reconciler<'r, M> {
    pub fn with_matcher(registry: &'r MappingRegistry, matcher: M, options: SyncOptions) -> Self {
        Self {
            registry,
            matcher,
            options,
        }
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    /// Compute the decision for every local season, in input order.
    ///
    /// Seasons with nothing watched produce no decision. Progress planned
    /// for an earlier season counts as the remote progress of later
    /// seasons mapped to the same entry, so a run never moves an entry
    /// backwards.
    pub fn plan(
        &self,
        title: &str,
        remote_entries: &[RemoteListEntry],
        local_seasons: &[LocalWatchedSeason],
    ) -> Vec<SeasonDecision> {
        let mut planned: HashMap<u64, u32> = HashMap::new();
        let mut decisions = Vec::with_capacity(local_seasons.len());

        for local in local_seasons {
            if local.season == 0 || local.watched_episodes == 0 {
                debug!(title, season = local.season, "Nothing watched, skipping season");
                continue;
            }

            let Some(resolved) = self.resolve(title, local.season, remote_entries) else {
                warn!(title, season = local.season, "No AniList entry found for season");
                decisions.push(SeasonDecision {
                    season: local.season,
                    kind: DecisionKind::Unresolved,
                });
                continue;
            };

            let cumulative = cumulative_episode(resolved.start_offset, local.watched_episodes);
            let remote_progress = planned
                .get(&resolved.remote_id)
                .copied()
                .or(resolved.entry.map(|e| e.progress))
                .unwrap_or(0);

            let kind = if cumulative > remote_progress {
                planned.insert(resolved.remote_id, cumulative);
                info!(
                    title,
                    season = local.season,
                    anilist_id = resolved.remote_id,
                    from = remote_progress,
                    to = cumulative,
                    "Progress update needed"
                );
                DecisionKind::Update {
                    remote_id: resolved.remote_id,
                    from: remote_progress,
                    to: cumulative,
                    status: target_status(resolved.entry, cumulative),
                }
            } else {
                debug!(
                    title,
                    season = local.season,
                    anilist_id = resolved.remote_id,
                    remote_progress,
                    cumulative,
                    "AniList already up to date"
                );
                DecisionKind::NoChange {
                    remote_id: resolved.remote_id,
                    remote_progress,
                    cumulative,
                }
            };

            decisions.push(SeasonDecision {
                season: local.season,
                kind,
            });
        }

        decisions
    }

    /// Plan, then send every update through `writer` unless writes are skipped.
    ///
    /// A failed write is recorded and does not stop the remaining ones.
    pub async fn reconcile<W: ProgressWriter>(
        &self,
        title: &str,
        remote_entries: &[RemoteListEntry],
        local_seasons: &[LocalWatchedSeason],
        writer: &W,
    ) -> SyncReport {
        let decisions = self.plan(title, remote_entries, local_seasons);
        let mut writes = Vec::new();

        for decision in &decisions {
            let DecisionKind::Update {
                remote_id,
                to,
                status,
                ..
            } = decision.kind
            else {
                continue;
            };

            let outcome = if self.options.skip_write {
                info!(
                    title,
                    season = decision.season,
                    anilist_id = remote_id,
                    progress = to,
                    "Skip update enabled, not updating AniList"
                );
                WriteOutcome::Skipped
            } else {
                let update = ProgressUpdate {
                    progress: to,
                    status: Some(status),
                };
                match writer.push_progress(remote_id, update).await {
                    Ok(()) => {
                        info!(
                            title,
                            season = decision.season,
                            anilist_id = remote_id,
                            progress = to,
                            status = %status,
                            "Updated AniList progress"
                        );
                        WriteOutcome::Applied
                    }
                    Err(e) => {
                        error!(
                            title,
                            season = decision.season,
                            anilist_id = remote_id,
                            error = %e,
                            "Failed to update AniList progress"
                        );
                        WriteOutcome::Failed(e.to_string())
                    }
                }
            };

            writes.push(SeasonWrite {
                season: decision.season,
                remote_id,
                outcome,
            });
        }

        SyncReport {
            title: title.to_string(),
            decisions,
            writes,
        }
    }

    fn resolve<'e>(
        &self,
        title: &str,
        season: u32,
        remote_entries: &'e [RemoteListEntry],
    ) -> Option<Resolved<'e>> {
        if let Some(mapping) = self.registry.lookup(title, season) {
            debug!(
                title,
                season,
                anilist_id = mapping.remote_id,
                start = mapping.start_offset,
                "Using custom mapping"
            );
            return Some(Resolved {
                remote_id: mapping.remote_id,
                start_offset: mapping.start_offset,
                entry: remote_entries
                    .iter()
                    .find(|e| e.media_id == mapping.remote_id),
            });
        }

        let entry = self.matcher.match_season(title, season, remote_entries)?;
        debug!(
            title,
            season,
            anilist_id = entry.media_id,
            matched = entry.preferred_title(),
            "Matched by title"
        );
        Some(Resolved {
            remote_id: entry.media_id,
            start_offset: DEFAULT_START,
            entry: Some(entry),
        })
    }
}

/// Cumulative episode number of the last watched local episode.
///
/// `watched` must be at least 1. Saturates at `u32::MAX`.
pub fn cumulative_episode(start_offset: u32, watched: u32) -> u32 {
    start_offset.saturating_add(watched.saturating_sub(1))
}

/// List status to send along with a progress update.
fn target_status(entry: Option<&RemoteListEntry>, progress: u32) -> ListStatus {
    let total = entry.and_then(|e| e.total_episodes).filter(|&t| t > 0);
    match (total, entry.map(|e| e.status)) {
        (Some(total), _) if progress >= total => ListStatus::Completed,
        (_, Some(ListStatus::Repeating)) => ListStatus::Repeating,
        _ => ListStatus::Current,
    }
}
