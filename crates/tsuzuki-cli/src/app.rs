use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info, warn};

use tsuzuki_api::anilist::AniListClient;
use tsuzuki_api::plex::PlexClient;
use tsuzuki_core::config::Settings;
use tsuzuki_core::mapping::MappingRegistry;
use tsuzuki_core::reconcile::{Reconciler, SyncOptions};
use tsuzuki_core::sync::sync_series;

use crate::cli::Cli;

/// Run one sync for `cli.title`.
///
/// Configuration errors and series-level failures exit non-zero.
/// Unresolved seasons and failed writes are logged only.
pub async fn run(cli: Cli) -> ExitCode {
    let settings = match Settings::load(cli.settings.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to load settings");
            return ExitCode::FAILURE;
        }
    };

    let mapping_path = cli
        .mappings
        .clone()
        .unwrap_or_else(|| settings.sync.mapping_file.clone());
    let registry = match MappingRegistry::load(&mapping_path) {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to load custom mappings");
            return ExitCode::FAILURE;
        }
    };

    let plex = match PlexClient::new(
        &settings.plex.url,
        settings.plex.token.clone(),
        settings.plex.sections.clone(),
    ) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Invalid Plex settings");
            return ExitCode::FAILURE;
        }
    };
    let anilist = AniListClient::new(settings.anilist.access_token.clone());

    info!(title = %cli.title, "Updating single show");

    let options = SyncOptions {
        skip_write: settings.anilist.skip_list_update || cli.dry_run,
    };
    if options.skip_write {
        warn!("AniList skip list update enabled, will match but NOT update your list");
    }

    if !cli.no_wait && settings.sync.settle_delay_secs > 0 {
        info!(seconds = settings.sync.settle_delay_secs, "Waiting for Plex to register watched state");
        tokio::time::sleep(Duration::from_secs(settings.sync.settle_delay_secs)).await;
    }

    let reconciler = Reconciler::new(&registry, options);
    match sync_series(
        &cli.title,
        &settings.anilist.username,
        &anilist,
        &plex,
        &reconciler,
    )
    .await
    {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Sync failed");
            ExitCode::FAILURE
        }
    }
}
