use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "tsuzuki",
    version,
    about = "Sync Plex watch progress of a single series to AniList"
)]
pub struct Cli {
    /// Series title as it appears in the Plex library
    pub title: String,

    /// Settings file (defaults to ./settings.toml, then the user config dir)
    #[arg(short, long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Custom mapping file (overrides the settings value)
    #[arg(short, long, value_name = "PATH")]
    pub mappings: Option<PathBuf>,

    /// Match and report, but never update the AniList list
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the settle delay before querying Plex
    #[arg(long)]
    pub no_wait: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
