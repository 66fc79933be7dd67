mod app;
mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "tsuzuki=info,tsuzuki_core=info,tsuzuki_api=info";
const VERBOSE_FILTER: &str = "tsuzuki=debug,tsuzuki_core=debug,tsuzuki_api=debug";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let default = if cli.verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    app::run(cli).await
}
