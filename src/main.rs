use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use mod_updater::config;

#[derive(Parser)]
#[command(name = "mod-updater")]
#[command(version, about = "Keeps installed Minecraft mods up to date")]
struct Cli {
    /// Path to the settings file
    #[arg(long, default_value = "appsettings.json")]
    settings: PathBuf,

    /// Resolve and report available updates without downloading anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = mod_updater::logging::init(&config::log_dir());

    let summary = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(mod_updater::updater::run(&cli.settings, cli.dry_run))?;

    info!(
        "Checked {} mod(s): {} up to date, {} with updates, {} without a match, {} skipped, {} failed",
        summary.checked,
        summary.up_to_date,
        summary.available,
        summary.no_match,
        summary.skipped,
        summary.failed
    );
    Ok(())
}
