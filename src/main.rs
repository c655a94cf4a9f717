//! Entry point for the `dualscreen` binary

use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};

use dualscreen::cli::Cli;
use dualscreen::config::Settings;
use dualscreen::logging;

fn main() {
    match run() {
        Ok(true) => println!("ok"),
        Ok(false) => {
            println!("failed");
            process::exit(1);
        }
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            process::exit(2);
        }
    }
}

/// Parse CLI arguments, load settings, install logging and dispatch
fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    let source = Settings::source_path(cli.config.as_deref());
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    // The level may come from the settings file, so logging starts after it is read
    let spec = logging::init(&cli.log, settings.logging.level.as_deref());
    debug!(filter = %spec, "logging initialised");
    match &source {
        Some(path) => debug!(path = %path.display(), "loaded settings"),
        None => debug!("no settings file, using defaults"),
    }
    run_command(&cli, &settings)
}

#[cfg(windows)]
fn run_command(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    use std::io;
    use std::sync::Arc;

    use dualscreen::app::{ScreenManager, commands};
    use dualscreen::platform::{DisplayChangeListener, TopologySupport, Win32Platform, topology};

    let support = topology::probe();
    if let TopologySupport::Unavailable(reason) = &support {
        tracing::warn!("topology control disabled: {reason}");
    }
    let platform = Arc::new(Win32Platform::new(support));
    let manager = Arc::new(ScreenManager::new(platform).with_dpi_band(settings.placement.dpi_band()));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(
        &manager,
        &cli.command,
        settings,
        DisplayChangeListener::start,
        &mut out,
    )
    .context("writing command output")
}

#[cfg(not(windows))]
fn run_command(_cli: &Cli, _settings: &Settings) -> anyhow::Result<bool> {
    anyhow::bail!("dualscreen drives the Windows desktop and only runs on Windows")
}
