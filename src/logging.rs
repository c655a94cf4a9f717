//! Logging setup for the `dualscreen` binary

use std::env;

use clap::Args;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

/// Crate targets whose level the CLI flags control
const OUR_CRATES: &[&str] = &["dualscreen"];

/// Logging controls for the CLI
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set log level to trace (this crate only)
    #[arg(long, global = true, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set log level to debug (this crate only)
    #[arg(long, global = true, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single log level for this crate (error|warn|info|debug|trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    #[arg(long, global = true)]
    pub log_filter: Option<String>,
}

/// Filter directive setting `level` for this crate and `warn` for everything else
pub fn level_spec_for(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    let mut parts = vec!["warn".to_string()];
    parts.extend(OUR_CRATES.iter().map(|target| format!("{target}={level}")));
    parts.join(",")
}

/// Final filter spec, first match wins:
/// - `--log-filter`
/// - `--trace`/`--debug`/`--log-level`
/// - `RUST_LOG`
/// - `level` from the config file
/// - `info`
pub fn compute_spec(args: &LogArgs, rust_log: Option<&str>, config_level: Option<&str>) -> String {
    if let Some(spec) = &args.log_filter {
        return spec.clone();
    }
    if args.trace {
        return level_spec_for("trace");
    }
    if args.debug {
        return level_spec_for("debug");
    }
    if let Some(level) = &args.log_level {
        return level_spec_for(level);
    }
    if let Some(spec) = rust_log.filter(|s| !s.trim().is_empty()) {
        return spec.to_string();
    }
    level_spec_for(config_level.unwrap_or("info"))
}

/// Installs the global subscriber; logs go to stderr so results stay on stdout
pub fn init(args: &LogArgs, config_level: Option<&str>) -> String {
    let rust_log = env::var("RUST_LOG").ok();
    let spec = compute_spec(args, rust_log.as_deref(), config_level);
    registry()
        .with(EnvFilter::new(&spec))
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .try_init()
        .ok();
    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let args = LogArgs {
            log_filter: Some("dualscreen::app=trace".into()),
            ..LogArgs::default()
        };
        assert_eq!(
            compute_spec(&args, Some("debug"), Some("error")),
            "dualscreen::app=trace"
        );
    }

    #[test]
    fn flags_beat_environment() {
        let args = LogArgs {
            debug: true,
            ..LogArgs::default()
        };
        assert_eq!(compute_spec(&args, Some("error"), None), "warn,dualscreen=debug");

        let args = LogArgs {
            log_level: Some("TRACE".into()),
            ..LogArgs::default()
        };
        assert_eq!(compute_spec(&args, None, None), "warn,dualscreen=trace");
    }

    #[test]
    fn environment_beats_config() {
        let args = LogArgs::default();
        assert_eq!(compute_spec(&args, Some("dualscreen=warn"), Some("debug")), "dualscreen=warn");
        assert_eq!(compute_spec(&args, Some("  "), Some("debug")), "warn,dualscreen=debug");
    }

    #[test]
    fn defaults_to_info() {
        assert_eq!(compute_spec(&LogArgs::default(), None, None), "warn,dualscreen=info");
    }
}
