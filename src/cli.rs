//! Command-line interface definitions for `dualscreen`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{Alignment, Offset, WindowId};
use crate::logging::LogArgs;

/// Moves windows between screens and switches display topology
#[derive(Parser, Debug)]
#[command(name = "dualscreen", version)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    /// Settings file (default: %APPDATA%\DualScreen\config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List monitors with bounds and work areas
    Screens,
    /// Show the system DPI and its ratio to 96
    Dpi,
    /// Count active displays
    Displays,
    /// Show or switch the display topology
    Topology {
        #[arg(value_enum, default_value_t = TopologyAction::Show)]
        action: TopologyAction,
    },
    /// Move a window (or a program's windows) to a screen
    Send(SendArgs),
    /// Move every window from the secondary screen to the primary one
    Gather(GatherArgs),
    /// Follow secondary-screen availability changes
    Watch(WatchArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyAction {
    Show,
    Extend,
    Clone,
    Internal,
    External,
}

/// Which screen a window is sent to
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Primary,
    Secondary,
    /// The other screen of the primary/secondary pair
    Swap,
    /// The screen the window is already on
    Current,
}

/// Alignment flags or a raw offset; falls back to the configured alignment
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct PlacementArgs {
    /// Alignment flags joined with `|`, e.g. `center|top` or `right|bottom`
    #[arg(long, value_name = "FLAGS", conflicts_with = "offset")]
    pub align: Option<Alignment>,

    /// Offset from the work area's top-left corner, e.g. `100,50`
    #[arg(long, value_name = "X,Y", allow_hyphen_values = true)]
    pub offset: Option<Offset>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SendArgs {
    #[arg(long, value_enum)]
    pub to: Target,

    #[command(flatten)]
    pub placement: PlacementArgs,

    /// Window handle, decimal or 0x-prefixed (default: the foreground window)
    #[arg(long, value_name = "HWND", conflicts_with = "program")]
    pub window: Option<WindowId>,

    /// Send the windows of every process running this executable
    #[arg(long, value_name = "NAME")]
    pub program: Option<String>,

    /// With --program, move only each process's main window
    #[arg(long, requires = "program")]
    pub main_only: bool,

    /// Switch to extended topology first if needed
    #[arg(long)]
    pub force_extend: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct GatherArgs {
    #[command(flatten)]
    pub placement: PlacementArgs,

    /// Switch to extended topology first if needed
    #[arg(long)]
    pub force_extend: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct WatchArgs {
    /// Program whose main windows follow the secondary screen
    #[arg(long, value_name = "NAME")]
    pub program: Option<String>,

    /// Alignment used when moving the program's windows
    #[arg(long, value_name = "FLAGS")]
    pub align: Option<Alignment>,

    /// Stop after this many seconds (default: run until killed)
    #[arg(long, value_name = "N")]
    pub seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dualscreen").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn topology_defaults_to_show() {
        let cli = parse(&["topology"]).unwrap();
        assert_eq!(cli.command, Commands::Topology { action: TopologyAction::Show });
        let cli = parse(&["topology", "extend"]).unwrap();
        assert_eq!(cli.command, Commands::Topology { action: TopologyAction::Extend });
    }

    #[test]
    fn send_with_alignment_and_window() {
        let cli = parse(&["send", "--to", "secondary", "--align", "center|top", "--window", "0x1a2b"]).unwrap();
        let Commands::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.to, Target::Secondary);
        assert_eq!(args.placement.align, Some(Alignment::CENTER | Alignment::TOP));
        assert_eq!(args.window, Some(WindowId(0x1a2b)));
        assert!(!args.force_extend);
    }

    #[test]
    fn send_with_negative_offset() {
        let cli = parse(&["send", "--to", "primary", "--offset", "-10,20"]).unwrap();
        let Commands::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.placement.offset, Some(Offset::new(-10, 20)));
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        assert!(parse(&["send", "--to", "primary", "--align", "left", "--offset", "1,2"]).is_err());
        assert!(parse(&["send", "--to", "primary", "--window", "1", "--program", "x"]).is_err());
        assert!(parse(&["send", "--to", "primary", "--main-only"]).is_err());
        assert!(parse(&["send", "--to", "primary", "--align", "sideways"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["gather", "--force-extend", "--debug", "--config", "c.toml"]).unwrap();
        assert!(cli.log.debug);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert_eq!(
            cli.command,
            Commands::Gather(GatherArgs {
                placement: PlacementArgs::default(),
                force_extend: true,
            })
        );
    }
}
