//! Runs CLI commands against a `ScreenManager`
//!
//! Each command writes its report to `out` and returns whether it succeeded.

use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::events::{AvailabilityChanged, SecondaryScreenWatcher};
use super::idle::IdleQueue;
use super::placement::{Placement, ScreenManager};
use crate::cli::{Commands, GatherArgs, PlacementArgs, SendArgs, Target, TopologyAction, WatchArgs};
use crate::config::Settings;
use crate::domain::{Alignment, Rect, Screen, Topology};
use crate::platform::{DisplayBackend, DisplayChangeCallback, PlatformError, WindowBackend};
use tracing::{error, info, warn};

/// How often `watch` wakes up to print queued events
const WATCH_TICK: Duration = Duration::from_millis(250);

/// Dispatches `command`
///
/// `attach` connects the OS display-change signal for `watch`; the value it
/// returns keeps the connection alive until the command ends.
pub fn run<P, G, A>(
    manager: &Arc<ScreenManager<P>>,
    command: &Commands,
    settings: &Settings,
    attach: A,
    out: &mut dyn Write,
) -> io::Result<bool>
where
    P: DisplayBackend + WindowBackend + 'static,
    A: FnOnce(DisplayChangeCallback) -> Result<G, PlatformError>,
{
    match command {
        Commands::Screens => list_screens(manager, out),
        Commands::Dpi => show_dpi(manager, out),
        Commands::Displays => {
            writeln!(out, "{} active display(s)", manager.display_count())?;
            Ok(true)
        }
        Commands::Topology { action } => topology(manager, *action, out),
        Commands::Send(args) => Ok(send(manager, args, settings)),
        Commands::Gather(args) => Ok(gather(manager, args, settings)),
        Commands::Watch(args) => watch(manager, args, settings, attach, out),
    }
}

fn list_screens<P>(manager: &ScreenManager<P>, out: &mut dyn Write) -> io::Result<bool>
where
    P: DisplayBackend + WindowBackend,
{
    let screens = manager.screens();
    if screens.is_empty() {
        writeln!(out, "no screens found")?;
        return Ok(false);
    }
    let secondary = manager.secondary_screen();
    for screen in &screens {
        let role = if screen.is_primary {
            "primary"
        } else if secondary.as_ref().is_some_and(|s| s.same_device(screen)) {
            "secondary"
        } else {
            "-"
        };
        writeln!(out, "{}", describe_screen(screen, role))?;
    }
    Ok(true)
}

fn describe_screen(screen: &Screen, role: &str) -> String {
    format!(
        "{:<14} {:<9} bounds {}  work area {}  dpi {}x{}",
        screen.device_name,
        role,
        describe_rect(&screen.bounds),
        describe_rect(&screen.work_area),
        screen.dpi.0,
        screen.dpi.1
    )
}

fn describe_rect(rect: &Rect) -> String {
    format!("{}x{}@{},{}", rect.w, rect.h, rect.x, rect.y)
}

fn show_dpi<P>(manager: &ScreenManager<P>, out: &mut dyn Write) -> io::Result<bool>
where
    P: DisplayBackend + WindowBackend,
{
    let dpi = manager.dpi();
    let ratio = dpi.ratio();
    let corrected = if manager.dpi_band().contains(ratio) {
        "on"
    } else {
        "off"
    };
    writeln!(
        out,
        "dpi {}x{}  ratio {:.2}x{:.2}  size correction {corrected}",
        dpi.x, dpi.y, ratio.x, ratio.y
    )?;
    Ok(true)
}

fn topology<P>(manager: &ScreenManager<P>, action: TopologyAction, out: &mut dyn Write) -> io::Result<bool>
where
    P: DisplayBackend + WindowBackend,
{
    let target = match action {
        TopologyAction::Show => {
            return match manager.current_topology() {
                Ok(topology) => {
                    writeln!(out, "{topology}")?;
                    Ok(true)
                }
                Err(e) => {
                    error!("{e}");
                    Ok(false)
                }
            };
        }
        TopologyAction::Extend => Topology::Extend,
        TopologyAction::Clone => Topology::Clone,
        TopologyAction::Internal => Topology::Internal,
        TopologyAction::External => Topology::External,
    };
    Ok(manager.switch_topology(target))
}

/// Flags win over the configured default alignment
fn resolve_placement(args: &PlacementArgs, default: Alignment) -> Placement {
    match (args.offset, args.align) {
        (Some(offset), _) => Placement::Offset(offset),
        (None, Some(alignment)) => Placement::Align(alignment),
        (None, None) => Placement::Align(default),
    }
}

fn send<P>(manager: &ScreenManager<P>, args: &SendArgs, settings: &Settings) -> bool
where
    P: DisplayBackend + WindowBackend,
{
    if args.force_extend && !manager.ensure_extended(true) {
        return false;
    }
    let placement = resolve_placement(&args.placement, settings.placement.alignment);

    if let Some(program) = &args.program {
        let screen = match args.to {
            Target::Primary => manager.primary_screen(),
            Target::Secondary => manager.secondary_screen(),
            Target::Swap | Target::Current => {
                error!("--program needs --to primary or --to secondary");
                return false;
            }
        };
        return if args.main_only {
            manager.send_program_main_windows_to_screen(program, screen.as_ref(), placement)
        } else {
            manager.send_program_windows_to_screen(program, screen.as_ref(), placement)
        };
    }

    let Some(window) = args.window.or_else(|| manager.platform().foreground_window()) else {
        error!("no window given and no foreground window");
        return false;
    };
    match args.to {
        Target::Primary => manager.send_to_primary(window, placement),
        Target::Secondary => manager.send_to_secondary(window, placement),
        Target::Swap => manager.swap_screen(window, placement),
        Target::Current => {
            let screen = manager.screen_of(window);
            manager.send_to_screen(window, screen.as_ref(), placement)
        }
    }
}

fn gather<P>(manager: &ScreenManager<P>, args: &GatherArgs, settings: &Settings) -> bool
where
    P: DisplayBackend + WindowBackend,
{
    if !manager.ensure_extended(args.force_extend) {
        warn!("desktop is not extended; pass --force-extend to switch");
        return false;
    }
    let placement = resolve_placement(&args.placement, settings.placement.alignment);
    let from = manager.secondary_screen();
    let to = manager.primary_screen();
    manager.gather_windows(from.as_ref(), to.as_ref(), placement)
}

fn watch<P, G, A>(
    manager: &Arc<ScreenManager<P>>,
    args: &WatchArgs,
    settings: &Settings,
    attach: A,
    out: &mut dyn Write,
) -> io::Result<bool>
where
    P: DisplayBackend + WindowBackend + 'static,
    A: FnOnce(DisplayChangeCallback) -> Result<G, PlatformError>,
{
    let program = args.program.clone().or_else(|| settings.watch.program.clone());
    let alignment = args.align.unwrap_or(settings.watch.alignment);

    let queue = IdleQueue::new();
    let watcher = Arc::new(SecondaryScreenWatcher::new(
        Arc::clone(manager.platform()),
        queue.sender(),
    ));
    writeln!(out, "secondary screen available: {}", watcher.is_available())?;

    let (events_tx, events_rx) = mpsc::channel();
    let events_tx = Mutex::new(events_tx);
    let follower = Arc::clone(manager);
    let _subscription = watcher.subscribe(move |event: AvailabilityChanged| {
        if let Some(program) = &program {
            let screen = if event.available {
                follower.secondary_screen()
            } else {
                follower.primary_screen()
            };
            let moved = follower.send_program_main_windows_to_screen(program, screen.as_ref(), alignment);
            info!(program, moved, available = event.available, "program windows followed");
        }
        let _ = events_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(event);
    });

    let notifier = Arc::clone(&watcher);
    let _listener = match attach(Arc::new(move || {
        notifier.handle_display_change();
    })) {
        Ok(guard) => guard,
        Err(e) => {
            error!("cannot listen for display changes: {e}");
            return Ok(false);
        }
    };
    info!("watching display changes");

    let deadline = args.seconds.map(|s| Instant::now() + Duration::from_secs(s));
    loop {
        queue.run_pending();
        print_events(&events_rx, out)?;
        let tick = match deadline {
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    break;
                }
                left.min(WATCH_TICK)
            }
            None => WATCH_TICK,
        };
        queue.wait_and_run(tick);
    }
    queue.run_pending();
    print_events(&events_rx, out)?;
    Ok(true)
}

fn print_events(events: &mpsc::Receiver<AvailabilityChanged>, out: &mut dyn Write) -> io::Result<()> {
    while let Ok(event) = events.try_recv() {
        let state = if event.available { "available" } else { "unavailable" };
        writeln!(out, "secondary screen {state}")?;
    }
    Ok(())
}
