//! In-memory platform used by the app-layer tests

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::domain::process::matches_program;
use crate::domain::{Dpi, MonitorId, Rect, Screen, Topology, WindowGeometry, WindowId};
use crate::platform::{DisplayBackend, PlatformError, WindowBackend};

/// Primary 1920x1080 with a 40px top bar, secondary 1280x1024 to its right
/// with a 40px bottom taskbar
pub fn dual_screens() -> Vec<Screen> {
    vec![
        Screen {
            id: MonitorId(1),
            device_name: r"\\.\DISPLAY1".into(),
            is_primary: true,
            bounds: Rect::new(0, 0, 1920, 1080),
            work_area: Rect::new(0, 40, 1920, 1040),
            dpi: (96, 96),
        },
        Screen {
            id: MonitorId(2),
            device_name: r"\\.\DISPLAY2".into(),
            is_primary: false,
            bounds: Rect::new(1920, 0, 1280, 1024),
            work_area: Rect::new(1920, 0, 1280, 984),
            dpi: (96, 96),
        },
    ]
}

/// A fake top-level window
#[derive(Debug, Clone, PartialEq)]
pub struct FakeWindow {
    pub bounds: Rect,
    pub restored: Rect,
    pub maximized: bool,
    pub borders: (i32, i32),
    pub program: String,
    pub visible: bool,
    pub screen: usize,
}

impl FakeWindow {
    pub fn normal(bounds: Rect, screen: usize) -> Self {
        Self {
            bounds,
            restored: bounds,
            maximized: false,
            borders: (8, 8),
            program: "explorer.exe".into(),
            visible: true,
            screen,
        }
    }

    pub fn maximized(bounds: Rect, restored: Rect, screen: usize) -> Self {
        Self {
            maximized: true,
            restored,
            ..Self::normal(bounds, screen)
        }
    }

    pub fn owned_by(mut self, program: &str) -> Self {
        self.program = program.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Debug)]
struct State {
    screens: Vec<Screen>,
    windows: BTreeMap<WindowId, FakeWindow>,
    foreground: Option<WindowId>,
    dpi: Dpi,
    topology: u32,
    display_count: u32,
    refuse_topology: bool,
    apply_calls: usize,
    fail_moves: bool,
    geometry_reads_left: Option<usize>,
    move_delay: Duration,
    operations: Vec<String>,
}

/// Desktop simulated in memory
///
/// Windows snap to whichever screen contains their centre after a move;
/// maximizing fills the work area of that screen.
pub struct FakePlatform {
    state: Mutex<State>,
    screens_hook: Mutex<Option<Arc<dyn Fn() + Send + Sync>>>,
}

impl FakePlatform {
    pub fn new(screens: Vec<Screen>) -> Self {
        let display_count = screens.len() as u32;
        Self {
            state: Mutex::new(State {
                screens,
                windows: BTreeMap::new(),
                foreground: None,
                dpi: Dpi::default(),
                topology: Topology::Extend.raw(),
                display_count,
                refuse_topology: false,
                apply_calls: 0,
                fail_moves: false,
                geometry_reads_left: None,
                move_delay: Duration::ZERO,
                operations: Vec::new(),
            }),
            screens_hook: Mutex::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_window(&self, id: WindowId, window: FakeWindow) {
        self.state().windows.insert(id, window);
    }

    pub fn window(&self, id: WindowId) -> FakeWindow {
        self.state().windows[&id].clone()
    }

    pub fn set_screens(&self, screens: Vec<Screen>) {
        self.state().screens = screens;
    }

    pub fn set_foreground(&self, window: Option<WindowId>) {
        self.state().foreground = window;
    }

    pub fn set_dpi(&self, dpi: Dpi) {
        self.state().dpi = dpi;
    }

    pub fn set_topology(&self, raw: u32) {
        self.state().topology = raw;
    }

    pub fn set_display_count(&self, count: u32) {
        self.state().display_count = count;
    }

    /// Accept topology requests without changing anything
    pub fn refuse_topology(&self, refuse: bool) {
        self.state().refuse_topology = refuse;
    }

    pub fn fail_moves(&self, fail: bool) {
        self.state().fail_moves = fail;
    }

    /// Lets `reads` geometry queries succeed, then fails every later one
    pub fn fail_geometry_after(&self, reads: usize) {
        self.state().geometry_reads_left = Some(reads);
    }

    /// Runs `hook` inside every monitor query, after the screens were read
    pub fn set_screens_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.screens_hook.lock().unwrap() = Some(Arc::new(hook));
    }

    pub fn set_move_delay(&self, delay: Duration) {
        self.state().move_delay = delay;
    }

    pub fn apply_calls(&self) -> usize {
        self.state().apply_calls
    }

    /// Window mutations in the order they happened
    pub fn operations(&self) -> Vec<String> {
        self.state().operations.clone()
    }

    fn record(&self, operation: &str) {
        self.state().operations.push(operation.to_string());
    }
}

fn screen_containing(screens: &[Screen], rect: &Rect) -> Option<usize> {
    let (cx, cy) = (rect.x + rect.w / 2, rect.y + rect.h / 2);
    screens.iter().position(|s| s.bounds.contains_point(cx, cy))
}

impl DisplayBackend for FakePlatform {
    fn screens(&self) -> Result<Vec<Screen>, PlatformError> {
        let screens = self.state().screens.clone();
        let hook = self.screens_hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook();
        }
        Ok(screens)
    }

    fn screen_of_window(&self, window: WindowId) -> Result<Screen, PlatformError> {
        let state = self.state();
        let fake = state
            .windows
            .get(&window)
            .ok_or(PlatformError::InvalidWindow(window))?;
        state
            .screens
            .get(fake.screen)
            .cloned()
            .ok_or(PlatformError::MonitorNotFound(window))
    }

    fn display_count(&self) -> u32 {
        self.state().display_count
    }

    fn system_dpi(&self) -> Dpi {
        self.state().dpi
    }

    fn read_topology(&self) -> Result<u32, PlatformError> {
        Ok(self.state().topology)
    }

    fn apply_topology(&self, topology: Topology) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.apply_calls += 1;
        if !state.refuse_topology {
            state.topology = topology.raw();
        }
        Ok(())
    }
}

impl WindowBackend for FakePlatform {
    fn geometry(&self, window: WindowId) -> Result<WindowGeometry, PlatformError> {
        let mut state = self.state();
        if let Some(left) = state.geometry_reads_left.as_mut() {
            if *left == 0 {
                return Err(PlatformError::call("GetWindowInfo"));
            }
            *left -= 1;
        }
        let fake = state
            .windows
            .get(&window)
            .ok_or(PlatformError::InvalidWindow(window))?;
        Ok(WindowGeometry {
            bounds: fake.bounds,
            borders: fake.borders,
            is_maximized: fake.maximized,
        })
    }

    fn set_maximized(&self, window: WindowId, maximized: bool) -> Result<(), PlatformError> {
        {
            let mut state = self.state();
            let State {
                screens, windows, ..
            } = &mut *state;
            let fake = windows
                .get_mut(&window)
                .ok_or(PlatformError::InvalidWindow(window))?;
            if maximized {
                fake.restored = fake.bounds;
                fake.bounds = screens[fake.screen].work_area;
            } else {
                fake.bounds = fake.restored;
            }
            fake.maximized = maximized;
        }
        self.record(if maximized { "maximize" } else { "restore" });
        Ok(())
    }

    fn move_window(&self, window: WindowId, target: Rect) -> Result<(), PlatformError> {
        let delay = self.state().move_delay;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        {
            let mut state = self.state();
            if state.fail_moves {
                return Err(PlatformError::call("SetWindowPos"));
            }
            let screen = screen_containing(&state.screens, &target);
            let fake = state
                .windows
                .get_mut(&window)
                .ok_or(PlatformError::InvalidWindow(window))?;
            fake.bounds = target;
            fake.restored = target;
            if let Some(screen) = screen {
                fake.screen = screen;
            }
        }
        self.record("move");
        Ok(())
    }

    fn foreground_window(&self) -> Option<WindowId> {
        self.state().foreground
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        self.state().windows.keys().copied().collect()
    }

    fn program_main_windows(&self, program: &str) -> Vec<WindowId> {
        self.state()
            .windows
            .iter()
            .filter(|(_, w)| w.visible && matches_program(&w.program, program))
            .map(|(id, _)| *id)
            .collect()
    }

    fn program_windows(&self, program: &str) -> Vec<WindowId> {
        self.state()
            .windows
            .iter()
            .filter(|(_, w)| matches_program(&w.program, program))
            .map(|(id, _)| *id)
            .collect()
    }
}
