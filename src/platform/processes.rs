//! Process lookup by executable name
//!
//! Uses a Toolhelp snapshot to map program names to process ids and their
//! threads, then collects each thread's top-level windows.

use super::PlatformError;
use super::window::{is_main_window, thread_windows};
use super::windows::wide_to_string;
use crate::domain::WindowId;
use crate::domain::process::matches_program;
use std::collections::HashSet;
use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::ToolHelp::*;

/// Owns a Toolhelp snapshot handle and closes it on drop
struct Snapshot(HANDLE);

impl Snapshot {
    fn take() -> Result<Self, PlatformError> {
        unsafe {
            CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS | TH32CS_SNAPTHREAD, 0)
                .map(Snapshot)
                .map_err(|e| PlatformError::call_with("CreateToolhelp32Snapshot", e))
        }
    }

    fn process_ids(&self, program: &str) -> HashSet<u32> {
        let mut ids = HashSet::new();
        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        unsafe {
            let mut more = Process32FirstW(self.0, &mut entry).is_ok();
            while more {
                if matches_program(&wide_to_string(&entry.szExeFile), program) {
                    ids.insert(entry.th32ProcessID);
                }
                more = Process32NextW(self.0, &mut entry).is_ok();
            }
        }
        ids
    }

    fn thread_ids(&self, process: u32) -> Vec<u32> {
        let mut ids = Vec::new();
        let mut entry = THREADENTRY32 {
            dwSize: std::mem::size_of::<THREADENTRY32>() as u32,
            ..Default::default()
        };

        unsafe {
            let mut more = Thread32First(self.0, &mut entry).is_ok();
            while more {
                if entry.th32OwnerProcessID == process {
                    ids.push(entry.th32ThreadID);
                }
                more = Thread32Next(self.0, &mut entry).is_ok();
            }
        }
        ids
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Top-level windows grouped by matching process
fn windows_by_process(program: &str) -> Result<Vec<Vec<WindowId>>, PlatformError> {
    let snapshot = Snapshot::take()?;
    let processes = snapshot.process_ids(program);
    debug!(program, processes = processes.len(), "matched processes");

    let mut per_process = Vec::with_capacity(processes.len());
    for process in &processes {
        let windows: Vec<WindowId> = snapshot
            .thread_ids(*process)
            .into_iter()
            .flat_map(thread_windows)
            .collect();
        per_process.push(windows);
    }
    Ok(per_process)
}

/// Every top-level window owned by processes running `program`
pub fn program_windows(program: &str) -> Result<Vec<WindowId>, PlatformError> {
    Ok(windows_by_process(program)?.into_iter().flatten().collect())
}

/// The main window of every process running `program`
///
/// Processes without a visible, unowned top-level window are skipped.
pub fn program_main_windows(program: &str) -> Result<Vec<WindowId>, PlatformError> {
    Ok(windows_by_process(program)?
        .into_iter()
        .filter_map(|windows| windows.into_iter().find(|w| is_main_window(*w)))
        .collect())
}
