//! Display-settings-changed notifications
//!
//! A hidden top-level window on a dedicated thread receives the
//! `WM_DISPLAYCHANGE` broadcast and forwards it to a callback. The listener
//! attaches on construction and detaches on drop.
//!
//! The window is top-level on purpose: message-only windows do not receive
//! broadcast messages.

use std::cell::RefCell;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::{DisplayChangeCallback, PlatformError};
use tracing::{debug, warn};
use windows::Win32::Foundation::{ERROR_CLASS_ALREADY_EXISTS, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, MSG,
    PostMessageW, PostQuitMessage, RegisterClassW, TranslateMessage, WINDOW_EX_STYLE, WM_CLOSE,
    WM_DESTROY, WM_DISPLAYCHANGE, WNDCLASSW, WS_OVERLAPPED,
};
use windows::core::w;

thread_local! {
    static CALLBACK: RefCell<Option<DisplayChangeCallback>> = const { RefCell::new(None) };
}

/// Listens for display configuration changes until dropped
pub struct DisplayChangeListener {
    thread_handle: Option<JoinHandle<()>>,
    // Raw HWND of the hidden window, shared with the message thread
    window_handle: Arc<Mutex<Option<isize>>>,
}

impl DisplayChangeListener {
    /// Starts the listener thread and waits until its window exists
    pub fn start(callback: DisplayChangeCallback) -> Result<Self, PlatformError> {
        let window_handle = Arc::new(Mutex::new(None));
        let shared_handle = Arc::clone(&window_handle);
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread_handle = thread::Builder::new()
            .name("display-change-listener".into())
            .spawn(move || {
                CALLBACK.with(|slot| *slot.borrow_mut() = Some(callback));
                match create_listener_window() {
                    Ok(hwnd) => {
                        if let Ok(mut guard) = shared_handle.lock() {
                            *guard = Some(hwnd.0);
                        }
                        let _ = ready_tx.send(Ok(()));
                        run_message_loop();
                        if let Ok(mut guard) = shared_handle.lock() {
                            *guard = None;
                        }
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                    }
                }
                CALLBACK.with(|slot| slot.borrow_mut().take());
            })
            .map_err(|e| PlatformError::Listener(format!("failed to spawn thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                debug!("display change listener started");
                Ok(Self {
                    thread_handle: Some(thread_handle),
                    window_handle,
                })
            }
            Ok(Err(e)) => {
                let _ = thread_handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread_handle.join();
                Err(PlatformError::Listener("listener thread exited early".into()))
            }
        }
    }

    /// Check if the listener thread is still running
    pub fn is_running(&self) -> bool {
        self.window_handle
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Closes the hidden window and joins the listener thread
    pub fn stop(&mut self) -> Result<(), PlatformError> {
        let Some(handle) = self.thread_handle.take() else {
            return Ok(());
        };

        let hwnd = self.window_handle.lock().ok().and_then(|guard| *guard);
        if let Some(raw) = hwnd {
            unsafe {
                PostMessageW(HWND(raw), WM_CLOSE, WPARAM(0), LPARAM(0))
                    .map_err(|e| PlatformError::call_with("PostMessageW", e))?;
            }
        }

        handle
            .join()
            .map_err(|_| PlatformError::Listener("listener thread panicked".into()))?;
        debug!("display change listener stopped");
        Ok(())
    }
}

impl Drop for DisplayChangeListener {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("failed to stop display change listener: {e}");
        }
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        match msg {
            WM_DISPLAYCHANGE => {
                let callback = CALLBACK.with(|slot| slot.borrow().clone());
                if let Some(callback) = callback {
                    callback();
                }
                LRESULT(0)
            }
            WM_CLOSE => {
                let _ = DestroyWindow(hwnd);
                LRESULT(0)
            }
            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}

/// Registers the window class (once per process) and creates the hidden window
fn create_listener_window() -> Result<HWND, PlatformError> {
    let class_name = w!("DualScreenDisplayChangeWindow");

    unsafe {
        let hinstance =
            GetModuleHandleW(None).map_err(|e| PlatformError::call_with("GetModuleHandleW", e))?;

        let wc = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: hinstance.into(),
            lpszClassName: class_name,
            ..Default::default()
        };

        if RegisterClassW(&wc) == 0 {
            let error = windows::core::Error::from_win32();
            if error.code() != ERROR_CLASS_ALREADY_EXISTS.to_hresult() {
                return Err(PlatformError::call_with("RegisterClassW", error));
            }
        }

        // Never shown: created without WS_VISIBLE
        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class_name,
            w!(""),
            WS_OVERLAPPED,
            0,
            0,
            0,
            0,
            None,
            None,
            hinstance,
            None,
        );

        if hwnd.0 == 0 {
            return Err(PlatformError::call("CreateWindowExW"));
        }

        Ok(hwnd)
    }
}

fn run_message_loop() {
    let mut msg = MSG::default();
    loop {
        let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        // 0 is WM_QUIT, -1 is an error
        if result.0 == 0 || result.0 == -1 {
            break;
        }
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn listener_start_stop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut listener = DisplayChangeListener::start(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .expect("listener should start");

        assert!(listener.is_running());
        listener.stop().expect("listener should stop");
        assert!(!listener.is_running());
        // stopping twice is harmless
        listener.stop().expect("second stop is a no-op");
    }

    #[test]
    fn listener_can_restart() {
        let first = DisplayChangeListener::start(Arc::new(|| {})).expect("first start");
        drop(first);
        let second = DisplayChangeListener::start(Arc::new(|| {})).expect("second start");
        assert!(second.is_running());
    }
}
