use std::time::Duration;

use dockhand_core::ShellResult;
use dockhand_core::fullscreen::{ForegroundProbe, WindowSnapshot};
use dockhand_core::registry::system::{CloseAck, OsVersion, WindowStyles, WindowSystem};
use dockhand_core::{log_debug, log_warn};
use windows::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

use crate::enumerate::top_level_windows;
use crate::monitor;
use crate::version;
use crate::window::Window;

fn foreground_window() -> Option<usize> {
    // SAFETY: GetForegroundWindow has no preconditions.
    let hwnd = unsafe { GetForegroundWindow() };
    (!hwnd.is_invalid()).then(|| hwnd.0 as usize)
}

/// Window queries and commands backed by user32.
pub struct Win32WindowSystem {
    version: OsVersion,
}

impl Win32WindowSystem {
    /// Detects the OS version once; it cannot change while we run.
    pub fn new() -> Self {
        let version = version::os_version();
        log_debug!("Detected OS family {version:?}");
        Self { version }
    }
}

impl Default for Win32WindowSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowSystem for Win32WindowSystem {
    fn os_version(&self) -> OsVersion {
        self.version
    }

    fn top_level_windows(&self) -> Vec<usize> {
        top_level_windows().unwrap_or_else(|e| {
            log_warn!("Window enumeration failed: {e}");
            Vec::new()
        })
    }

    fn foreground(&self) -> Option<usize> {
        foreground_window()
    }

    fn is_window(&self, hwnd: usize) -> bool {
        Window::from_raw(hwnd).exists()
    }

    fn styles(&self, hwnd: usize) -> WindowStyles {
        Window::from_raw(hwnd).styles()
    }

    fn has_owner(&self, hwnd: usize) -> bool {
        Window::from_raw(hwnd).has_owner()
    }

    fn is_cloaked(&self, hwnd: usize) -> bool {
        self.version.supports_cloaking() && Window::from_raw(hwnd).is_cloaked()
    }

    fn is_minimized(&self, hwnd: usize) -> bool {
        Window::from_raw(hwnd).is_minimized()
    }

    fn class_name(&self, hwnd: usize) -> String {
        Window::from_raw(hwnd).class()
    }

    fn title(&self, hwnd: usize) -> String {
        Window::from_raw(hwnd).title()
    }

    fn exe_path(&self, hwnd: usize) -> Option<String> {
        Window::from_raw(hwnd).exe_path()
    }

    fn monitor_name(&self, hwnd: usize) -> Option<String> {
        monitor::monitor_for_window(Window::from_raw(hwnd).hwnd())
    }

    fn show(&self, hwnd: usize) {
        Window::from_raw(hwnd).show();
    }

    fn activate(&self, hwnd: usize) {
        Window::from_raw(hwnd).set_foreground();
    }

    fn minimize(&self, hwnd: usize) {
        Window::from_raw(hwnd).minimize();
    }

    fn restore(&self, hwnd: usize) {
        Window::from_raw(hwnd).restore();
    }

    fn close(&self, hwnd: usize, timeout: Duration) -> CloseAck {
        Window::from_raw(hwnd).close(timeout)
    }
}

/// Foreground inspection for full-screen detection.
pub struct Win32ForegroundProbe;

impl ForegroundProbe for Win32ForegroundProbe {
    fn foreground(&self) -> Option<usize> {
        foreground_window()
    }

    fn inspect(&self, hwnd: usize) -> ShellResult<Option<WindowSnapshot>> {
        let window = Window::from_raw(hwnd);
        if !window.exists() {
            return Ok(None);
        }
        let rect = window
            .frame()
            .ok_or_else(|| format!("no frame for window 0x{hwnd:X}"))?;
        let monitor = monitor::monitor_of_window(window.hwnd())
            .ok_or_else(|| format!("no monitor for window 0x{hwnd:X}"))?;

        Ok(Some(WindowSnapshot {
            hwnd,
            rect,
            monitor: monitor.device_name,
            monitor_bounds: monitor.bounds,
            visible: window.is_visible(),
            iconic: window.is_minimized(),
            cloaked: window.is_cloaked(),
            own_process: window.is_own(),
            class_name: window.class(),
        }))
    }
}
