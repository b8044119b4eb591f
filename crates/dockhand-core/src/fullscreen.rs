//! Detection of exclusive full-screen applications by polling the
//! foreground window.

use serde::Serialize;

use crate::{Rect, ShellResult, log_debug, log_info};

/// Window classes that cover a whole monitor without being applications.
pub const SHELL_CLASSES: [&str; 4] = [
    "Progman",
    "WorkerW",
    "Shell_TrayWnd",
    "Shell_SecondaryTrayWnd",
];

/// A window currently covering its whole monitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullScreenApp {
    pub hwnd: usize,
    /// Device name of the monitor it covers.
    pub monitor: String,
    pub rect: Rect,
}

/// What the probe observed about one window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub hwnd: usize,
    /// Window frame in physical pixels.
    pub rect: Rect,
    pub monitor: String,
    pub monitor_bounds: Rect,
    pub visible: bool,
    pub iconic: bool,
    pub cloaked: bool,
    /// Belongs to this process (dock bars, the event sink).
    pub own_process: bool,
    pub class_name: String,
}

/// OS queries the monitor needs.
pub trait ForegroundProbe: Send {
    /// The current foreground window, if any.
    fn foreground(&self) -> Option<usize>;

    /// Reads a window's state. `Ok(None)` means the window no longer exists.
    fn inspect(&self, hwnd: usize) -> ShellResult<Option<WindowSnapshot>>;
}

/// Returns the full-screen app a snapshot describes, if it qualifies.
pub fn qualify(window: &WindowSnapshot, supports_cloaking: bool) -> Option<FullScreenApp> {
    if !window.visible || window.iconic || window.own_process {
        return None;
    }
    if SHELL_CLASSES.contains(&window.class_name.as_str()) {
        return None;
    }
    if supports_cloaking && window.cloaked {
        return None;
    }
    if window.rect != window.monitor_bounds {
        return None;
    }
    Some(FullScreenApp {
        hwnd: window.hwnd,
        monitor: window.monitor.clone(),
        rect: window.rect,
    })
}

/// Tracks full-screen apps across polling ticks.
///
/// Only one window can be in the foreground, so each tick adds at most
/// one app. Previously tracked apps stay until their window vanishes,
/// stops covering its monitor, or moves to another monitor.
pub struct FullScreenMonitor<P: ForegroundProbe> {
    probe: P,
    supports_cloaking: bool,
    apps: Vec<FullScreenApp>,
}

impl<P: ForegroundProbe> FullScreenMonitor<P> {
    pub fn new(probe: P, supports_cloaking: bool) -> Self {
        Self {
            probe,
            supports_cloaking,
            apps: Vec::new(),
        }
    }

    /// Apps detected as of the last tick.
    pub fn apps(&self) -> &[FullScreenApp] {
        &self.apps
    }

    /// Runs one polling pass. Returns `true` if the tracked set changed.
    ///
    /// Errors are logged and swallowed so the polling timer keeps running.
    pub fn tick(&mut self) -> bool {
        match self.reconcile() {
            Ok(changed) => changed,
            Err(e) => {
                log_debug!("Full-screen poll failed: {e}");
                false
            }
        }
    }

    fn reconcile(&mut self) -> ShellResult<bool> {
        let foreground = self.probe.foreground();
        let current = match foreground {
            Some(hwnd) => self
                .probe
                .inspect(hwnd)?
                .and_then(|w| qualify(&w, self.supports_cloaking)),
            None => None,
        };

        let mut keep = Vec::with_capacity(self.apps.len());
        let mut skip_add = false;
        for app in &self.apps {
            let now = if Some(app.hwnd) == foreground {
                current.clone()
            } else {
                self.probe
                    .inspect(app.hwnd)?
                    .and_then(|w| qualify(&w, self.supports_cloaking))
            };
            match now {
                Some(now) if now.monitor == app.monitor => {
                    if Some(app.hwnd) == foreground {
                        skip_add = true;
                    }
                    keep.push(now);
                }
                _ => log_info!("Full-screen app 0x{:X} left {}", app.hwnd, app.monitor),
            }
        }

        let mut changed = keep.len() != self.apps.len();
        if !skip_add && let Some(app) = current {
            log_info!("Full-screen app 0x{:X} on {}", app.hwnd, app.monitor);
            keep.push(app);
            changed = true;
        }
        self.apps = keep;
        Ok(changed)
    }
}
