use std::time::Duration;

/// Window style bits relevant to taskbar eligibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStyles {
    pub visible: bool,
    /// `WS_EX_TOOLWINDOW`
    pub tool_window: bool,
    /// `WS_EX_APPWINDOW`
    pub app_window: bool,
    /// `WS_EX_NOACTIVATE`
    pub no_activate: bool,
    /// `WS_EX_WINDOWEDGE`
    pub window_edge: bool,
}

/// Windows release family, as far as eligibility rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OsVersion {
    Legacy,
    Windows8,
    Windows10,
}

impl OsVersion {
    /// Maps an OS build number to its release family.
    pub fn from_build(build: u32) -> Self {
        match build {
            10240.. => Self::Windows10,
            9200.. => Self::Windows8,
            _ => Self::Legacy,
        }
    }

    /// Whether windows can be cloaked (present but not composited).
    pub fn supports_cloaking(self) -> bool {
        self >= Self::Windows10
    }

    /// Whether store apps run inside shell host windows.
    pub fn has_app_hosts(self) -> bool {
        self >= Self::Windows8
    }
}

/// Result of asking a window to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAck {
    /// The window processed the request within the timeout.
    Acknowledged,
    /// The window did not respond in time, or is hung.
    TimedOut,
}

/// The OS window manager as seen by the registry.
///
/// Queries on a window that no longer exists return defaults (empty
/// strings, `None`, `false`) rather than errors.
pub trait WindowSystem: Send {
    fn os_version(&self) -> OsVersion;

    /// Every top-level window, in z-order.
    fn top_level_windows(&self) -> Vec<usize>;

    fn foreground(&self) -> Option<usize>;

    fn is_window(&self, hwnd: usize) -> bool;

    fn styles(&self, hwnd: usize) -> WindowStyles;

    fn has_owner(&self, hwnd: usize) -> bool;

    fn is_cloaked(&self, hwnd: usize) -> bool;

    fn is_minimized(&self, hwnd: usize) -> bool;

    fn class_name(&self, hwnd: usize) -> String;

    fn title(&self, hwnd: usize) -> String;

    /// Full path of the executable that owns the window.
    fn exe_path(&self, hwnd: usize) -> Option<String>;

    /// Device name of the monitor the window is mostly on.
    fn monitor_name(&self, hwnd: usize) -> Option<String>;

    fn show(&self, hwnd: usize);

    fn activate(&self, hwnd: usize);

    fn minimize(&self, hwnd: usize);

    fn restore(&self, hwnd: usize);

    /// Sends a close request and waits at most `timeout` for it to be
    /// processed.
    fn close(&self, hwnd: usize, timeout: Duration) -> CloseAck;
}
