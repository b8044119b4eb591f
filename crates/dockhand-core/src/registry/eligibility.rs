use super::system::{OsVersion, WindowStyles, WindowSystem};

/// Shell classes that host store apps. They are only real task entries
/// when they carry a standard window edge.
pub const APP_HOST_CLASSES: [&str; 2] = ["ApplicationFrameWindow", "Windows.UI.Core.CoreWindow"];

/// Everything eligibility depends on, gathered in one place.
#[derive(Debug, Clone, Default)]
pub struct EligibilityInput {
    pub styles: WindowStyles,
    pub has_owner: bool,
    pub cloaked: bool,
    pub class_name: String,
}

impl EligibilityInput {
    pub fn read(system: &impl WindowSystem, hwnd: usize) -> Self {
        Self {
            styles: system.styles(hwnd),
            has_owner: system.has_owner(hwnd),
            cloaked: system.is_cloaked(hwnd),
            class_name: system.class_name(hwnd),
        }
    }

    /// Whether the window is a store-app host frame.
    pub fn is_app_host(&self) -> bool {
        APP_HOST_CLASSES.contains(&self.class_name.as_str())
    }
}

/// Decides whether a window belongs in a task list.
pub fn is_taskbar_eligible(input: &EligibilityInput, version: OsVersion) -> bool {
    let s = input.styles;
    let generic = s.visible
        && !s.tool_window
        && (!input.has_owner || s.app_window)
        && (!s.no_activate || s.app_window);
    if !generic {
        return false;
    }
    if version.has_app_hosts() && input.is_app_host() && !s.window_edge {
        return false;
    }
    !(version.supports_cloaking() && input.cloaked)
}
