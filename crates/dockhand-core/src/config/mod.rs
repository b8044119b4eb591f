mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::dockbar::Edge;
use crate::log::LogConfig;

pub use loader::{config_dir, config_path, load, try_load};

/// Top-level configuration for Dockhand.
///
/// Loaded from `~/.config/dockhand/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File logging settings.
    pub logging: LogConfig,
    /// Whether Dockhand owns the OS work area.
    pub work_area: WorkAreaConfig,
    /// Full-screen application detection.
    pub full_screen: FullScreenConfig,
    /// Window registry behaviour.
    pub windows: WindowsConfig,
    /// Dock bars to create on start-up, in registration order.
    #[serde(rename = "dock_bar")]
    pub dock_bars: Vec<DockBarConfig>,
}

/// Work-area ownership settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkAreaConfig {
    /// Write the OS work area after every dock bar placement and restore
    /// full monitor bounds on exit. Only enable this when no other shell
    /// (such as Explorer's taskbar) is running.
    pub manage: bool,
}

/// Full-screen detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullScreenConfig {
    /// Whether dock bars yield to full-screen applications.
    pub enabled: bool,
    /// Foreground polling interval in milliseconds.
    pub poll_interval_ms: u32,
}

/// Window registry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowsConfig {
    /// How long a close request waits for the window to acknowledge
    /// before the entry is removed optimistically.
    pub close_timeout_ms: u32,
}

/// One dock bar to create at start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockBarConfig {
    /// Screen edge the bar attaches to.
    pub edge: Edge,
    /// Bar thickness in logical pixels.
    pub thickness: i32,
    /// Monitor index in enumeration order. `None` selects the primary monitor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<usize>,
    /// Whether the bar must sit on the physical screen edge. Only such
    /// bars are subtracted from the OS work area.
    pub requires_screen_edge: bool,
    /// Register the bar as auto-hide instead of reserving space.
    pub auto_hide: bool,
}

impl Default for FullScreenConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 100,
        }
    }
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            close_timeout_ms: 200,
        }
    }
}

impl Default for DockBarConfig {
    fn default() -> Self {
        Self {
            edge: Edge::Top,
            thickness: 32,
            monitor: None,
            requires_screen_edge: true,
            auto_hide: false,
        }
    }
}

impl Config {
    /// Clamps timing and size values to safe ranges.
    pub fn validate(&mut self) {
        self.full_screen.poll_interval_ms = self.full_screen.poll_interval_ms.clamp(16, 1000);
        self.windows.close_timeout_ms = self.windows.close_timeout_ms.clamp(50, 2000);
        for bar in &mut self.dock_bars {
            bar.thickness = bar.thickness.clamp(1, 500);
        }
    }
}
