use serde::Serialize;

use crate::Rect;

/// A connected display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Monitor {
    /// OS device name (e.g. `\\.\DISPLAY1`). Stable across topology
    /// changes, unlike monitor handles.
    pub device_name: String,
    /// Full monitor rectangle in physical pixels.
    pub bounds: Rect,
    /// Work area as currently reported by the OS.
    pub work_area: Rect,
    /// Effective DPI divided by 96.
    pub dpi_scale: f64,
    pub primary: bool,
}

/// Source of the current monitor layout.
///
/// Implementations may cache the layout; callers invalidate the cache
/// explicitly when the OS reports a display change.
pub trait ScreenTopology: Send + Sync {
    /// Returns every monitor in enumeration order.
    fn monitors(&self) -> Vec<Monitor>;

    /// Drops any cached layout so the next query re-enumerates.
    fn invalidate(&self);

    /// Looks up a monitor by device name.
    fn monitor(&self, device_name: &str) -> Option<Monitor> {
        self.monitors()
            .into_iter()
            .find(|m| m.device_name == device_name)
    }

    /// Returns the primary monitor, or the first one if none is flagged.
    fn primary(&self) -> Option<Monitor> {
        let monitors = self.monitors();
        monitors
            .iter()
            .find(|m| m.primary)
            .or_else(|| monitors.first())
            .cloned()
    }
}
