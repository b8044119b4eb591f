use crate::Rect;

use super::Edge;

/// The OS side of dock bar negotiation.
///
/// Every method is a synchronous round trip to the shell. Failures are
/// reported as `false`/`None`; the coordinator logs them and carries on.
pub trait AppBarShell: Send + Sync {
    /// Registers `hwnd` as a dock bar whose callbacks arrive as `callback_id`.
    fn register(&self, hwnd: usize, callback_id: u32) -> bool;

    /// Removes the registration and releases the reserved space.
    fn unregister(&self, hwnd: usize) -> bool;

    /// Asks the OS to adjust `proposed` so it does not collide with other
    /// bars. Only the coordinate facing `edge` is adjusted.
    fn query_position(&self, hwnd: usize, edge: Edge, proposed: Rect) -> Option<Rect>;

    /// Reserves `proposed`. The OS may still shrink it.
    fn commit_position(&self, hwnd: usize, edge: Edge, proposed: Rect) -> Option<Rect>;

    /// Whether the system taskbar is in auto-hide mode.
    fn auto_hide_state(&self) -> bool;

    /// Registers or clears `hwnd` as the auto-hide bar for `edge`.
    fn set_auto_hide(&self, hwnd: usize, edge: Edge, enabled: bool) -> bool;

    /// Writes the system work area for the monitor containing `area`.
    fn set_work_area(&self, area: Rect) -> bool;

    /// Moves the bar's window to `rect`.
    fn move_bar(&self, hwnd: usize, rect: Rect);

    /// Puts the bar's window in or out of the topmost z-order band.
    fn set_topmost(&self, hwnd: usize, topmost: bool);
}

/// Another consumer of the OS notification area (e.g. a tray-icon host).
///
/// Dock bar registration temporarily reassigns ownership of that shared
/// surface, so the host is suspended around each registration call.
pub trait NotificationArea: Send + Sync {
    fn suspend(&self);
    fn resume(&self);
}

/// Used when no tray host runs in this process.
pub struct NoNotificationArea;

impl NotificationArea for NoNotificationArea {
    fn suspend(&self) {}

    fn resume(&self) {}
}
