use dockhand_core::ShellEvent;
use dockhand_core::registry::icon::IconResolved;

/// Internal message type for the main daemon thread.
pub(super) enum DaemonMsg {
    /// A notification from the message pump.
    Event(ShellEvent),
    /// An icon lookup finished on the icon worker.
    Icon(IconResolved),
    /// Ctrl+C was pressed.
    Stop,
}
