pub mod config;
pub mod dockbar;
pub mod event;
pub mod fullscreen;
pub mod log;
pub mod rect;
pub mod registry;
pub mod screen;
pub mod services;
pub mod subscribers;

#[cfg(test)]
pub(crate) mod testing;

pub use dockbar::{DockBar, DockBarCoordinator, Edge, RegistrationState};
pub use event::{AppBarNotify, ShellEvent, ShellHookKind};
pub use fullscreen::{FullScreenApp, FullScreenMonitor};
pub use rect::Rect;
pub use registry::{TrackedWindow, WindowRegistry, WindowState};
pub use screen::{Monitor, ScreenTopology};
pub use services::ShellServices;

/// A boxed error type for fallible OS plumbing.
///
/// The notification handlers themselves never return errors; only
/// start-up and enumeration paths do.
pub type ShellResult<T> = Result<T, Box<dyn std::error::Error>>;
