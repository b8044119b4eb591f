//! Win32 implementations of the Dockhand shell traits.
//!
//! Everything here is Windows-only; on other targets the crate is empty.
#![cfg(windows)]

/// `SHAppBarMessage` dock bar negotiation.
pub mod appbar;

/// Dock bar windows created on the message-pump thread.
pub mod bar_window;

/// Ctrl+C handling.
pub mod ctrl_c;

/// Daemon main loop.
pub mod daemon;

/// Per-monitor DPI helpers.
pub mod dpi;

/// Top-level window enumeration.
pub mod enumerate;

/// The native notification bridge (message pump + hidden sink window).
pub mod event_loop;

/// Icon lookup for task entries.
pub mod icon;

/// Monitor enumeration and the cached screen topology.
pub mod monitor;

/// Window manager and foreground probe used by the core.
pub mod system;

/// OS build detection.
pub mod version;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

pub use appbar::Win32AppBarShell;
pub use enumerate::top_level_windows;
pub use monitor::{DisplayTopology, enumerate_monitors};
pub use system::{Win32ForegroundProbe, Win32WindowSystem};
pub use window::Window;
