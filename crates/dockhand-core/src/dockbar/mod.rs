//! Dock bars: windows that reserve a strip of screen space along one
//! monitor edge, negotiated with the OS shell.

mod coordinator;
pub mod placement;
mod policy;
mod shell;

use serde::{Deserialize, Serialize};

use crate::Rect;

pub use coordinator::{AppBarContext, CALLBACK_BASE, DockBarChange, DockBarCoordinator};
pub use policy::{DockBarPolicies, MessagePolicy, PlacementEffect, SizePolicy};
pub use shell::{AppBarShell, NoNotificationArea, NotificationArea};

/// Screen edge a dock bar attaches to. Discriminants match `ABE_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left = 0,
    Top = 1,
    Right = 2,
    Bottom = 3,
}

impl Edge {
    /// Returns `true` for top and bottom bars, which span the monitor's width.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// The `ABE_*` value passed to the OS.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Registration lifecycle of a dock bar with the OS shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegistrationState {
    Unregistered,
    Registering,
    Registered,
    Closing,
}

/// A toolbar-like window that reserves space along a monitor edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DockBar {
    pub hwnd: usize,
    /// Device name of the monitor the bar lives on.
    pub monitor: String,
    pub edge: Edge,
    /// Requested width in logical pixels. The thickness of left/right bars.
    pub width: i32,
    /// Requested height in logical pixels. The thickness of top/bottom bars.
    pub height: i32,
    /// Whether the bar sits on the physical screen edge and therefore
    /// counts against the OS work area.
    pub requires_screen_edge: bool,
    pub auto_hide: bool,
    pub state: RegistrationState,
    /// Message id the OS uses for this bar's callbacks, once registered.
    pub callback_id: Option<u32>,
    /// Last committed rectangle in physical pixels.
    pub rect: Option<Rect>,
    /// Rectangle as last applied to the window, in logical pixels.
    pub logical_rect: Option<Rect>,
    /// DPI scale cached when the bar was created or last saw a DPI change.
    pub dpi_scale: f64,
    /// Whether the bar dropped out of the topmost band for a full-screen app.
    pub yielded: bool,
}

impl DockBar {
    /// Creates an unregistered bar for a realized window.
    pub fn new(hwnd: usize, monitor: impl Into<String>, edge: Edge, width: i32, height: i32) -> Self {
        Self {
            hwnd,
            monitor: monitor.into(),
            edge,
            width,
            height,
            requires_screen_edge: true,
            auto_hide: false,
            state: RegistrationState::Unregistered,
            callback_id: None,
            rect: None,
            logical_rect: None,
            dpi_scale: 1.0,
            yielded: false,
        }
    }

    /// Whether the bar currently reserves space: registered and not auto-hidden.
    pub fn is_enabled(&self) -> bool {
        self.state == RegistrationState::Registered && !self.auto_hide
    }
}
