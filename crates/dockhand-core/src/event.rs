use std::fmt;

use crate::registry::taskbar_list::TaskbarListCommand;

/// Bit Windows sets on shell-hook codes to mark a variant of a base
/// notification (flash is redraw with this bit, rude activation is
/// activation with it).
const HSHELL_HIGHBIT: u32 = 0x8000;

/// Kind of a shell-hook notification (`HSHELL_*` codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellHookKind {
    WindowCreated,
    WindowDestroyed,
    ActivateShellWindow,
    WindowActivated,
    /// Activation of a full-screen ("rude") window. Treated like
    /// `WindowActivated`.
    RudeAppActivated,
    GetMinRect,
    Redraw,
    Flash,
    TaskMan,
    Language,
    SysMenu,
    EndTask,
    AccessibilityState,
    AppCommand,
    WindowReplaced,
    WindowReplacing,
    MonitorChanged,
    Unknown(u32),
}

impl ShellHookKind {
    /// Decodes the `wParam` of a `SHELLHOOK` message.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::WindowCreated,
            2 => Self::WindowDestroyed,
            3 => Self::ActivateShellWindow,
            4 => Self::WindowActivated,
            c if c == 4 | HSHELL_HIGHBIT => Self::RudeAppActivated,
            5 => Self::GetMinRect,
            6 => Self::Redraw,
            c if c == 6 | HSHELL_HIGHBIT => Self::Flash,
            7 => Self::TaskMan,
            8 => Self::Language,
            9 => Self::SysMenu,
            10 => Self::EndTask,
            11 => Self::AccessibilityState,
            12 => Self::AppCommand,
            13 => Self::WindowReplaced,
            14 => Self::WindowReplacing,
            16 => Self::MonitorChanged,
            other => Self::Unknown(other),
        }
    }
}

/// A dock bar callback sent by the OS shell (`ABN_*` codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppBarNotify {
    /// Auto-hide or always-on-top state of the taskbar changed.
    StateChange,
    /// Something changed that may affect the bar's size or position.
    PosChanged,
    /// A full-screen application opened or closed.
    FullScreenApp { opening: bool },
    /// The user is cascading or tiling windows.
    WindowArrange { starting: bool },
    Unknown(u32),
}

impl AppBarNotify {
    /// Decodes the `wParam`/`lParam` pair of a dock bar callback message.
    pub fn from_raw(wparam: usize, lparam: isize) -> Self {
        match wparam {
            0 => Self::StateChange,
            1 => Self::PosChanged,
            2 => Self::FullScreenApp {
                opening: lparam != 0,
            },
            3 => Self::WindowArrange {
                starting: lparam != 0,
            },
            other => Self::Unknown(other as u32),
        }
    }
}

/// A notification forwarded by the native message pump.
///
/// The pump translates raw window messages into these variants and
/// forwards them, in arrival order, to a single dispatch thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    /// A shell-hook notification about a top-level window.
    ShellHook { kind: ShellHookKind, hwnd: usize },

    /// A dock bar callback, routed by the id handed out at registration.
    AppBarCallback { callback_id: u32, notify: AppBarNotify },

    /// The OS shell (re)started and every dock bar must re-register.
    TaskbarCreated,

    /// A taskbar-list command addressed to the shell.
    TaskbarList(TaskbarListCommand),

    /// A window stopped being cloaked.
    Uncloaked { hwnd: usize },

    /// A dock bar window moved to a monitor with a different DPI.
    DpiChanged { hwnd: usize, dpi: u32 },

    /// Monitors were added, removed, or changed resolution.
    DisplayChanged,

    /// Full-screen polling timer fired.
    Tick,

    /// Any other message received by a dock bar window.
    Message {
        hwnd: usize,
        msg: u32,
        wparam: usize,
        lparam: isize,
    },
}

impl fmt::Display for ShellEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShellHook { kind, hwnd } => write!(f, "ShellHook    {kind:?} 0x{hwnd:X}"),
            Self::AppBarCallback {
                callback_id,
                notify,
            } => write!(f, "AppBar       {notify:?} (id 0x{callback_id:X})"),
            Self::TaskbarCreated => write!(f, "TaskbarCreated"),
            Self::TaskbarList(cmd) => write!(f, "TaskbarList  {cmd:?}"),
            Self::Uncloaked { hwnd } => write!(f, "Uncloaked    0x{hwnd:X}"),
            Self::DpiChanged { hwnd, dpi } => write!(f, "DpiChanged   0x{hwnd:X} {dpi} dpi"),
            Self::DisplayChanged => write!(f, "DisplayChanged"),
            Self::Tick => write!(f, "Tick"),
            Self::Message {
                hwnd,
                msg,
                wparam,
                lparam,
            } => write!(
                f,
                "Message      0x{hwnd:X} msg=0x{msg:04X} wparam={wparam} lparam={lparam}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_hook_codes_decode_high_bit_variants() {
        assert_eq!(ShellHookKind::from_code(4), ShellHookKind::WindowActivated);
        assert_eq!(
            ShellHookKind::from_code(0x8004),
            ShellHookKind::RudeAppActivated
        );
        assert_eq!(ShellHookKind::from_code(6), ShellHookKind::Redraw);
        assert_eq!(ShellHookKind::from_code(0x8006), ShellHookKind::Flash);
    }

    #[test]
    fn shell_hook_unknown_code_is_preserved() {
        assert_eq!(ShellHookKind::from_code(15), ShellHookKind::Unknown(15));
        assert_eq!(ShellHookKind::from_code(16), ShellHookKind::MonitorChanged);
    }

    #[test]
    fn appbar_notify_reads_flag_from_lparam() {
        assert_eq!(
            AppBarNotify::from_raw(2, 1),
            AppBarNotify::FullScreenApp { opening: true }
        );
        assert_eq!(
            AppBarNotify::from_raw(2, 0),
            AppBarNotify::FullScreenApp { opening: false }
        );
        assert_eq!(AppBarNotify::from_raw(1, 0), AppBarNotify::PosChanged);
        assert_eq!(AppBarNotify::from_raw(9, 0), AppBarNotify::Unknown(9));
    }

    #[test]
    fn display_formats_handles_in_hex() {
        let event = ShellEvent::ShellHook {
            kind: ShellHookKind::WindowCreated,
            hwnd: 0x1A2B,
        };

        assert_eq!(event.to_string(), "ShellHook    WindowCreated 0x1A2B");
    }
}
