//! Decoding of taskbar-list commands (`ITaskbarList` forwarded as
//! `WM_USER + n` messages addressed to the taskbar window).
//!
//! Only progress commands are acted on. Tab and thumbnail commands are
//! decoded so they can be acknowledged, then dropped.

use super::ProgressState;

const WM_USER: u32 = 0x0400;

/// Highest progress value; the completed value of a progress bar.
pub const PROGRESS_MAX: u32 = 65534;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarListOp {
    ActivateTab,
    MarkFullscreenWindow { fullscreen: bool },
    SetProgressValue { value: u32 },
    SetProgressState { state: ProgressState },
    RegisterTab,
    UnregisterTab,
    SetTabOrder,
    SetTabActive,
    ThumbBarAddButtons,
    ThumbBarUpdateButtons,
    ThumbBarSetImageList,
    SetOverlayIcon,
    SetThumbnailTooltip,
    SetThumbnailClip,
    SetTabProperties,
}

/// A taskbar-list command targeting one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskbarListCommand {
    pub hwnd: usize,
    pub op: TaskbarListOp,
}

impl TaskbarListCommand {
    /// Decodes a raw message. Returns `None` for messages that are not
    /// taskbar-list commands.
    pub fn from_message(msg: u32, wparam: usize, lparam: isize) -> Option<Self> {
        let op = match msg.checked_sub(WM_USER)? {
            50 => TaskbarListOp::ActivateTab,
            60 => TaskbarListOp::MarkFullscreenWindow {
                fullscreen: lparam != 0,
            },
            64 => TaskbarListOp::SetProgressValue {
                value: lparam.clamp(0, PROGRESS_MAX as isize) as u32,
            },
            65 => TaskbarListOp::SetProgressState {
                state: ProgressState::from_flags(lparam as u32),
            },
            67 => TaskbarListOp::RegisterTab,
            68 => TaskbarListOp::UnregisterTab,
            71 => TaskbarListOp::SetTabOrder,
            72 => TaskbarListOp::SetTabActive,
            75 => TaskbarListOp::ThumbBarAddButtons,
            76 => TaskbarListOp::ThumbBarUpdateButtons,
            77 => TaskbarListOp::ThumbBarSetImageList,
            79 => TaskbarListOp::SetOverlayIcon,
            80 => TaskbarListOp::SetThumbnailTooltip,
            81 => TaskbarListOp::SetThumbnailClip,
            87 => TaskbarListOp::SetTabProperties,
            _ => return None,
        };
        Some(Self { hwnd: wparam, op })
    }

    /// Whether the registry applies this command.
    pub fn is_progress(&self) -> bool {
        matches!(
            self.op,
            TaskbarListOp::SetProgressValue { .. } | TaskbarListOp::SetProgressState { .. }
        )
    }
}
