use dockhand_core::ShellEvent;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Accessibility::HWINEVENTHOOK;

use super::{EVENT_OBJECT_UNCLOAKED, emit};

/// `OBJID_WINDOW`: the event concerns the window itself, not a child object.
const OBJID_WINDOW: i32 = 0;

/// The WinEvent callback.
pub(super) unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    if event == EVENT_OBJECT_UNCLOAKED && id_object == OBJID_WINDOW && !hwnd.is_invalid() {
        emit(ShellEvent::Uncloaked {
            hwnd: hwnd.0 as usize,
        });
    }
}
