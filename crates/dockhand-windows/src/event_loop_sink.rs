use dockhand_core::registry::taskbar_list::TaskbarListCommand;
use dockhand_core::{ShellEvent, ShellHookKind, log_debug};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DeregisterShellHookWindow, DestroyWindow, KillTimer,
    RegisterClassW, RegisterShellHookWindow, RegisterWindowMessageW, SetTimer, WM_DISPLAYCHANGE,
    WM_TIMER, WM_USER, WNDCLASSW, WS_EX_TOOLWINDOW,
};
use windows::core::w;

use super::{SHELL_MESSAGES, ShellMessages, emit};

const TICK_TIMER_ID: usize = 0x4448;

/// Creates the hidden window that receives shell notifications.
///
/// Must NOT be a message-only window (`HWND_MESSAGE` parent) because those
/// do not receive broadcast messages such as `TaskbarCreated` and
/// `WM_DISPLAYCHANGE`. `WS_EX_TOOLWINDOW` keeps it out of task lists.
pub(super) fn create(poll_interval_ms: Option<u32>) -> Result<HWND, String> {
    unsafe {
        SHELL_MESSAGES.with(|cell| {
            cell.set(ShellMessages {
                shell_hook: RegisterWindowMessageW(w!("SHELLHOOK")),
                taskbar_created: RegisterWindowMessageW(w!("TaskbarCreated")),
            })
        });

        let class_name = w!("DockhandEventSink");
        let wc = WNDCLASSW {
            lpfnWndProc: Some(event_sink_proc),
            lpszClassName: class_name,
            ..Default::default()
        };

        if RegisterClassW(&wc) == 0 {
            return Err("failed to register DockhandEventSink class".into());
        }

        // No WS_VISIBLE: window stays hidden.
        let hwnd = CreateWindowExW(
            WS_EX_TOOLWINDOW,
            class_name,
            w!("DockhandEventSink"),
            Default::default(),
            0,
            0,
            0,
            0,
            None,
            None,
            None,
            None,
        )
        .map_err(|e| format!("failed to create DockhandEventSink window: {e}"))?;

        if !RegisterShellHookWindow(hwnd).as_bool() {
            let _ = DestroyWindow(hwnd);
            return Err("RegisterShellHookWindow failed".into());
        }

        if let Some(interval) = poll_interval_ms {
            let _ = SetTimer(Some(hwnd), TICK_TIMER_ID, interval, None);
        }

        Ok(hwnd)
    }
}

pub(super) fn destroy(hwnd: HWND, polling: bool) {
    unsafe {
        if polling {
            let _ = KillTimer(Some(hwnd), TICK_TIMER_ID);
        }
        let _ = DeregisterShellHookWindow(hwnd);
        let _ = DestroyWindow(hwnd);
    }
}

/// Translates one sink message. Returns `None` for messages the sink
/// leaves to `DefWindowProcW`.
fn translate(msg: u32, wparam: usize, lparam: isize) -> Option<ShellEvent> {
    let ids = SHELL_MESSAGES.with(|cell| cell.get());
    if ids.shell_hook != 0 && msg == ids.shell_hook {
        return Some(ShellEvent::ShellHook {
            kind: ShellHookKind::from_code(wparam as u32),
            hwnd: lparam as usize,
        });
    }
    if ids.taskbar_created != 0 && msg == ids.taskbar_created {
        return Some(ShellEvent::TaskbarCreated);
    }
    match msg {
        WM_DISPLAYCHANGE => Some(ShellEvent::DisplayChanged),
        WM_TIMER if wparam == TICK_TIMER_ID => Some(ShellEvent::Tick),
        m if m >= WM_USER => TaskbarListCommand::from_message(m, wparam, lparam)
            .map(ShellEvent::TaskbarList),
        _ => None,
    }
}

/// WNDPROC for the event sink window.
unsafe extern "system" fn event_sink_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if let Some(event) = translate(msg, wparam.0, lparam.0) {
        if let ShellEvent::TaskbarList(command) = &event {
            log_debug!("TaskbarList {:?} for 0x{:X}", command.op, command.hwnd);
            emit(event);
            // Acknowledged whether or not anything acts on it.
            return LRESULT(1);
        }
        emit(event);
        if msg == WM_TIMER {
            return LRESULT(0);
        }
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}
