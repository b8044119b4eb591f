//! Dock bar windows.
//!
//! Bars are plain top-level popups created on the message-pump thread so
//! their window procedure can forward shell callbacks through the same
//! channel as every other notification. The procedure never touches the
//! coordinator directly.

use std::mem;
use std::sync::Once;

use dockhand_core::dockbar::CALLBACK_BASE;
use dockhand_core::{AppBarNotify, Rect, ShellEvent};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{BLACK_BRUSH, GetStockObject, HBRUSH};
use windows::Win32::UI::Shell::{ABM_ACTIVATE, ABM_WINDOWPOSCHANGED, APPBARDATA, SHAppBarMessage};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, RegisterClassW, WM_ACTIVATE, WM_APP, WM_CLOSE,
    WM_DPICHANGED, WM_USER, WM_WINDOWPOSCHANGED, WNDCLASSW, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
    WS_EX_TOPMOST, WS_POPUP,
};
use windows::core::{PCWSTR, w};

use crate::event_loop::emit;

/// Number of callback ids reserved for dock bars.
const CALLBACK_RANGE: u32 = 0x100;

static REGISTER_CLASS: Once = Once::new();
const CLASS_NAME: PCWSTR = w!("DockhandBar");

/// A dock bar window to create at start-up.
#[derive(Debug, Clone)]
pub struct BarWindow {
    pub title: String,
    /// Initial rectangle in physical pixels. The coordinator moves the
    /// window as soon as the bar is placed.
    pub bounds: Rect,
}

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(bar_wnd_proc),
            lpszClassName: CLASS_NAME,
            // SAFETY: stock objects are never freed.
            hbrBackground: HBRUSH(unsafe { GetStockObject(BLACK_BRUSH) }.0),
            ..Default::default()
        };
        unsafe {
            RegisterClassW(&wc);
        }
    });
}

/// Creates a hidden bar window. Must run on the message-pump thread.
pub(crate) fn create(window: &BarWindow) -> windows::core::Result<HWND> {
    ensure_class_registered();

    let title: Vec<u16> = window.title.encode_utf16().chain(std::iter::once(0)).collect();
    // Not WS_VISIBLE: the first placement shows the window.
    unsafe {
        CreateWindowExW(
            WS_EX_TOOLWINDOW | WS_EX_TOPMOST | WS_EX_NOACTIVATE,
            CLASS_NAME,
            PCWSTR(title.as_ptr()),
            WS_POPUP,
            window.bounds.x,
            window.bounds.y,
            window.bounds.width,
            window.bounds.height,
            None,
            None,
            None,
            None,
        )
    }
}

pub(crate) fn destroy(hwnd: HWND) {
    unsafe {
        let _ = DestroyWindow(hwnd);
    }
}

/// Tells the shell about activation and z-order changes of a bar, as
/// every registered bar must.
fn notify_shell(hwnd: HWND, message: u32) {
    let mut abd = APPBARDATA {
        cbSize: mem::size_of::<APPBARDATA>() as u32,
        hWnd: hwnd,
        ..Default::default()
    };
    unsafe {
        SHAppBarMessage(message, &mut abd);
    }
}

/// Decodes a bar message into an event for the dispatch thread.
fn translate(hwnd: usize, msg: u32, wparam: usize, lparam: isize) -> Option<ShellEvent> {
    match msg {
        m if (CALLBACK_BASE..CALLBACK_BASE + CALLBACK_RANGE).contains(&m) => {
            Some(ShellEvent::AppBarCallback {
                callback_id: m,
                notify: AppBarNotify::from_raw(wparam, lparam),
            })
        }
        WM_DPICHANGED => Some(ShellEvent::DpiChanged {
            hwnd,
            // LOWORD is the X-axis DPI; both axes are always equal.
            dpi: (wparam & 0xFFFF) as u32,
        }),
        m if (WM_USER..WM_APP).contains(&m) => Some(ShellEvent::Message {
            hwnd,
            msg: m,
            wparam,
            lparam,
        }),
        _ => None,
    }
}

unsafe extern "system" fn bar_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_ACTIVATE => notify_shell(hwnd, ABM_ACTIVATE),
        WM_WINDOWPOSCHANGED => notify_shell(hwnd, ABM_WINDOWPOSCHANGED),
        // Bars close only when the daemon shuts down.
        WM_CLOSE => return LRESULT(0),
        _ => {}
    }
    if let Some(event) = translate(hwnd.0 as usize, msg, wparam.0, lparam.0) {
        emit(event);
        return LRESULT(0);
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}
