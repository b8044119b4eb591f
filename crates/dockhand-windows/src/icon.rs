//! Icon lookup for task entries.
//!
//! Runs on the icon worker thread, never on the message pump, because
//! `WM_GETICON` round-trips to the target window's thread.

use std::ffi::c_void;

use dockhand_core::registry::icon::{IconHandle, IconSource};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::Shell::ExtractIconExW;
use windows::Win32::UI::WindowsAndMessaging::{
    GCLP_HICON, GCLP_HICONSM, GetClassLongPtrW, HICON, SMTO_ABORTIFHUNG, SendMessageTimeoutW,
    WM_GETICON, WM_QUERYDRAGICON,
};
use windows::core::PCWSTR;

const ICON_SMALL: usize = 0;
const ICON_BIG: usize = 1;
const ICON_SMALL2: usize = 2;

/// How long a window may take to answer an icon query.
const QUERY_TIMEOUT_MS: u32 = 100;

/// Icon handles are returned as-is; extracted executable icons are owned
/// by whoever displays them.
pub struct Win32IconSource;

fn hwnd(raw: usize) -> HWND {
    HWND(raw as *mut c_void)
}

fn non_null(value: usize) -> Option<IconHandle> {
    (value != 0).then_some(IconHandle(value))
}

fn query(raw: usize, msg: u32, wparam: usize) -> Option<IconHandle> {
    let mut result = 0usize;
    // SAFETY: SendMessageTimeoutW writes the reply into `result`; hung
    // windows are skipped.
    let sent = unsafe {
        SendMessageTimeoutW(
            hwnd(raw),
            msg,
            WPARAM(wparam),
            LPARAM(0),
            SMTO_ABORTIFHUNG,
            QUERY_TIMEOUT_MS,
            Some(&mut result as *mut usize),
        )
    };
    if sent.0 == 0 {
        return None;
    }
    non_null(result)
}

impl IconSource for Win32IconSource {
    fn window_icon(&self, raw: usize) -> Option<IconHandle> {
        [ICON_SMALL2, ICON_SMALL, ICON_BIG]
            .into_iter()
            .find_map(|kind| query(raw, WM_GETICON, kind))
    }

    fn class_icon(&self, raw: usize) -> Option<IconHandle> {
        // SAFETY: GetClassLongPtrW returns 0 for missing values.
        unsafe {
            non_null(GetClassLongPtrW(hwnd(raw), GCLP_HICONSM))
                .or_else(|| non_null(GetClassLongPtrW(hwnd(raw), GCLP_HICON)))
        }
    }

    fn drag_icon(&self, raw: usize) -> Option<IconHandle> {
        query(raw, WM_QUERYDRAGICON, 0)
    }

    fn exe_icon(&self, exe_path: &str) -> Option<IconHandle> {
        let wide: Vec<u16> = exe_path.encode_utf16().chain(std::iter::once(0)).collect();
        let mut small = HICON::default();
        // SAFETY: ExtractIconExW writes at most one handle into `small`.
        let count = unsafe {
            ExtractIconExW(PCWSTR(wide.as_ptr()), 0, None, Some(&mut small as *mut HICON), 1)
        };
        if count == 0 || small.is_invalid() {
            return None;
        }
        Some(IconHandle(small.0 as usize))
    }
}
