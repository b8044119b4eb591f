//! Dock bar negotiation through `SHAppBarMessage`.

use std::ffi::c_void;
use std::mem;

use dockhand_core::dockbar::{AppBarShell, Edge};
use dockhand_core::{Rect, log_debug, log_warn};
use windows::Win32::Foundation::{HWND, LPARAM, RECT};
use windows::Win32::UI::Shell::{
    ABM_GETSTATE, ABM_NEW, ABM_QUERYPOS, ABM_REMOVE, ABM_SETAUTOHIDEBAR, ABM_SETPOS, APPBARDATA,
    SHAppBarMessage,
};
use windows::Win32::UI::WindowsAndMessaging::{
    HWND_NOTOPMOST, HWND_TOPMOST, SPI_SETWORKAREA, SPIF_SENDCHANGE, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW, SetWindowPos, SystemParametersInfoW,
};

/// `ABS_AUTOHIDE` bit of the `ABM_GETSTATE` result.
const ABS_AUTOHIDE: usize = 0x1;

/// The real OS shell.
pub struct Win32AppBarShell;

impl Win32AppBarShell {
    fn message(&self, message: u32, data: &mut APPBARDATA) -> usize {
        data.cbSize = mem::size_of::<APPBARDATA>() as u32;
        // SAFETY: `data` is a fully initialised APPBARDATA with cbSize set.
        unsafe { SHAppBarMessage(message, data) }
    }
}

fn hwnd(raw: usize) -> HWND {
    HWND(raw as *mut c_void)
}

fn to_win32(rect: Rect) -> RECT {
    RECT {
        left: rect.x,
        top: rect.y,
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

fn from_win32(rc: RECT) -> Rect {
    Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom)
}

fn data(raw: usize, edge: Edge, rect: Rect) -> APPBARDATA {
    APPBARDATA {
        hWnd: hwnd(raw),
        uEdge: edge.code(),
        rc: to_win32(rect),
        ..Default::default()
    }
}

impl AppBarShell for Win32AppBarShell {
    fn register(&self, raw: usize, callback_id: u32) -> bool {
        let mut abd = APPBARDATA {
            hWnd: hwnd(raw),
            uCallbackMessage: callback_id,
            ..Default::default()
        };
        self.message(ABM_NEW, &mut abd) != 0
    }

    fn unregister(&self, raw: usize) -> bool {
        let mut abd = APPBARDATA {
            hWnd: hwnd(raw),
            ..Default::default()
        };
        self.message(ABM_REMOVE, &mut abd) != 0
    }

    fn query_position(&self, raw: usize, edge: Edge, proposed: Rect) -> Option<Rect> {
        let mut abd = data(raw, edge, proposed);
        self.message(ABM_QUERYPOS, &mut abd);
        Some(from_win32(abd.rc))
    }

    fn commit_position(&self, raw: usize, edge: Edge, proposed: Rect) -> Option<Rect> {
        let mut abd = data(raw, edge, proposed);
        self.message(ABM_SETPOS, &mut abd);
        Some(from_win32(abd.rc))
    }

    fn auto_hide_state(&self) -> bool {
        let mut abd = APPBARDATA::default();
        self.message(ABM_GETSTATE, &mut abd) & ABS_AUTOHIDE != 0
    }

    fn set_auto_hide(&self, raw: usize, edge: Edge, enabled: bool) -> bool {
        let mut abd = APPBARDATA {
            hWnd: hwnd(raw),
            uEdge: edge.code(),
            lParam: LPARAM(enabled as isize),
            ..Default::default()
        };
        // Fails when another bar already auto-hides on that edge.
        self.message(ABM_SETAUTOHIDEBAR, &mut abd) != 0
    }

    fn set_work_area(&self, area: Rect) -> bool {
        let mut rc = to_win32(area);
        // SAFETY: SPI_SETWORKAREA reads a RECT from the pointer we pass.
        let result = unsafe {
            SystemParametersInfoW(
                SPI_SETWORKAREA,
                0,
                Some(&mut rc as *mut RECT as *mut c_void),
                SPIF_SENDCHANGE,
            )
        };
        match result {
            Ok(()) => {
                log_debug!("Work area set to {area:?}");
                true
            }
            Err(e) => {
                log_warn!("SPI_SETWORKAREA failed: {e}");
                false
            }
        }
    }

    fn move_bar(&self, raw: usize, rect: Rect) {
        // SAFETY: SetWindowPos is safe with any HWND; it fails for
        // destroyed windows and we ignore that.
        let result = unsafe {
            SetWindowPos(
                hwnd(raw),
                None,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOACTIVATE | SWP_NOZORDER | SWP_SHOWWINDOW,
            )
        };
        if let Err(e) = result {
            log_debug!("Moving dock bar 0x{raw:X} failed: {e}");
        }
    }

    fn set_topmost(&self, raw: usize, topmost: bool) {
        let after = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
        let result = unsafe {
            SetWindowPos(
                hwnd(raw),
                Some(after),
                0,
                0,
                0,
                0,
                SWP_NOACTIVATE | SWP_NOMOVE | SWP_NOSIZE,
            )
        };
        if let Err(e) = result {
            log_debug!("Changing z-order of 0x{raw:X} failed: {e}");
        }
    }
}
