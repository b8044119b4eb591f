use std::ffi::c_void;
use std::mem;
use std::time::Duration;

use dockhand_core::Rect;
use dockhand_core::registry::system::{CloseAck, WindowStyles};
use windows::Win32::Foundation::{CloseHandle, HWND, LPARAM, RECT, WPARAM};
use windows::Win32::Graphics::Dwm::{DWMWA_CLOAKED, DWMWA_EXTENDED_FRAME_BOUNDS, DwmGetWindowAttribute};
use windows::Win32::System::ProcessStatus::K32GetModuleFileNameExW;
use windows::Win32::System::Threading::{
    GetCurrentProcessId, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_VM_READ,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GW_OWNER, GWL_EXSTYLE, GetWindow, GetWindowLongPtrW, GetWindowRect, GetWindowTextLengthW,
    GetWindowTextW, GetWindowThreadProcessId, IsIconic, IsWindow, IsWindowVisible,
    RealGetWindowClassW, SMTO_ABORTIFHUNG, SW_MINIMIZE, SW_RESTORE, SW_SHOW, SendMessageTimeoutW,
    SetForegroundWindow, ShowWindow, WM_CLOSE, WS_EX_APPWINDOW, WS_EX_NOACTIVATE,
    WS_EX_TOOLWINDOW, WS_EX_WINDOWEDGE,
};

/// A top-level window, wrapping a Win32 `HWND`.
///
/// `HWND` is an opaque handle. This struct holds it and queries the OS
/// lazily; every query on a destroyed window returns an empty default.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    /// Creates a `Window` from a raw handle value so callers do not need
    /// the `windows` crate.
    pub fn from_raw(handle: usize) -> Self {
        Self {
            hwnd: HWND(handle as *mut _),
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn raw(&self) -> usize {
        self.hwnd.0 as usize
    }

    pub fn exists(&self) -> bool {
        // SAFETY: IsWindow accepts any value and only reports validity.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    pub fn title(&self) -> String {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW read window text
        // into a buffer we own.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length <= 0 {
                return String::new();
            }
            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
        }
    }

    pub fn class(&self) -> String {
        // SAFETY: RealGetWindowClassW reads the class name. 256 is the
        // maximum class name length in Win32.
        unsafe {
            let mut buffer = [0u16; 256];
            let length = RealGetWindowClassW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..length as usize])
        }
    }

    pub fn is_visible(&self) -> bool {
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    pub fn is_minimized(&self) -> bool {
        unsafe { IsIconic(self.hwnd).as_bool() }
    }

    pub fn styles(&self) -> WindowStyles {
        // SAFETY: GetWindowLongPtrW reads the extended style bits.
        let ex = unsafe { GetWindowLongPtrW(self.hwnd, GWL_EXSTYLE) } as u32;
        let has = |bit: u32| ex & bit == bit;
        WindowStyles {
            visible: self.is_visible(),
            tool_window: has(WS_EX_TOOLWINDOW.0),
            app_window: has(WS_EX_APPWINDOW.0),
            no_activate: has(WS_EX_NOACTIVATE.0),
            window_edge: has(WS_EX_WINDOWEDGE.0),
        }
    }

    pub fn has_owner(&self) -> bool {
        unsafe { GetWindow(self.hwnd, GW_OWNER) }.is_ok_and(|owner| !owner.is_invalid())
    }

    /// Whether DWM is withholding the window from composition.
    pub fn is_cloaked(&self) -> bool {
        let mut cloaked: u32 = 0;
        // SAFETY: DWMWA_CLOAKED writes a u32 into our buffer.
        let result = unsafe {
            DwmGetWindowAttribute(
                self.hwnd,
                DWMWA_CLOAKED,
                &mut cloaked as *mut u32 as *mut c_void,
                mem::size_of::<u32>() as u32,
            )
        };
        result.is_ok() && cloaked != 0
    }

    /// Visible frame bounds, excluding the invisible resize borders.
    pub fn frame(&self) -> Option<Rect> {
        let mut frame = RECT::default();
        // SAFETY: DWMWA_EXTENDED_FRAME_BOUNDS writes a RECT into our buffer.
        let dwm = unsafe {
            DwmGetWindowAttribute(
                self.hwnd,
                DWMWA_EXTENDED_FRAME_BOUNDS,
                &mut frame as *mut RECT as *mut c_void,
                mem::size_of::<RECT>() as u32,
            )
        };
        if dwm.is_err() {
            unsafe { GetWindowRect(self.hwnd, &mut frame) }.ok()?;
        }
        Some(Rect::from_edges(frame.left, frame.top, frame.right, frame.bottom))
    }

    pub fn process_id(&self) -> u32 {
        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(self.hwnd, Some(&mut pid)) };
        pid
    }

    /// Whether the window belongs to this process.
    pub fn is_own(&self) -> bool {
        self.process_id() == unsafe { GetCurrentProcessId() }
    }

    /// Full path of the owning executable.
    pub fn exe_path(&self) -> Option<String> {
        let pid = self.process_id();
        if pid == 0 {
            return None;
        }
        unsafe {
            let process =
                OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION | PROCESS_VM_READ, false, pid).ok()?;
            let mut buffer = [0u16; 1024];
            let len = K32GetModuleFileNameExW(Some(process), None, &mut buffer);
            let _ = CloseHandle(process);
            if len == 0 {
                return None;
            }
            Some(String::from_utf16_lossy(&buffer[..len as usize]))
        }
    }

    pub fn show(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOW);
        }
    }

    pub fn set_foreground(&self) {
        unsafe {
            let _ = SetForegroundWindow(self.hwnd);
        }
    }

    pub fn minimize(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_MINIMIZE);
        }
    }

    pub fn restore(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_RESTORE);
        }
    }

    /// Posts `WM_CLOSE` and waits up to `timeout` for it to be handled.
    ///
    /// Hung windows are given up on immediately (`SMTO_ABORTIFHUNG`).
    pub fn close(&self, timeout: Duration) -> CloseAck {
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        let mut result = 0usize;
        // SAFETY: SendMessageTimeoutW with a valid out-pointer; the call
        // returns zero on timeout or failure.
        let sent = unsafe {
            SendMessageTimeoutW(
                self.hwnd,
                WM_CLOSE,
                WPARAM(0),
                LPARAM(0),
                SMTO_ABORTIFHUNG,
                millis,
                Some(&mut result as *mut usize),
            )
        };
        if sent.0 == 0 {
            CloseAck::TimedOut
        } else {
            CloseAck::Acknowledged
        }
    }
}
