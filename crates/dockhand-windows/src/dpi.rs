use windows::Win32::Foundation::HWND;
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, GetDpiForWindow, SetProcessDpiAwarenessContext,
};

/// Declares this process as per-monitor DPI aware (V2).
///
/// Dock bar geometry is negotiated in physical pixels, so the OS must not
/// virtualise coordinates for us. Call once at start-up, before creating
/// any windows.
pub fn enable_dpi_awareness() {
    // SAFETY: SetProcessDpiAwarenessContext is safe to call once at startup.
    // If it fails (e.g. already set via manifest), we ignore the error.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// Effective DPI of the monitor a window is on, 96 if unknown.
pub fn dpi_for_window(hwnd: HWND) -> u32 {
    match unsafe { GetDpiForWindow(hwnd) } {
        0 => 96,
        dpi => dpi,
    }
}
