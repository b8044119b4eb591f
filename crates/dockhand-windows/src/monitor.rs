use std::mem;
use std::sync::{Mutex, PoisonError};

use dockhand_core::{Monitor, Rect, ScreenTopology, ShellResult, log_debug, log_warn};
use windows::Win32::Foundation::{HWND, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITOR_DEFAULTTONEAREST, MONITORINFO,
    MONITORINFOEXW, MonitorFromWindow,
};
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};
use windows::core::BOOL;

/// `MONITORINFOF_PRIMARY`
const PRIMARY_FLAG: u32 = 1;

/// Enumerates every connected monitor in OS order.
pub fn enumerate_monitors() -> ShellResult<Vec<Monitor>> {
    let mut monitors: Vec<Monitor> = Vec::new();

    // SAFETY: EnumDisplayMonitors calls our callback synchronously; the
    // Vec outlives the call.
    let ok = unsafe {
        EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut monitors as *mut _ as isize),
        )
    };
    if !ok.as_bool() {
        return Err("EnumDisplayMonitors failed".into());
    }
    if monitors.is_empty() {
        return Err("no monitors found".into());
    }
    Ok(monitors)
}

unsafe extern "system" fn enum_monitor_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    // SAFETY: lparam is the Vec<Monitor> pointer from enumerate_monitors().
    let monitors = unsafe { &mut *(lparam.0 as *mut Vec<Monitor>) };
    if let Some(monitor) = monitor_info(hmonitor) {
        monitors.push(monitor);
    }
    BOOL(1)
}

fn monitor_info(hmonitor: HMONITOR) -> Option<Monitor> {
    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;

    // SAFETY: cbSize announces the extended struct, so GetMonitorInfoW
    // also fills szDevice.
    let ok = unsafe { GetMonitorInfoW(hmonitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO) };
    if !ok.as_bool() {
        return None;
    }

    let len = info
        .szDevice
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(info.szDevice.len());
    let bounds = info.monitorInfo.rcMonitor;
    let work = info.monitorInfo.rcWork;

    Some(Monitor {
        device_name: String::from_utf16_lossy(&info.szDevice[..len]),
        bounds: Rect::from_edges(bounds.left, bounds.top, bounds.right, bounds.bottom),
        work_area: Rect::from_edges(work.left, work.top, work.right, work.bottom),
        dpi_scale: dpi_for_monitor(hmonitor) as f64 / 96.0,
        primary: info.monitorInfo.dwFlags & PRIMARY_FLAG != 0,
    })
}

fn dpi_for_monitor(hmonitor: HMONITOR) -> u32 {
    let (mut x, mut y) = (96u32, 96u32);
    // SAFETY: GetDpiForMonitor writes two u32 values we own.
    match unsafe { GetDpiForMonitor(hmonitor, MDT_EFFECTIVE_DPI, &mut x, &mut y) } {
        Ok(()) => x,
        Err(_) => 96,
    }
}

/// Device name of the monitor containing most of `hwnd`.
pub fn monitor_for_window(hwnd: HWND) -> Option<String> {
    // SAFETY: MonitorFromWindow never fails with MONITOR_DEFAULTTONEAREST.
    let hmonitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    monitor_info(hmonitor).map(|m| m.device_name)
}

/// Full monitor entry for the monitor containing `hwnd`.
pub fn monitor_of_window(hwnd: HWND) -> Option<Monitor> {
    let hmonitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    monitor_info(hmonitor)
}

/// The monitor layout, enumerated on first use and kept until
/// [`invalidate`](ScreenTopology::invalidate) is called.
#[derive(Default)]
pub struct DisplayTopology {
    cache: Mutex<Option<Vec<Monitor>>>,
}

impl DisplayTopology {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScreenTopology for DisplayTopology {
    fn monitors(&self) -> Vec<Monitor> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(monitors) = cache.as_ref() {
            return monitors.clone();
        }
        match enumerate_monitors() {
            Ok(monitors) => {
                log_debug!("Enumerated {} monitors", monitors.len());
                *cache = Some(monitors.clone());
                monitors
            }
            Err(e) => {
                // Not cached, so the next query tries again.
                log_warn!("Monitor enumeration failed: {e}");
                Vec::new()
            }
        }
    }

    fn invalidate(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
