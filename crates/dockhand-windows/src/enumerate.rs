use dockhand_core::ShellResult;
use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::EnumWindows;
use windows::core::BOOL;

/// Lists every top-level window handle, in z-order.
///
/// No filtering happens here; the registry applies its own eligibility
/// rules to each handle.
pub fn top_level_windows() -> ShellResult<Vec<usize>> {
    let mut handles: Vec<usize> = Vec::new();

    // SAFETY: EnumWindows calls our callback for each top-level window.
    // We pass a pointer to our Vec as LPARAM; EnumWindows runs
    // synchronously, so the Vec outlives the call.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut handles as *mut _ as isize),
        )?;
    }

    Ok(handles)
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is a pointer to our Vec<usize>, cast from top_level_windows().
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<usize>) };
    handles.push(hwnd.0 as usize);
    BOOL(1)
}
