//! Ctrl+C signal handler using `SetConsoleCtrlHandler`.

use std::sync::OnceLock;
use std::sync::mpsc::Sender;

use dockhand_core::ShellResult;
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};

/// Global sender, written once by `set_handler`, read by the callback.
static SENDER: OnceLock<Sender<()>> = OnceLock::new();

/// Registers a Ctrl+C / Ctrl+Break handler that sends `()` on the given
/// channel. Can only be called once per process.
pub fn set_handler(tx: Sender<()>) -> ShellResult<()> {
    SENDER
        .set(tx)
        .map_err(|_| "Ctrl+C handler already registered")?;
    unsafe { SetConsoleCtrlHandler(Some(handler), true) }?;
    Ok(())
}

unsafe extern "system" fn handler(ctrl_type: u32) -> windows::core::BOOL {
    if (ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT)
        && let Some(tx) = SENDER.get()
    {
        let _ = tx.send(());
    }
    windows::core::BOOL(1)
}
