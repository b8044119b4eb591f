#[cfg(windows)]
pub fn execute() {
    if let Err(e) = dockhand_windows::daemon::run() {
        eprintln!("Daemon error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
pub fn execute() {
    super::windows_only("run");
}
