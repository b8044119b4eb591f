use dockhand_core::config::{self, Config};
use dockhand_core::{ShellResult, log_info};

use crate::dpi;

#[path = "daemon_bars.rs"]
mod daemon_bars;
#[path = "daemon_loop.rs"]
mod daemon_loop;
#[path = "daemon_threads.rs"]
mod daemon_threads;
#[path = "daemon_types.rs"]
mod daemon_types;

/// Runs the Dockhand daemon in the foreground until Ctrl+C.
///
/// The message pump runs on its own thread; the calling thread owns the
/// coordinator, the window registry and the full-screen monitor and
/// handles every notification in arrival order.
pub fn run() -> ShellResult<()> {
    dpi::enable_dpi_awareness();
    let config = config::load();
    dockhand_core::log::init(&config.logging);
    log_config(&config);

    eprintln!("Dockhand started. Press Ctrl+C to stop.");
    let result = daemon_loop::daemon_loop(config);
    log_info!("Daemon stopped");
    result
}

fn log_config(config: &Config) {
    log_info!("Daemon started (PID: {})", std::process::id());
    log_info!(
        "Config: {} dock bar(s), manage_work_area={}, full_screen={} ({} ms), close_timeout={} ms",
        config.dock_bars.len(),
        config.work_area.manage,
        config.full_screen.enabled,
        config.full_screen.poll_interval_ms,
        config.windows.close_timeout_ms
    );
}
