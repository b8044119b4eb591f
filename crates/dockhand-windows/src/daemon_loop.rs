use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use dockhand_core::config::Config;
use dockhand_core::dockbar::{AppBarContext, DockBarPolicies, NoNotificationArea};
use dockhand_core::registry::WindowRegistry;
use dockhand_core::registry::icon::IconWorker;
use dockhand_core::registry::system::WindowSystem;
use dockhand_core::{
    DockBarCoordinator, FullScreenMonitor, ScreenTopology, ShellResult, ShellServices, log_debug,
    log_info, log_warn,
};

use crate::appbar::Win32AppBarShell;
use crate::ctrl_c;
use crate::event_loop::{self, EventLoopOptions};
use crate::icon::Win32IconSource;
use crate::monitor::DisplayTopology;
use crate::system::{Win32ForegroundProbe, Win32WindowSystem};

use super::daemon_bars;
use super::daemon_threads;
use super::daemon_types::DaemonMsg;

/// The inner daemon loop, separated so start-up logging always runs in `run()`.
pub(super) fn daemon_loop(config: Config) -> ShellResult<()> {
    let screens = Arc::new(DisplayTopology::new());
    let bars = daemon_bars::resolve(&config.dock_bars, &screens.monitors());

    let (tx, rx) = mpsc::channel::<DaemonMsg>();

    let (stop_tx, stop_rx) = mpsc::channel();
    ctrl_c::set_handler(stop_tx)?;
    daemon_threads::spawn_stop_bridge(stop_rx, tx.clone());

    // Start the message pump, which also owns the dock bar windows.
    let (event_tx, event_rx) = mpsc::channel();
    let event_loop = event_loop::start(
        event_tx,
        EventLoopOptions {
            poll_interval_ms: config
                .full_screen
                .enabled
                .then_some(config.full_screen.poll_interval_ms),
            bars: bars
                .iter()
                .enumerate()
                .map(|(i, bar)| bar.window(i))
                .collect(),
        },
    )?;
    let event_bridge = daemon_threads::spawn_event_bridge(event_rx, tx.clone());

    let coordinator = Arc::new(DockBarCoordinator::new(AppBarContext {
        shell: Box::new(Win32AppBarShell),
        notification_area: Box::new(NoNotificationArea),
        screens: screens.clone(),
        manage_work_area: config.work_area.manage,
    }));
    coordinator.subscribe(|change| log_debug!("Dock bar {change:?}"));

    for (bar, &hwnd) in bars.iter().zip(event_loop.bars()) {
        coordinator.add_bar(bar.dock_bar(hwnd), DockBarPolicies::default());
        let (width, height) = bar.size();
        if coordinator.register(hwnd, width, height, bar.config.edge).is_some()
            && bar.config.auto_hide
        {
            coordinator.set_auto_hide(hwnd, true);
        }
    }

    let icon_tx = tx.clone();
    let mut icon_worker = IconWorker::spawn(Box::new(Win32IconSource), move |resolved| {
        let _ = icon_tx.send(DaemonMsg::Icon(resolved));
    });
    let icon_sender = icon_worker.sender();

    let system = Win32WindowSystem::new();
    let supports_cloaking = system.os_version().supports_cloaking();
    let mut registry = WindowRegistry::new(
        system,
        Duration::from_millis(u64::from(config.windows.close_timeout_ms)),
    );
    registry.subscribe(|change| log_debug!("Registry {change:?}"));

    let full_screen = config
        .full_screen
        .enabled
        .then(|| FullScreenMonitor::new(Win32ForegroundProbe, supports_cloaking));

    let mut services = ShellServices::new(coordinator.clone(), registry, full_screen, move |request| {
        if let Some(sender) = &icon_sender {
            let _ = sender.send(request);
        }
    });
    services.start();
    log_info!(
        "Tracking {} windows, {} dock bar(s)",
        services.registry.len(),
        coordinator.bars().len()
    );

    // Main processing loop. Blocks until a message arrives.
    while let Ok(msg) = rx.recv() {
        match msg {
            DaemonMsg::Event(event) => services.handle(event),
            DaemonMsg::Icon(resolved) => services.apply_icon(resolved),
            DaemonMsg::Stop => break,
        }
    }

    // Bars must leave the shell before their windows are destroyed.
    coordinator.unregister_all();
    coordinator.restore_work_areas();
    event_loop.stop();
    drop(services);
    icon_worker.stop();
    drop(tx);
    if event_bridge.join().is_err() {
        log_warn!("Event bridge thread panicked");
    }

    Ok(())
}
