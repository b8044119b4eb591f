use std::sync::Arc;

use crate::dockbar::DockBarCoordinator;
use crate::event::ShellEvent;
use crate::fullscreen::{ForegroundProbe, FullScreenMonitor};
use crate::log_debug;
use crate::registry::WindowRegistry;
use crate::registry::icon::{IconRequest, IconResolved};
use crate::registry::system::WindowSystem;

/// Routes native notifications to the component that owns them.
///
/// Lives on the dispatch thread; every registry mutation and every
/// full-screen tick happens through [`handle`](Self::handle), so they
/// never interleave.
pub struct ShellServices<S: WindowSystem, P: ForegroundProbe> {
    pub coordinator: Arc<DockBarCoordinator>,
    pub registry: WindowRegistry<S>,
    full_screen: Option<FullScreenMonitor<P>>,
    icon_sink: Box<dyn Fn(IconRequest) + Send>,
}

impl<S: WindowSystem, P: ForegroundProbe> ShellServices<S, P> {
    /// `full_screen` is `None` when polling is disabled. `icon_sink`
    /// receives lookups queued by the registry.
    pub fn new(
        coordinator: Arc<DockBarCoordinator>,
        registry: WindowRegistry<S>,
        full_screen: Option<FullScreenMonitor<P>>,
        icon_sink: impl Fn(IconRequest) + Send + 'static,
    ) -> Self {
        Self {
            coordinator,
            registry,
            full_screen,
            icon_sink: Box::new(icon_sink),
        }
    }

    /// Enumerates existing windows into the registry.
    pub fn start(&mut self) {
        self.registry.initialize();
        self.flush_icon_requests();
    }

    pub fn handle(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::ShellHook { kind, hwnd } => self.registry.handle_shell_hook(kind, hwnd),
            ShellEvent::Uncloaked { hwnd } => self.registry.handle_uncloaked(hwnd),
            ShellEvent::TaskbarList(command) => {
                self.registry.apply_taskbar_list(&command);
            }
            ShellEvent::AppBarCallback {
                callback_id,
                notify,
            } => self.coordinator.handle_callback(callback_id, notify),
            ShellEvent::TaskbarCreated => self.coordinator.handle_taskbar_created(),
            ShellEvent::DpiChanged { hwnd, dpi } => self.coordinator.handle_dpi_changed(hwnd, dpi),
            ShellEvent::DisplayChanged => self.coordinator.handle_display_changed(),
            ShellEvent::Tick => {
                if let Some(monitor) = &mut self.full_screen
                    && monitor.tick()
                {
                    self.coordinator.apply_full_screen(monitor.apps());
                }
            }
            ShellEvent::Message {
                hwnd,
                msg,
                wparam,
                lparam,
            } => {
                if !self.coordinator.dispatch_message(hwnd, msg, wparam, lparam) {
                    log_debug!("Unhandled message 0x{msg:04X} for 0x{hwnd:X}");
                }
            }
        }
        self.flush_icon_requests();
    }

    /// Publishes an icon resolved off-thread.
    pub fn apply_icon(&mut self, resolved: IconResolved) {
        self.registry.apply_icon(resolved);
    }

    fn flush_icon_requests(&mut self) {
        for request in self.registry.take_icon_requests() {
            (self.icon_sink)(request);
        }
    }
}
