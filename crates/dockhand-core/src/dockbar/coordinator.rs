use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::event::AppBarNotify;
use crate::fullscreen::FullScreenApp;
use crate::screen::{Monitor, ScreenTopology};
use crate::subscribers::{SubscriptionId, Subscribers};
use crate::{Rect, log_debug, log_info, log_warn};

use super::placement;
use super::{AppBarShell, DockBar, DockBarPolicies, Edge, NotificationArea, RegistrationState};

/// First callback message id handed to a dock bar (`WM_APP + 0x100`).
pub const CALLBACK_BASE: u32 = 0x8000 + 0x100;

/// Everything the coordinator shares with the OS, handed over at
/// construction and owned for the coordinator's lifetime.
pub struct AppBarContext {
    pub shell: Box<dyn AppBarShell>,
    pub notification_area: Box<dyn NotificationArea>,
    pub screens: Arc<dyn ScreenTopology>,
    /// Write the OS work area after every placement change.
    pub manage_work_area: bool,
}

/// A change to a dock bar, published to subscribers after the
/// coordinator lock is released.
#[derive(Debug, Clone, PartialEq)]
pub enum DockBarChange {
    Registered { hwnd: usize, callback_id: u32 },
    Moved { hwnd: usize, rect: Rect },
    Yielded { hwnd: usize, yielded: bool },
    Unregistered { hwnd: usize },
    Removed { hwnd: usize },
}

struct BarEntry {
    bar: DockBar,
    policies: DockBarPolicies,
}

struct BarTable {
    entries: Vec<BarEntry>,
    next_callback: u32,
}

impl BarEntry {
    /// Logical thickness the bar negotiates for, after its size policy.
    fn reserved_thickness(&self) -> i32 {
        let bar = &self.bar;
        let (width, height) = self.policies.size.desired_size(bar.edge, bar.width, bar.height);
        if bar.edge.is_horizontal() {
            height
        } else {
            width
        }
    }
}

impl BarTable {
    fn index_of(&self, hwnd: usize) -> Option<usize> {
        self.entries.iter().position(|e| e.bar.hwnd == hwnd)
    }

    fn index_of_callback(&self, callback_id: u32) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.bar.callback_id == Some(callback_id))
    }

    fn allocate_callback(&mut self) -> u32 {
        let id = self.next_callback;
        self.next_callback += 1;
        id
    }
}

/// Registers dock bars with the OS shell and negotiates their rectangles.
///
/// The negotiation protocol is a single global resource: one bar's
/// query/commit round trip must not interleave with another's. A single
/// lock over the bar table serialises every registration and placement
/// across all bars, whichever thread calls in.
pub struct DockBarCoordinator {
    context: AppBarContext,
    table: Mutex<BarTable>,
    subscribers: Mutex<Subscribers<DockBarChange>>,
}

impl DockBarCoordinator {
    pub fn new(context: AppBarContext) -> Self {
        Self {
            context,
            table: Mutex::new(BarTable {
                entries: Vec::new(),
                next_callback: CALLBACK_BASE,
            }),
            subscribers: Mutex::new(Subscribers::new()),
        }
    }

    /// Starts tracking a realized bar window. The bar stays unregistered
    /// until [`register`](Self::register) is called.
    ///
    /// The bar's DPI scale is taken from its monitor. Returns `false` if
    /// the window is already tracked.
    pub fn add_bar(&self, mut bar: DockBar, policies: DockBarPolicies) -> bool {
        let mut table = self.lock();
        if table.index_of(bar.hwnd).is_some() {
            log_warn!("Dock bar 0x{:X} added twice", bar.hwnd);
            return false;
        }
        if let Some(monitor) = self.resolve_monitor(&bar.monitor) {
            bar.monitor = monitor.device_name;
            bar.dpi_scale = monitor.dpi_scale;
        }
        table.entries.push(BarEntry { bar, policies });
        true
    }

    /// Registers a bar with the OS and performs its initial placement.
    ///
    /// Returns the callback message id the OS will use for this bar, or
    /// `None` if the OS refused (logged, no other effect). Registering an
    /// already registered bar returns its existing id.
    pub fn register(&self, hwnd: usize, width: i32, height: i32, edge: Edge) -> Option<u32> {
        let mut changes = Vec::new();
        let id = {
            let mut table = self.lock();
            let Some(idx) = table.index_of(hwnd) else {
                log_warn!("Register requested for unknown dock bar 0x{hwnd:X}");
                return None;
            };
            let bar = &mut table.entries[idx].bar;
            bar.width = width;
            bar.height = height;
            bar.edge = edge;
            self.register_at(&mut table, idx, &mut changes)
        };
        self.publish(changes);
        id
    }

    /// Releases a bar's reservation. Does nothing if it is not registered.
    pub fn unregister(&self, hwnd: usize) -> bool {
        let mut changes = Vec::new();
        let done = {
            let mut table = self.lock();
            match table.index_of(hwnd) {
                Some(idx) => self.unregister_at(&mut table, idx, &mut changes),
                None => false,
            }
        };
        self.publish(changes);
        done
    }

    /// Unregisters and forgets a bar whose window is closing.
    pub fn remove_bar(&self, hwnd: usize) -> bool {
        let mut changes = Vec::new();
        let removed = {
            let mut table = self.lock();
            match table.index_of(hwnd) {
                Some(idx) => {
                    self.unregister_at(&mut table, idx, &mut changes);
                    table.entries.remove(idx);
                    changes.push(DockBarChange::Removed { hwnd });
                    true
                }
                None => false,
            }
        };
        self.publish(changes);
        removed
    }

    /// Unregisters every bar. Used on shutdown.
    pub fn unregister_all(&self) {
        let mut changes = Vec::new();
        {
            let mut table = self.lock();
            for idx in 0..table.entries.len() {
                self.unregister_at(&mut table, idx, &mut changes);
            }
        }
        self.publish(changes);
    }

    /// Renegotiates a bar's rectangle for a new size or edge.
    ///
    /// `initial` forces the window to be moved even if the committed
    /// rectangle matches its last known position.
    pub fn set_position(&self, hwnd: usize, width: i32, height: i32, edge: Edge, initial: bool) {
        let mut changes = Vec::new();
        {
            let mut table = self.lock();
            let Some(idx) = table.index_of(hwnd) else {
                return;
            };
            let bar = &mut table.entries[idx].bar;
            bar.width = width;
            bar.height = height;
            bar.edge = edge;
            self.place(&mut table, idx, initial, &mut changes);
        }
        self.publish(changes);
    }

    /// Computes the usable area of `monitor` after subtracting top and
    /// bottom bars.
    ///
    /// `edge_bars_only` counts only bars that require the physical screen
    /// edge; `enabled_bars_only` skips bars that are unregistered or
    /// auto-hidden. Returns `None` for an unknown monitor.
    pub fn work_area(
        &self,
        monitor: &str,
        edge_bars_only: bool,
        enabled_bars_only: bool,
    ) -> Option<Rect> {
        let monitor = self.context.screens.monitor(monitor)?;
        let table = self.lock();
        Some(work_area_in(
            &table,
            &monitor,
            edge_bars_only,
            enabled_bars_only,
        ))
    }

    /// Restores every monitor's work area to its full bounds.
    ///
    /// Only acts when the coordinator manages the work area.
    pub fn restore_work_areas(&self) {
        if !self.context.manage_work_area {
            return;
        }
        for monitor in self.context.screens.monitors() {
            if !self.context.shell.set_work_area(monitor.bounds) {
                log_warn!("Failed to restore work area of {}", monitor.device_name);
            }
        }
    }

    /// Handles a callback the OS sent to one of the bars.
    pub fn handle_callback(&self, callback_id: u32, notify: AppBarNotify) {
        match notify {
            AppBarNotify::PosChanged => {
                let mut changes = Vec::new();
                {
                    let mut table = self.lock();
                    let Some(idx) = table.index_of_callback(callback_id) else {
                        log_debug!("Position change for unknown callback 0x{callback_id:X}");
                        return;
                    };
                    self.place(&mut table, idx, false, &mut changes);
                }
                self.publish(changes);
            }
            // Foreground polling is authoritative for full-screen state;
            // the shell's own signal misses apps on secondary monitors.
            AppBarNotify::FullScreenApp { opening } => {
                log_debug!("Shell full-screen hint (opening={opening}) ignored");
            }
            AppBarNotify::StateChange => {
                log_debug!(
                    "Taskbar state changed (auto-hide={})",
                    self.context.shell.auto_hide_state()
                );
            }
            AppBarNotify::WindowArrange { starting } => {
                log_debug!("Window arrange (starting={starting})");
            }
            AppBarNotify::Unknown(code) => {
                log_debug!("Unknown dock bar callback {code}");
            }
        }
    }

    /// Re-registers every registered bar after the OS shell restarted.
    pub fn handle_taskbar_created(&self) {
        let mut changes = Vec::new();
        {
            let mut table = self.lock();
            for idx in 0..table.entries.len() {
                let bar = &mut table.entries[idx].bar;
                if bar.state != RegistrationState::Registered {
                    continue;
                }
                log_info!("Re-registering dock bar 0x{:X}", bar.hwnd);
                bar.state = RegistrationState::Unregistered;
                self.register_at(&mut table, idx, &mut changes);
            }
        }
        self.publish(changes);
    }

    /// Updates a bar's DPI scale and re-places it.
    pub fn handle_dpi_changed(&self, hwnd: usize, dpi: u32) {
        self.context.screens.invalidate();
        let mut changes = Vec::new();
        {
            let mut table = self.lock();
            let Some(idx) = table.index_of(hwnd) else {
                return;
            };
            table.entries[idx].bar.dpi_scale = f64::from(dpi) / 96.0;
            self.place(&mut table, idx, false, &mut changes);
        }
        self.publish(changes);
    }

    /// Re-reads the monitor layout and re-places every bar.
    ///
    /// Bars whose monitor disappeared move to the primary monitor.
    pub fn handle_display_changed(&self) {
        self.context.screens.invalidate();
        let mut changes = Vec::new();
        {
            let mut table = self.lock();
            for idx in 0..table.entries.len() {
                self.place(&mut table, idx, false, &mut changes);
            }
        }
        self.publish(changes);
    }

    /// Whether the system taskbar is in auto-hide mode.
    pub fn auto_hide_state(&self) -> bool {
        self.context.shell.auto_hide_state()
    }

    /// Switches a bar between auto-hide and space-reserving modes.
    pub fn set_auto_hide(&self, hwnd: usize, enabled: bool) -> bool {
        let mut table = self.lock();
        let Some(idx) = table.index_of(hwnd) else {
            return false;
        };
        let edge = table.entries[idx].bar.edge;
        if !self.context.shell.set_auto_hide(hwnd, edge, enabled) {
            log_warn!("Auto-hide {enabled} refused for dock bar 0x{hwnd:X}");
            return false;
        }
        table.entries[idx].bar.auto_hide = enabled;
        if self.context.manage_work_area
            && let Some(monitor) = self.resolve_monitor(&table.entries[idx].bar.monitor)
        {
            self.sync_work_area(&table, &monitor);
        }
        true
    }

    /// Moves bars out of (or back into) the topmost band depending on
    /// whether their monitor hosts a full-screen application.
    pub fn apply_full_screen(&self, apps: &[FullScreenApp]) {
        let mut changes = Vec::new();
        {
            let mut table = self.lock();
            for entry in &mut table.entries {
                let bar = &mut entry.bar;
                if bar.state != RegistrationState::Registered {
                    continue;
                }
                let should_yield = apps.iter().any(|app| app.monitor == bar.monitor);
                if should_yield == bar.yielded {
                    continue;
                }
                self.context.shell.set_topmost(bar.hwnd, !should_yield);
                bar.yielded = should_yield;
                changes.push(DockBarChange::Yielded {
                    hwnd: bar.hwnd,
                    yielded: should_yield,
                });
            }
        }
        self.publish(changes);
    }

    /// Offers a window message to the bar's message policy.
    ///
    /// The policy sees a snapshot of the bar and runs without the lock.
    pub fn dispatch_message(&self, hwnd: usize, msg: u32, wparam: usize, lparam: isize) -> bool {
        let (bar, policy) = {
            let table = self.lock();
            let Some(idx) = table.index_of(hwnd) else {
                return false;
            };
            let entry = &table.entries[idx];
            (entry.bar.clone(), Arc::clone(&entry.policies.messages))
        };
        policy.handle_message(&bar, msg, wparam, lparam)
    }

    /// Snapshot of every tracked bar, in the order they were added.
    pub fn bars(&self) -> Vec<DockBar> {
        self.lock().entries.iter().map(|e| e.bar.clone()).collect()
    }

    pub fn bar(&self, hwnd: usize) -> Option<DockBar> {
        let table = self.lock();
        table.index_of(hwnd).map(|idx| table.entries[idx].bar.clone())
    }

    /// Adds a change listener. Listeners run on the calling thread after
    /// the coordinator lock is released, in subscription order, and may
    /// subscribe or unsubscribe from inside the callback.
    pub fn subscribe(
        &self,
        listener: impl Fn(&DockBarChange) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unsubscribe(id)
    }

    fn lock(&self) -> MutexGuard<'_, BarTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, changes: Vec<DockBarChange>) {
        if changes.is_empty() {
            return;
        }
        // Delivered from a copy so listeners can re-enter subscribe.
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for change in &changes {
            subscribers.notify(change);
        }
    }

    fn resolve_monitor(&self, device_name: &str) -> Option<Monitor> {
        self.context
            .screens
            .monitor(device_name)
            .or_else(|| self.context.screens.primary())
    }

    fn register_at(
        &self,
        table: &mut BarTable,
        idx: usize,
        changes: &mut Vec<DockBarChange>,
    ) -> Option<u32> {
        if table.entries[idx].bar.state == RegistrationState::Registered {
            return table.entries[idx].bar.callback_id;
        }
        let callback_id = match table.entries[idx].bar.callback_id {
            Some(id) => id,
            None => table.allocate_callback(),
        };
        let bar = &mut table.entries[idx].bar;
        bar.callback_id = Some(callback_id);
        bar.state = RegistrationState::Registering;
        let hwnd = bar.hwnd;

        // Registration briefly hands the notification area to the shell;
        // anything else listening on it must be paused meanwhile.
        self.context.notification_area.suspend();
        let accepted = self.context.shell.register(hwnd, callback_id);
        self.context.notification_area.resume();

        if !accepted {
            log_warn!("OS refused to register dock bar 0x{hwnd:X}");
            bar.state = RegistrationState::Unregistered;
            return None;
        }

        bar.state = RegistrationState::Registered;
        log_info!("Registered dock bar 0x{hwnd:X} on {:?} edge", bar.edge);
        changes.push(DockBarChange::Registered { hwnd, callback_id });
        self.place(table, idx, true, changes);
        Some(callback_id)
    }

    fn unregister_at(
        &self,
        table: &mut BarTable,
        idx: usize,
        changes: &mut Vec<DockBarChange>,
    ) -> bool {
        let bar = &mut table.entries[idx].bar;
        if bar.state != RegistrationState::Registered {
            return false;
        }
        let hwnd = bar.hwnd;
        bar.state = RegistrationState::Closing;
        if !self.context.shell.unregister(hwnd) {
            log_warn!("OS failed to unregister dock bar 0x{hwnd:X}");
        }
        bar.state = RegistrationState::Unregistered;
        bar.rect = None;
        bar.yielded = false;
        changes.push(DockBarChange::Unregistered { hwnd });

        if self.context.manage_work_area
            && let Some(monitor) = self.resolve_monitor(&table.entries[idx].bar.monitor)
        {
            self.sync_work_area(table, &monitor);
        }
        true
    }

    /// Query, adjust, commit, and (if it changed) move one bar.
    fn place(
        &self,
        table: &mut BarTable,
        idx: usize,
        initial: bool,
        changes: &mut Vec<DockBarChange>,
    ) {
        let shell = &self.context.shell;
        let entry = &mut table.entries[idx];
        if entry.bar.state != RegistrationState::Registered {
            return;
        }
        let Some(monitor) = self.resolve_monitor(&entry.bar.monitor) else {
            log_warn!("No monitor available for dock bar 0x{:X}", entry.bar.hwnd);
            return;
        };
        if monitor.device_name != entry.bar.monitor {
            log_info!(
                "Dock bar 0x{:X} moved from {} to {}",
                entry.bar.hwnd,
                entry.bar.monitor,
                monitor.device_name
            );
            entry.bar.monitor = monitor.device_name.clone();
        }

        let hwnd = entry.bar.hwnd;
        let edge = entry.bar.edge;
        let thickness = placement::to_physical(entry.reserved_thickness(), monitor.dpi_scale);

        let mut committed = None;
        for attempt in 0..2 {
            let proposed = placement::candidate(edge, thickness, monitor.bounds);
            let Some(queried) = shell.query_position(hwnd, edge, proposed) else {
                log_warn!("Position query failed for dock bar 0x{hwnd:X}");
                return;
            };
            let proposed = placement::restore_thickness(edge, queried, thickness);
            let Some(rect) = shell.commit_position(hwnd, edge, proposed) else {
                log_warn!("Position commit failed for dock bar 0x{hwnd:X}");
                return;
            };
            committed = Some(rect);
            let got = placement::thickness(edge, rect);
            if got >= thickness {
                break;
            }
            if attempt == 0 {
                log_debug!("Dock bar 0x{hwnd:X} got {got}px of {thickness}px, renegotiating");
            }
        }
        let Some(rect) = committed else {
            return;
        };

        // The cached scale may predate the monitor's current one; a DPI
        // change racing this comparison causes a spurious move.
        let bar = &mut entry.bar;
        let unchanged = !initial && bar.logical_rect.map(|r| r.scale(bar.dpi_scale)) == Some(rect);
        bar.rect = Some(rect);
        if !unchanged {
            bar.logical_rect = Some(rect.scale(1.0 / monitor.dpi_scale));
            shell.move_bar(hwnd, rect);
            entry.policies.after_placement.after_placement(&entry.bar);
            changes.push(DockBarChange::Moved { hwnd, rect });
        }

        if self.context.manage_work_area {
            self.sync_work_area(table, &monitor);
        }
    }

    fn sync_work_area(&self, table: &BarTable, monitor: &Monitor) {
        let area = work_area_in(table, monitor, true, true);
        if !self.context.shell.set_work_area(area) {
            log_warn!("Failed to set work area of {}", monitor.device_name);
        }
    }
}

fn work_area_in(
    table: &BarTable,
    monitor: &Monitor,
    edge_bars_only: bool,
    enabled_bars_only: bool,
) -> Rect {
    let bars = table
        .entries
        .iter()
        .filter(|e| e.bar.monitor == monitor.device_name)
        .filter(|e| e.bar.is_enabled() || !enabled_bars_only)
        .filter(|e| e.bar.requires_screen_edge || !edge_bars_only)
        .map(|e| (e.bar.edge, e.reserved_thickness()));
    placement::work_area(monitor.bounds, monitor.dpi_scale, bars)
}
