//! The task list: every top-level window a taskbar would show, kept
//! current from shell-hook notifications.

pub mod eligibility;
pub mod icon;
pub mod system;
pub mod taskbar_list;

use std::time::Duration;

use serde::Serialize;

use crate::event::ShellHookKind;
use crate::subscribers::{SubscriptionId, Subscribers};
use crate::{log_debug, log_info};

use eligibility::{EligibilityInput, is_taskbar_eligible};
use icon::{IconHandle, IconRequest, IconResolved};
use system::{CloseAck, OsVersion, WindowSystem};
use taskbar_list::{TaskbarListCommand, TaskbarListOp};

/// Activation state of a tracked window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindowState {
    Active,
    Inactive,
    /// Tracked but currently failing the eligibility check.
    Hidden,
    Flashing,
}

/// Taskbar progress indicator state (`TBPF_*` flags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ProgressState {
    #[default]
    NoProgress,
    Indeterminate,
    Normal,
    Error,
    Paused,
}

impl ProgressState {
    pub fn from_flags(flags: u32) -> Self {
        match flags {
            1 => Self::Indeterminate,
            2 => Self::Normal,
            4 => Self::Error,
            8 => Self::Paused,
            _ => Self::NoProgress,
        }
    }
}

/// A top-level window in the task list.
///
/// Entries are updated in place for their whole lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedWindow {
    pub hwnd: usize,
    pub title: String,
    pub icon: Option<IconHandle>,
    /// Whether the window currently passes the eligibility check.
    pub eligible: bool,
    pub state: WindowState,
    pub exe_path: Option<String>,
    /// Whether the window is a store-app host frame.
    pub app_host: bool,
    /// Device name of the monitor the window is on.
    pub monitor: Option<String>,
    /// 0 to 65534.
    pub progress_value: u32,
    pub progress_state: ProgressState,
}

/// A single field of [`TrackedWindow`], for change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowField {
    Title,
    Icon,
    Eligible,
    State,
    ExePath,
    Monitor,
    ProgressValue,
    ProgressState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryChange {
    Added(usize),
    Removed(usize),
    Updated { hwnd: usize, field: WindowField },
}

/// What happened to a window after [`WindowRegistry::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The window is no longer tracked.
    Removed,
    /// The window handled the request but is still open (e.g. it asked
    /// to save changes).
    StillPresent,
    /// The window was not tracked.
    Unknown,
}

/// The ordered set of tracked windows.
///
/// Every mutation takes `&mut self`, so the owner serialises shell-hook
/// handling and UI commands on one dispatch path.
pub struct WindowRegistry<S: WindowSystem> {
    system: S,
    version: OsVersion,
    close_timeout: Duration,
    windows: Vec<TrackedWindow>,
    subscribers: Subscribers<RegistryChange>,
    icon_requests: Vec<IconRequest>,
}

impl<S: WindowSystem> WindowRegistry<S> {
    pub fn new(system: S, close_timeout: Duration) -> Self {
        let version = system.os_version();
        Self {
            system,
            version,
            close_timeout,
            windows: Vec::new(),
            subscribers: Subscribers::new(),
            icon_requests: Vec::new(),
        }
    }

    /// Adds every eligible existing window and marks the foreground one
    /// active.
    pub fn initialize(&mut self) {
        for hwnd in self.system.top_level_windows() {
            if !self.contains(hwnd) && self.is_eligible(hwnd) {
                self.add(hwnd, WindowState::Inactive);
            }
        }
        if let Some(foreground) = self.system.foreground()
            && let Some(idx) = self.index_of(foreground)
        {
            self.set_state(idx, WindowState::Active);
        }
        log_info!("Registry initialized with {} windows", self.windows.len());
    }

    /// Applies one shell-hook notification.
    pub fn handle_shell_hook(&mut self, kind: ShellHookKind, hwnd: usize) {
        match kind {
            ShellHookKind::WindowCreated => self.on_created(hwnd),
            ShellHookKind::WindowDestroyed
            | ShellHookKind::EndTask
            | ShellHookKind::WindowReplaced => self.remove_all(hwnd),
            ShellHookKind::WindowReplacing => self.on_replacing(hwnd),
            ShellHookKind::WindowActivated | ShellHookKind::RudeAppActivated => {
                self.on_activated(hwnd)
            }
            ShellHookKind::Flash => self.on_flash(hwnd),
            ShellHookKind::Redraw => self.on_redraw(hwnd),
            ShellHookKind::MonitorChanged => {
                if let Some(idx) = self.index_of(hwnd) {
                    self.refresh_monitor(idx);
                }
            }
            other => log_debug!("Ignoring shell hook {other:?} for 0x{hwnd:X}"),
        }
    }

    /// A window stopped being cloaked; its eligibility may have changed.
    pub fn handle_uncloaked(&mut self, hwnd: usize) {
        match self.index_of(hwnd) {
            Some(idx) => self.recheck(idx),
            None => self.on_created(hwnd),
        }
    }

    /// Applies a taskbar-list command. Returns `true` if it changed a
    /// tracked window.
    ///
    /// Commands for untracked windows never create entries. Commands
    /// other than progress updates are acknowledged and dropped.
    pub fn apply_taskbar_list(&mut self, command: &TaskbarListCommand) -> bool {
        let Some(idx) = self.index_of(command.hwnd) else {
            return false;
        };
        let hwnd = command.hwnd;
        match command.op {
            TaskbarListOp::SetProgressValue { value } => {
                if self.windows[idx].progress_value == value {
                    return false;
                }
                self.windows[idx].progress_value = value;
                self.notify_field(hwnd, WindowField::ProgressValue);
                true
            }
            TaskbarListOp::SetProgressState { state } => {
                if self.windows[idx].progress_state == state {
                    return false;
                }
                self.windows[idx].progress_state = state;
                self.notify_field(hwnd, WindowField::ProgressState);
                true
            }
            op => {
                log_debug!("Taskbar list {op:?} for 0x{hwnd:X} acknowledged");
                false
            }
        }
    }

    /// Publishes a resolved icon if it differs from the cached one.
    pub fn apply_icon(&mut self, resolved: IconResolved) -> bool {
        let Some(idx) = self.index_of(resolved.hwnd) else {
            return false;
        };
        if resolved.icon.is_none() || self.windows[idx].icon == resolved.icon {
            return false;
        }
        self.windows[idx].icon = resolved.icon;
        self.notify_field(resolved.hwnd, WindowField::Icon);
        true
    }

    /// Drains icon lookups queued since the last call.
    pub fn take_icon_requests(&mut self) -> Vec<IconRequest> {
        std::mem::take(&mut self.icon_requests)
    }

    pub fn subscribe(
        &mut self,
        listener: impl Fn(&RegistryChange) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn windows(&self) -> &[TrackedWindow] {
        &self.windows
    }

    pub fn get(&self, hwnd: usize) -> Option<&TrackedWindow> {
        self.windows.iter().find(|w| w.hwnd == hwnd)
    }

    pub fn contains(&self, hwnd: usize) -> bool {
        self.index_of(hwnd).is_some()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn active(&self) -> Option<&TrackedWindow> {
        self.windows.iter().find(|w| w.state == WindowState::Active)
    }

    /// Copies the current task list, e.g. for serialisation.
    pub fn snapshot(&self) -> Vec<TrackedWindow> {
        self.windows.clone()
    }

    // -- Commands from the UI layer --

    pub fn show(&self, hwnd: usize) -> bool {
        self.with_tracked(hwnd, |s| s.show(hwnd))
    }

    pub fn bring_to_front(&self, hwnd: usize) -> bool {
        self.with_tracked(hwnd, |s| s.activate(hwnd))
    }

    pub fn minimize(&self, hwnd: usize) -> bool {
        self.with_tracked(hwnd, |s| s.minimize(hwnd))
    }

    pub fn restore(&self, hwnd: usize) -> bool {
        self.with_tracked(hwnd, |s| s.restore(hwnd))
    }

    /// Minimizes the active window; restores and activates any other.
    pub fn toggle(&self, hwnd: usize) -> bool {
        let Some(window) = self.get(hwnd) else {
            return false;
        };
        if window.state == WindowState::Active && !self.system.is_minimized(hwnd) {
            self.system.minimize(hwnd);
        } else {
            if self.system.is_minimized(hwnd) {
                self.system.restore(hwnd);
            }
            self.system.activate(hwnd);
        }
        true
    }

    /// Asks a window to close, waiting at most the configured timeout.
    ///
    /// A window that does not answer in time is removed immediately
    /// instead of waiting for its destroy notification; if it is merely
    /// slow, a later notification re-adds it.
    pub fn close(&mut self, hwnd: usize) -> CloseOutcome {
        if !self.contains(hwnd) {
            return CloseOutcome::Unknown;
        }
        match self.system.close(hwnd, self.close_timeout) {
            CloseAck::TimedOut => {
                log_info!(
                    "0x{hwnd:X} did not answer close within {:?}, removing",
                    self.close_timeout
                );
                self.remove_all(hwnd);
                CloseOutcome::Removed
            }
            CloseAck::Acknowledged if !self.system.is_window(hwnd) => {
                self.remove_all(hwnd);
                CloseOutcome::Removed
            }
            CloseAck::Acknowledged => CloseOutcome::StillPresent,
        }
    }

    // -- Notification handlers --

    fn on_created(&mut self, hwnd: usize) {
        match self.index_of(hwnd) {
            Some(idx) => self.refresh(idx),
            None => {
                if self.is_eligible(hwnd) {
                    self.add(hwnd, WindowState::Inactive);
                }
            }
        }
    }

    fn on_replacing(&mut self, hwnd: usize) {
        match self.index_of(hwnd) {
            Some(idx) => {
                self.set_state(idx, WindowState::Inactive);
                self.recheck(idx);
            }
            None => self.on_created(hwnd),
        }
    }

    fn on_activated(&mut self, hwnd: usize) {
        for idx in 0..self.windows.len() {
            let window = &self.windows[idx];
            if window.state == WindowState::Active && window.hwnd != hwnd {
                // An ineligible window was only listed while it had focus.
                let demoted = if window.eligible {
                    WindowState::Inactive
                } else {
                    WindowState::Hidden
                };
                self.set_state(idx, demoted);
            }
        }
        if hwnd == 0 {
            return;
        }

        match self.index_of(hwnd) {
            Some(idx) => self.set_state(idx, WindowState::Active),
            None => self.add(hwnd, WindowState::Active),
        }

        // Sibling windows of one app can change visibility depending on
        // which of them is in the foreground.
        let exe = self.get(hwnd).and_then(|w| w.exe_path.clone());
        if let Some(exe) = exe {
            for idx in 0..self.windows.len() {
                if self.windows[idx].exe_path.as_deref() == Some(exe.as_str()) {
                    self.recheck(idx);
                }
            }
        }
    }

    fn on_flash(&mut self, hwnd: usize) {
        match self.index_of(hwnd) {
            Some(idx) => {
                if self.windows[idx].state != WindowState::Active {
                    self.set_state(idx, WindowState::Flashing);
                }
            }
            None => {
                // Flash can target windows that must never be listed.
                if self.is_eligible(hwnd) {
                    self.add(hwnd, WindowState::Flashing);
                }
            }
        }
    }

    fn on_redraw(&mut self, hwnd: usize) {
        let Some(idx) = self.index_of(hwnd) else {
            return;
        };
        self.refresh(idx);
        let exe = self.windows[idx].exe_path.clone();
        if let Some(exe) = exe {
            for other in 0..self.windows.len() {
                if other != idx && self.windows[other].exe_path.as_deref() == Some(exe.as_str()) {
                    self.refresh(other);
                }
            }
        }
    }

    // -- Mutation helpers --

    fn add(&mut self, hwnd: usize, state: WindowState) {
        let input = EligibilityInput::read(&self.system, hwnd);
        let window = TrackedWindow {
            hwnd,
            title: self.system.title(hwnd),
            icon: None,
            eligible: is_taskbar_eligible(&input, self.version),
            state,
            exe_path: self.system.exe_path(hwnd),
            app_host: input.is_app_host(),
            monitor: self.system.monitor_name(hwnd),
            progress_value: 0,
            progress_state: ProgressState::NoProgress,
        };
        log_debug!("Tracking 0x{hwnd:X} \"{}\" as {state:?}", window.title);
        self.icon_requests.push(IconRequest {
            hwnd,
            exe_path: window.exe_path.clone(),
        });
        self.windows.push(window);
        self.subscribers.notify(&RegistryChange::Added(hwnd));
    }

    fn remove_all(&mut self, hwnd: usize) {
        while let Some(idx) = self.index_of(hwnd) {
            self.windows.remove(idx);
            log_debug!("Untracked 0x{hwnd:X}");
            self.subscribers.notify(&RegistryChange::Removed(hwnd));
        }
    }

    fn set_state(&mut self, idx: usize, state: WindowState) {
        let window = &mut self.windows[idx];
        if window.state == state {
            return;
        }
        window.state = state;
        let hwnd = window.hwnd;
        self.notify_field(hwnd, WindowField::State);
    }

    /// Re-evaluates eligibility, moving the window in or out of `Hidden`.
    fn recheck(&mut self, idx: usize) {
        let hwnd = self.windows[idx].hwnd;
        let eligible = self.is_eligible(hwnd);
        if self.windows[idx].eligible != eligible {
            self.windows[idx].eligible = eligible;
            self.notify_field(hwnd, WindowField::Eligible);
        }
        match self.windows[idx].state {
            WindowState::Hidden if eligible => self.set_state(idx, WindowState::Inactive),
            WindowState::Inactive | WindowState::Flashing if !eligible => {
                self.set_state(idx, WindowState::Hidden)
            }
            _ => {}
        }
    }

    /// Re-reads cached properties and queues an icon lookup.
    fn refresh(&mut self, idx: usize) {
        let hwnd = self.windows[idx].hwnd;

        let title = self.system.title(hwnd);
        if self.windows[idx].title != title {
            self.windows[idx].title = title;
            self.notify_field(hwnd, WindowField::Title);
        }

        let exe_path = self.system.exe_path(hwnd);
        if self.windows[idx].exe_path != exe_path {
            self.windows[idx].exe_path = exe_path;
            self.notify_field(hwnd, WindowField::ExePath);
        }

        self.refresh_monitor(idx);
        self.icon_requests.push(IconRequest {
            hwnd,
            exe_path: self.windows[idx].exe_path.clone(),
        });
    }

    fn refresh_monitor(&mut self, idx: usize) {
        let hwnd = self.windows[idx].hwnd;
        let monitor = self.system.monitor_name(hwnd);
        if self.windows[idx].monitor != monitor {
            self.windows[idx].monitor = monitor;
            self.notify_field(hwnd, WindowField::Monitor);
        }
    }

    fn notify_field(&self, hwnd: usize, field: WindowField) {
        self.subscribers
            .notify(&RegistryChange::Updated { hwnd, field });
    }

    fn is_eligible(&self, hwnd: usize) -> bool {
        let input = EligibilityInput::read(&self.system, hwnd);
        is_taskbar_eligible(&input, self.version)
    }

    fn index_of(&self, hwnd: usize) -> Option<usize> {
        self.windows.iter().position(|w| w.hwnd == hwnd)
    }

    fn with_tracked(&self, hwnd: usize, action: impl FnOnce(&S)) -> bool {
        if !self.contains(hwnd) {
            return false;
        }
        action(&self.system);
        true
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
