//! Recording fakes of the OS traits, shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::dockbar::{AppBarShell, Edge, NotificationArea};
use crate::fullscreen::{ForegroundProbe, WindowSnapshot};
use crate::registry::icon::{IconHandle, IconSource};
use crate::registry::system::{CloseAck, OsVersion, WindowStyles, WindowSystem};
use crate::screen::{Monitor, ScreenTopology};
use crate::{Rect, ShellResult};

// -- Screens --

pub struct FakeScreens {
    monitors: Mutex<Vec<Monitor>>,
    invalidations: AtomicUsize,
}

impl FakeScreens {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors: Mutex::new(monitors),
            invalidations: AtomicUsize::new(0),
        }
    }

    pub fn monitor(name: &str, bounds: Rect, dpi_scale: f64) -> Monitor {
        Monitor {
            device_name: name.into(),
            bounds,
            work_area: bounds,
            dpi_scale,
            primary: false,
        }
    }

    pub fn set(&self, monitors: Vec<Monitor>) {
        *self.monitors.lock().unwrap() = monitors;
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

impl ScreenTopology for FakeScreens {
    fn monitors(&self) -> Vec<Monitor> {
        self.monitors.lock().unwrap().clone()
    }

    fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

// -- Dock bar shell --

#[derive(Default)]
pub struct ShellState {
    /// Every call, in order, as a short label.
    pub calls: Vec<String>,
    pub registered: Vec<(usize, u32)>,
    /// Committed reservations.
    pub reserved: Vec<(usize, Edge, Rect)>,
    pub moves: Vec<(usize, Rect)>,
    pub work_areas: Vec<Rect>,
    pub topmost: Vec<(usize, bool)>,
    pub auto_hide: Vec<(usize, bool)>,
    pub refuse_register: bool,
    /// Pixels to take off the next committed rectangle.
    pub shrink_next_commit: Option<i32>,
}

/// Simulates the OS side of dock bar negotiation: queries push a
/// proposal past bars already reserved on the same edge.
#[derive(Clone, Default)]
pub struct FakeShell {
    state: Arc<Mutex<ShellState>>,
}

impl FakeShell {
    pub fn state(&self) -> MutexGuard<'_, ShellState> {
        self.state.lock().unwrap()
    }

    pub fn tray(&self) -> FakeTray {
        FakeTray {
            state: self.state.clone(),
        }
    }

    fn record(&self, call: String) {
        self.state().calls.push(call);
    }
}

impl AppBarShell for FakeShell {
    fn register(&self, hwnd: usize, callback_id: u32) -> bool {
        let mut s = self.state();
        s.calls.push(format!("register {hwnd}"));
        if s.refuse_register {
            return false;
        }
        s.registered.push((hwnd, callback_id));
        true
    }

    fn unregister(&self, hwnd: usize) -> bool {
        let mut s = self.state();
        s.calls.push(format!("unregister {hwnd}"));
        s.registered.retain(|(h, _)| *h != hwnd);
        s.reserved.retain(|(h, _, _)| *h != hwnd);
        true
    }

    fn query_position(&self, hwnd: usize, edge: Edge, proposed: Rect) -> Option<Rect> {
        let mut s = self.state();
        s.calls.push(format!("query {hwnd}"));
        let mut others: Vec<Rect> = s
            .reserved
            .iter()
            .filter(|(h, e, _)| *h != hwnd && *e == edge)
            .map(|(_, _, r)| *r)
            .collect();
        let (mut l, mut t, mut r, mut b) = (
            proposed.x,
            proposed.y,
            proposed.right(),
            proposed.bottom(),
        );
        match edge {
            Edge::Top => {
                others.sort_by_key(|o| o.y);
                for o in others.iter().filter(|o| o.x < r && l < o.right()) {
                    if o.y <= t && t < o.bottom() {
                        t = o.bottom();
                    }
                }
            }
            Edge::Bottom => {
                others.sort_by_key(|o| std::cmp::Reverse(o.bottom()));
                for o in others.iter().filter(|o| o.x < r && l < o.right()) {
                    if o.y < b && b <= o.bottom() {
                        b = o.y;
                    }
                }
            }
            Edge::Left => {
                others.sort_by_key(|o| o.x);
                for o in others.iter().filter(|o| o.y < b && t < o.bottom()) {
                    if o.x <= l && l < o.right() {
                        l = o.right();
                    }
                }
            }
            Edge::Right => {
                others.sort_by_key(|o| std::cmp::Reverse(o.right()));
                for o in others.iter().filter(|o| o.y < b && t < o.bottom()) {
                    if o.x < r && r <= o.right() {
                        r = o.x;
                    }
                }
            }
        }
        Some(Rect::from_edges(l, t, r, b))
    }

    fn commit_position(&self, hwnd: usize, edge: Edge, proposed: Rect) -> Option<Rect> {
        let mut s = self.state();
        s.calls.push(format!("commit {hwnd}"));
        let mut rect = proposed;
        if let Some(px) = s.shrink_next_commit.take() {
            if edge.is_horizontal() {
                rect.height -= px;
            } else {
                rect.width -= px;
            }
        }
        s.reserved.retain(|(h, _, _)| *h != hwnd);
        s.reserved.push((hwnd, edge, rect));
        Some(rect)
    }

    fn auto_hide_state(&self) -> bool {
        false
    }

    fn set_auto_hide(&self, hwnd: usize, _edge: Edge, enabled: bool) -> bool {
        self.state().auto_hide.push((hwnd, enabled));
        true
    }

    fn set_work_area(&self, area: Rect) -> bool {
        self.state().work_areas.push(area);
        true
    }

    fn move_bar(&self, hwnd: usize, rect: Rect) {
        self.record(format!("move {hwnd}"));
        self.state().moves.push((hwnd, rect));
    }

    fn set_topmost(&self, hwnd: usize, topmost: bool) {
        self.state().topmost.push((hwnd, topmost));
    }
}

/// Writes suspend/resume into the shell's call log so ordering can be
/// checked against registration.
pub struct FakeTray {
    state: Arc<Mutex<ShellState>>,
}

impl NotificationArea for FakeTray {
    fn suspend(&self) {
        self.state.lock().unwrap().calls.push("tray suspend".into());
    }

    fn resume(&self) {
        self.state.lock().unwrap().calls.push("tray resume".into());
    }
}

// -- Window system --

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub styles: WindowStyles,
    pub owned: bool,
    pub cloaked: bool,
    pub minimized: bool,
    pub class_name: String,
    pub title: String,
    pub exe_path: Option<String>,
    pub monitor: Option<String>,
    /// Never answers a close request.
    pub hung: bool,
    /// Destroys itself when asked to close.
    pub closes: bool,
}

impl FakeWindow {
    /// A normal, visible application window.
    pub fn app(title: &str, exe: &str) -> Self {
        Self {
            styles: WindowStyles {
                visible: true,
                window_edge: true,
                ..Default::default()
            },
            owned: false,
            cloaked: false,
            minimized: false,
            class_name: "AppWindow".into(),
            title: title.into(),
            exe_path: Some(exe.into()),
            monitor: Some("DISPLAY1".into()),
            hung: false,
            closes: true,
        }
    }

    /// A tool window, never eligible.
    pub fn tool(title: &str, exe: &str) -> Self {
        let mut window = Self::app(title, exe);
        window.styles.tool_window = true;
        window
    }
}

#[derive(Default)]
pub struct SystemState {
    pub windows: HashMap<usize, FakeWindow>,
    /// Enumeration order.
    pub order: Vec<usize>,
    pub foreground: Option<usize>,
    pub calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeSystem {
    state: Arc<Mutex<SystemState>>,
}

impl FakeSystem {
    pub fn with(windows: impl IntoIterator<Item = (usize, FakeWindow)>) -> Self {
        let system = Self::default();
        for (hwnd, window) in windows {
            system.put(hwnd, window);
        }
        system
    }

    pub fn state(&self) -> MutexGuard<'_, SystemState> {
        self.state.lock().unwrap()
    }

    pub fn put(&self, hwnd: usize, window: FakeWindow) {
        let mut s = self.state();
        if !s.order.contains(&hwnd) {
            s.order.push(hwnd);
        }
        s.windows.insert(hwnd, window);
    }

    pub fn update(&self, hwnd: usize, change: impl FnOnce(&mut FakeWindow)) {
        if let Some(window) = self.state().windows.get_mut(&hwnd) {
            change(window);
        }
    }

    pub fn destroy(&self, hwnd: usize) {
        let mut s = self.state();
        s.windows.remove(&hwnd);
        s.order.retain(|h| *h != hwnd);
    }

    pub fn set_foreground(&self, hwnd: Option<usize>) {
        self.state().foreground = hwnd;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn read<T: Default>(&self, hwnd: usize, f: impl FnOnce(&FakeWindow) -> T) -> T {
        self.state().windows.get(&hwnd).map(f).unwrap_or_default()
    }
}

impl WindowSystem for FakeSystem {
    fn os_version(&self) -> OsVersion {
        OsVersion::Windows10
    }

    fn top_level_windows(&self) -> Vec<usize> {
        self.state().order.clone()
    }

    fn foreground(&self) -> Option<usize> {
        self.state().foreground
    }

    fn is_window(&self, hwnd: usize) -> bool {
        self.state().windows.contains_key(&hwnd)
    }

    fn styles(&self, hwnd: usize) -> WindowStyles {
        self.read(hwnd, |w| w.styles)
    }

    fn has_owner(&self, hwnd: usize) -> bool {
        self.read(hwnd, |w| w.owned)
    }

    fn is_cloaked(&self, hwnd: usize) -> bool {
        self.read(hwnd, |w| w.cloaked)
    }

    fn is_minimized(&self, hwnd: usize) -> bool {
        self.read(hwnd, |w| w.minimized)
    }

    fn class_name(&self, hwnd: usize) -> String {
        self.read(hwnd, |w| w.class_name.clone())
    }

    fn title(&self, hwnd: usize) -> String {
        self.read(hwnd, |w| w.title.clone())
    }

    fn exe_path(&self, hwnd: usize) -> Option<String> {
        self.read(hwnd, |w| w.exe_path.clone())
    }

    fn monitor_name(&self, hwnd: usize) -> Option<String> {
        self.read(hwnd, |w| w.monitor.clone())
    }

    fn show(&self, hwnd: usize) {
        self.state().calls.push(format!("show {hwnd}"));
    }

    fn activate(&self, hwnd: usize) {
        self.state().calls.push(format!("activate {hwnd}"));
    }

    fn minimize(&self, hwnd: usize) {
        self.state().calls.push(format!("minimize {hwnd}"));
        self.update(hwnd, |w| w.minimized = true);
    }

    fn restore(&self, hwnd: usize) {
        self.state().calls.push(format!("restore {hwnd}"));
        self.update(hwnd, |w| w.minimized = false);
    }

    fn close(&self, hwnd: usize, timeout: Duration) -> CloseAck {
        self.state().calls.push(format!("close {hwnd}"));
        let (hung, closes) = self.read(hwnd, |w| (w.hung, w.closes));
        if hung {
            thread::sleep(timeout);
            return CloseAck::TimedOut;
        }
        if closes {
            self.destroy(hwnd);
        }
        CloseAck::Acknowledged
    }
}

// -- Foreground probe --

#[derive(Default)]
struct ProbeState {
    windows: HashMap<usize, WindowSnapshot>,
    foreground: Option<usize>,
    fail: bool,
}

#[derive(Clone, Default)]
pub struct FakeProbe {
    state: Arc<Mutex<ProbeState>>,
}

impl FakeProbe {
    pub fn put(&self, window: WindowSnapshot) {
        self.state.lock().unwrap().windows.insert(window.hwnd, window);
    }

    pub fn remove(&self, hwnd: usize) {
        self.state.lock().unwrap().windows.remove(&hwnd);
    }

    pub fn set_foreground(&self, hwnd: Option<usize>) {
        self.state.lock().unwrap().foreground = hwnd;
    }

    pub fn fail(&self, fail: bool) {
        self.state.lock().unwrap().fail = fail;
    }
}

impl ForegroundProbe for FakeProbe {
    fn foreground(&self) -> Option<usize> {
        self.state.lock().unwrap().foreground
    }

    fn inspect(&self, hwnd: usize) -> ShellResult<Option<WindowSnapshot>> {
        let s = self.state.lock().unwrap();
        if s.fail {
            return Err("probe failure".into());
        }
        Ok(s.windows.get(&hwnd).cloned())
    }
}

// -- Icons --

#[derive(Debug, Clone, Default)]
pub struct FakeIcons {
    pub window: Option<IconHandle>,
    pub class: Option<IconHandle>,
    pub drag: Option<IconHandle>,
    pub exe: Option<IconHandle>,
}

impl IconSource for FakeIcons {
    fn window_icon(&self, _hwnd: usize) -> Option<IconHandle> {
        self.window
    }

    fn class_icon(&self, _hwnd: usize) -> Option<IconHandle> {
        self.class
    }

    fn drag_icon(&self, _hwnd: usize) -> Option<IconHandle> {
        self.drag
    }

    fn exe_icon(&self, _exe_path: &str) -> Option<IconHandle> {
        self.exe
    }
}
