use std::cell::{Cell, RefCell};
use std::sync::mpsc::{self, Sender};
use std::thread;

use dockhand_core::{ShellEvent, ShellResult, log_warn};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::Accessibility::{SetWinEventHook, UnhookWinEvent};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PostThreadMessageW, TranslateMessage, WINEVENT_OUTOFCONTEXT,
    WINEVENT_SKIPOWNPROCESS, WM_QUIT,
};

use crate::bar_window::{self, BarWindow};

#[path = "event_loop_sink.rs"]
mod sink;
#[path = "event_loop_win_event.rs"]
mod win_event;

/// `EVENT_OBJECT_UNCLOAKED`
const EVENT_OBJECT_UNCLOAKED: u32 = 0x8018;

// Thread-local sender shared by every window procedure and hook
// callback on the pump thread.
thread_local! {
    static EVENT_SENDER: RefCell<Option<Sender<ShellEvent>>> = const { RefCell::new(None) };
    static SHELL_MESSAGES: Cell<ShellMessages> = const { Cell::new(ShellMessages::NONE) };
}

/// Registered message ids, resolved once on the pump thread.
#[derive(Clone, Copy)]
struct ShellMessages {
    shell_hook: u32,
    taskbar_created: u32,
}

impl ShellMessages {
    const NONE: Self = Self {
        shell_hook: 0,
        taskbar_created: 0,
    };
}

/// Forwards an event to the dispatch thread. Dropped silently once the
/// receiver is gone.
pub(crate) fn emit(event: ShellEvent) {
    EVENT_SENDER.with(|cell| {
        if let Some(sender) = cell.borrow().as_ref() {
            let _ = sender.send(event);
        }
    });
}

/// What the pump thread creates at start-up.
#[derive(Debug, Clone, Default)]
pub struct EventLoopOptions {
    /// Full-screen polling interval; `None` disables the timer.
    pub poll_interval_ms: Option<u32>,
    /// Dock bar windows to create. Their handles are returned in order.
    pub bars: Vec<BarWindow>,
}

/// Starts the native notification bridge on a new thread.
///
/// The thread owns a hidden sink window registered for shell-hook
/// notifications, a WinEvent hook for uncloak events, the polling timer,
/// and every dock bar window (window procedures run on the thread that
/// created the window). Decoded notifications are sent through
/// `event_tx` in arrival order.
pub fn start(event_tx: Sender<ShellEvent>, options: EventLoopOptions) -> ShellResult<EventLoopHandle> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<(u32, Vec<usize>), String>>();

    let handle = thread::spawn(move || {
        EVENT_SENDER.with(|cell| {
            *cell.borrow_mut() = Some(event_tx);
        });

        let thread_id = unsafe { windows::Win32::System::Threading::GetCurrentThreadId() };

        let sink = match sink::create(options.poll_interval_ms) {
            Ok(hwnd) => hwnd,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        // SAFETY: SetWinEventHook registers our callback for uncloak
        // events. WINEVENT_OUTOFCONTEXT means the callback runs on this
        // thread's message loop.
        let hook = unsafe {
            SetWinEventHook(
                EVENT_OBJECT_UNCLOAKED,
                EVENT_OBJECT_UNCLOAKED,
                None,
                Some(win_event::win_event_proc),
                0,
                0,
                WINEVENT_OUTOFCONTEXT | WINEVENT_SKIPOWNPROCESS,
            )
        };
        if hook.is_invalid() {
            log_warn!("Failed to set uncloak WinEvent hook; uncloak rechecks disabled");
        }

        let mut bars = Vec::with_capacity(options.bars.len());
        for bar in &options.bars {
            match bar_window::create(bar) {
                Ok(hwnd) => bars.push(hwnd),
                Err(e) => {
                    bars.into_iter().for_each(bar_window::destroy);
                    sink::destroy(sink, options.poll_interval_ms.is_some());
                    let _ = ready_tx.send(Err(format!("failed to create dock bar window: {e}")));
                    return;
                }
            }
        }

        let handles = bars.iter().map(|h: &HWND| h.0 as usize).collect();
        let _ = ready_tx.send(Ok((thread_id, handles)));

        run_message_pump();

        bars.into_iter().for_each(bar_window::destroy);
        sink::destroy(sink, options.poll_interval_ms.is_some());
        if !hook.is_invalid() {
            unsafe {
                let _ = UnhookWinEvent(hook);
            }
        }
    });

    let (thread_id, bars) = ready_rx
        .recv()
        .map_err(|_| -> Box<dyn std::error::Error> {
            "event loop thread exited unexpectedly".into()
        })?
        .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;

    Ok(EventLoopHandle {
        thread_id,
        handle,
        bars,
    })
}

/// Handle for controlling the event loop from the daemon.
pub struct EventLoopHandle {
    thread_id: u32,
    handle: thread::JoinHandle<()>,
    bars: Vec<usize>,
}

impl EventLoopHandle {
    /// Dock bar window handles, in the order they were requested.
    pub fn bars(&self) -> &[usize] {
        &self.bars
    }

    /// Signals the event loop to stop and waits for the thread to finish.
    ///
    /// Dock bar windows are destroyed on the way out, so unregister them
    /// from the shell first.
    pub fn stop(self) {
        unsafe {
            let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        let _ = self.handle.join();
    }
}

/// The Win32 message pump. Blocks until WM_QUIT is received.
fn run_message_pump() {
    let mut msg = MSG::default();

    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
