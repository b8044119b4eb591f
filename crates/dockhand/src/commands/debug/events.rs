/// Watches shell notifications in real time. Press Ctrl+C to stop.
#[cfg(windows)]
pub fn execute() {
    use std::sync::mpsc;
    use std::time::Duration;

    use dockhand_core::ShellEvent;
    use dockhand_windows::Window;
    use dockhand_windows::event_loop::{self, EventLoopOptions};

    println!("Watching shell notifications (press Ctrl+C to stop)...\n");

    let (tx, rx) = mpsc::channel();
    // No dock bars and no polling timer in debug mode.
    let event_loop = match event_loop::start(tx, EventLoopOptions::default()) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to start event loop: {e}");
            std::process::exit(1);
        }
    };

    let (stop_tx, stop_rx) = mpsc::channel();
    if let Err(e) = dockhand_windows::ctrl_c::set_handler(stop_tx) {
        eprintln!("Failed to set Ctrl+C handler: {e}");
        event_loop.stop();
        std::process::exit(1);
    }

    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }

        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => match &event {
                ShellEvent::ShellHook { hwnd, .. } | ShellEvent::Uncloaked { hwnd } => {
                    let title = Window::from_raw(*hwnd).title();
                    println!("{event} \"{title}\"");
                }
                _ => println!("{event}"),
            },
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    event_loop.stop();
}

#[cfg(not(windows))]
pub fn execute() {
    super::super::windows_only("debug events");
}
