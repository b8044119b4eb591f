use std::sync::mpsc;
use std::thread;

use dockhand_core::ShellEvent;

use super::daemon_types::DaemonMsg;

/// Bridges pump notifications into the daemon message channel.
///
/// Ends once the pump thread exits and drops its sender.
pub(super) fn spawn_event_bridge(
    event_rx: mpsc::Receiver<ShellEvent>,
    tx: mpsc::Sender<DaemonMsg>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for event in event_rx {
            if tx.send(DaemonMsg::Event(event)).is_err() {
                break;
            }
        }
    })
}

/// Bridges Ctrl+C into the daemon message channel.
///
/// The Ctrl+C sender lives for the whole process, so this thread is
/// never joined.
pub(super) fn spawn_stop_bridge(stop_rx: mpsc::Receiver<()>, tx: mpsc::Sender<DaemonMsg>) {
    thread::spawn(move || {
        if stop_rx.recv().is_ok() {
            let _ = tx.send(DaemonMsg::Stop);
        }
    });
}
