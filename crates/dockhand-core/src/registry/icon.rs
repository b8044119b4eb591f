//! Best-effort icon lookup on a background worker.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use serde::Serialize;

use crate::log_debug;

/// An OS icon handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconHandle(pub usize);

/// Ways of finding a window's icon, tried in declaration order.
pub trait IconSource: Send {
    /// The icon the window answers to `WM_GETICON`.
    fn window_icon(&self, hwnd: usize) -> Option<IconHandle>;

    /// The small, then large, icon registered with the window class.
    fn class_icon(&self, hwnd: usize) -> Option<IconHandle>;

    /// The icon the window answers to `WM_QUERYDRAGICON`.
    fn drag_icon(&self, hwnd: usize) -> Option<IconHandle>;

    /// The first icon embedded in the executable.
    fn exe_icon(&self, exe_path: &str) -> Option<IconHandle>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRequest {
    pub hwnd: usize,
    pub exe_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconResolved {
    pub hwnd: usize,
    pub icon: Option<IconHandle>,
}

/// Runs the lookup chain for one window.
pub fn resolve(source: &dyn IconSource, request: &IconRequest) -> Option<IconHandle> {
    source
        .window_icon(request.hwnd)
        .or_else(|| source.class_icon(request.hwnd))
        .or_else(|| source.drag_icon(request.hwnd))
        .or_else(|| {
            request
                .exe_path
                .as_deref()
                .and_then(|path| source.exe_icon(path))
        })
}

/// A thread that resolves icons and hands results back through a
/// callback, which is expected to marshal them to the dispatch thread.
pub struct IconWorker {
    sender: Option<mpsc::Sender<IconRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl IconWorker {
    pub fn spawn(
        source: Box<dyn IconSource>,
        deliver: impl Fn(IconResolved) + Send + 'static,
    ) -> Self {
        let (sender, receiver) = mpsc::channel::<IconRequest>();
        let handle = thread::spawn(move || {
            for request in receiver {
                let icon = resolve(source.as_ref(), &request);
                if icon.is_none() {
                    log_debug!("No icon found for 0x{:X}", request.hwnd);
                }
                deliver(IconResolved {
                    hwnd: request.hwnd,
                    icon,
                });
            }
        });
        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// Queues a lookup. Never blocks.
    pub fn request(&self, request: IconRequest) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(request);
        }
    }

    /// A handle for queuing lookups from another owner. Every clone must
    /// be dropped before [`stop`](Self::stop), which otherwise waits forever.
    pub fn sender(&self) -> Option<mpsc::Sender<IconRequest>> {
        self.sender.clone()
    }

    /// Stops accepting requests and waits for queued ones to finish.
    pub fn stop(&mut self) {
        self.sender = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for IconWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeIcons;

    fn request(hwnd: usize) -> IconRequest {
        IconRequest {
            hwnd,
            exe_path: Some(r"C:\app.exe".into()),
        }
    }

    #[test]
    fn window_icon_wins_over_class_icon() {
        let icons = FakeIcons {
            window: Some(IconHandle(1)),
            class: Some(IconHandle(2)),
            ..Default::default()
        };

        assert_eq!(resolve(&icons, &request(5)), Some(IconHandle(1)));
    }

    #[test]
    fn falls_back_to_executable_icon() {
        let icons = FakeIcons {
            exe: Some(IconHandle(9)),
            ..Default::default()
        };

        assert_eq!(resolve(&icons, &request(5)), Some(IconHandle(9)));

        let no_path = IconRequest {
            hwnd: 5,
            exe_path: None,
        };
        assert_eq!(resolve(&icons, &no_path), None);
    }

    #[test]
    fn worker_delivers_results() {
        // Arrange
        let icons = FakeIcons {
            drag: Some(IconHandle(3)),
            ..Default::default()
        };
        let (tx, rx) = mpsc::channel();
        let mut worker = IconWorker::spawn(Box::new(icons), move |resolved| {
            let _ = tx.send(resolved);
        });

        // Act
        worker.request(request(5));
        worker.stop();

        // Assert
        assert_eq!(
            rx.recv().unwrap(),
            IconResolved {
                hwnd: 5,
                icon: Some(IconHandle(3))
            }
        );
    }
}
