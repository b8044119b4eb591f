use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::*;
use crate::testing::{FakeSystem, FakeWindow};

const TIMEOUT: Duration = Duration::from_millis(200);

fn registry(system: &FakeSystem) -> WindowRegistry<FakeSystem> {
    WindowRegistry::new(system.clone(), TIMEOUT)
}

fn state(registry: &WindowRegistry<FakeSystem>, hwnd: usize) -> WindowState {
    registry.get(hwnd).unwrap().state
}

fn recorder(registry: &mut WindowRegistry<FakeSystem>) -> Arc<Mutex<Vec<RegistryChange>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    registry.subscribe(move |change| sink.lock().unwrap().push(*change));
    seen
}

#[test]
fn initialize_tracks_eligible_windows_and_foreground() {
    // Arrange
    let system = FakeSystem::with([
        (1, FakeWindow::app("Editor", "editor.exe")),
        (2, FakeWindow::tool("Palette", "editor.exe")),
        (3, FakeWindow::app("Browser", "browser.exe")),
    ]);
    system.set_foreground(Some(3));
    let mut reg = registry(&system);

    // Act
    reg.initialize();

    // Assert
    let handles: Vec<usize> = reg.windows().iter().map(|w| w.hwnd).collect();
    assert_eq!(handles, vec![1, 3]);
    assert_eq!(state(&reg, 1), WindowState::Inactive);
    assert_eq!(state(&reg, 3), WindowState::Active);
    assert_eq!(reg.get(1).unwrap().title, "Editor");
    assert_eq!(reg.get(1).unwrap().monitor.as_deref(), Some("DISPLAY1"));
}

#[test]
fn created_adds_once_and_refreshes_duplicates() {
    let system = FakeSystem::with([(1, FakeWindow::app("Draft", "editor.exe"))]);
    let mut reg = registry(&system);

    reg.handle_shell_hook(ShellHookKind::WindowCreated, 1);
    system.update(1, |w| w.title = "Draft - saved".into());
    reg.handle_shell_hook(ShellHookKind::WindowCreated, 1);

    assert_eq!(reg.len(), 1);
    assert_eq!(reg.get(1).unwrap().title, "Draft - saved");
}

#[test]
fn created_ignores_ineligible_windows() {
    let system = FakeSystem::with([(1, FakeWindow::tool("Tooltip", "app.exe"))]);
    let mut reg = registry(&system);

    reg.handle_shell_hook(ShellHookKind::WindowCreated, 1);

    assert!(reg.is_empty());
}

#[test]
fn destroyed_and_replaced_remove_the_window() {
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (2, FakeWindow::app("B", "b.exe")),
    ]);
    let mut reg = registry(&system);
    reg.initialize();

    reg.handle_shell_hook(ShellHookKind::WindowDestroyed, 1);
    reg.handle_shell_hook(ShellHookKind::WindowReplaced, 2);
    reg.handle_shell_hook(ShellHookKind::WindowDestroyed, 42);

    assert!(reg.is_empty());
}

#[test]
fn last_create_or_destroy_wins_for_any_interleaving() {
    // Every sequence of up to six create/destroy events over two handles.
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (2, FakeWindow::app("B", "b.exe")),
    ]);
    let events = [
        (ShellHookKind::WindowCreated, 1),
        (ShellHookKind::WindowDestroyed, 1),
        (ShellHookKind::WindowCreated, 2),
        (ShellHookKind::WindowDestroyed, 2),
    ];

    for len in 0..=6u32 {
        for code in 0..events.len().pow(len) {
            let mut reg = registry(&system);
            let mut expected = [false, false];
            let mut rest = code;
            for _ in 0..len {
                let (kind, hwnd) = events[rest % events.len()];
                rest /= events.len();
                reg.handle_shell_hook(kind, hwnd);
                expected[hwnd - 1] = kind == ShellHookKind::WindowCreated;
            }

            for hwnd in [1, 2] {
                assert_eq!(reg.contains(hwnd), expected[hwnd - 1], "sequence {code} of {len}");
            }
            assert!(reg.len() <= 2);
        }
    }
}

#[test]
fn activating_b_deactivates_a_and_c() {
    // Arrange
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (2, FakeWindow::app("B", "b.exe")),
        (3, FakeWindow::app("C", "c.exe")),
    ]);
    system.set_foreground(Some(1));
    let mut reg = registry(&system);
    reg.initialize();
    assert_eq!(state(&reg, 1), WindowState::Active);

    // Act
    reg.handle_shell_hook(ShellHookKind::WindowActivated, 2);

    // Assert
    assert_eq!(state(&reg, 1), WindowState::Inactive);
    assert_eq!(state(&reg, 2), WindowState::Active);
    assert_eq!(state(&reg, 3), WindowState::Inactive);
}

#[test]
fn activation_rechecks_sibling_windows() {
    // Arrange
    let system = FakeSystem::with([
        (1, FakeWindow::app("Inbox", "mail.exe")),
        (2, FakeWindow::app("Compose", "mail.exe")),
        (3, FakeWindow::app("Other", "other.exe")),
    ]);
    let mut reg = registry(&system);
    reg.initialize();
    system.update(2, |w| w.styles.visible = false);
    system.update(3, |w| w.styles.visible = false);

    // Act
    reg.handle_shell_hook(ShellHookKind::WindowActivated, 1);

    // Assert
    assert_eq!(state(&reg, 2), WindowState::Hidden);
    assert!(!reg.get(2).unwrap().eligible);
    assert_eq!(state(&reg, 3), WindowState::Inactive);
    assert!(reg.get(3).unwrap().eligible);

    system.update(2, |w| w.styles.visible = true);
    reg.handle_shell_hook(ShellHookKind::WindowActivated, 1);
    assert_eq!(state(&reg, 2), WindowState::Inactive);
}

#[test]
fn activation_of_unseen_window_tracks_it() {
    let system = FakeSystem::with([(5, FakeWindow::app("New", "new.exe"))]);
    let mut reg = registry(&system);

    reg.handle_shell_hook(ShellHookKind::RudeAppActivated, 5);

    assert_eq!(state(&reg, 5), WindowState::Active);
}

#[test]
fn ineligible_window_is_hidden_once_it_loses_focus() {
    // Arrange
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (9, FakeWindow::tool("Palette", "palette.exe")),
    ]);
    let mut reg = registry(&system);
    reg.initialize();
    reg.handle_shell_hook(ShellHookKind::WindowActivated, 9);
    assert_eq!(state(&reg, 9), WindowState::Active);
    assert!(!reg.get(9).unwrap().eligible);

    // Act
    reg.handle_shell_hook(ShellHookKind::WindowActivated, 1);

    // Assert
    assert_eq!(state(&reg, 9), WindowState::Hidden);
    assert_eq!(state(&reg, 1), WindowState::Active);
}

#[test]
fn desktop_activation_only_deactivates() {
    let system = FakeSystem::with([(1, FakeWindow::app("A", "a.exe"))]);
    system.set_foreground(Some(1));
    let mut reg = registry(&system);
    reg.initialize();

    reg.handle_shell_hook(ShellHookKind::WindowActivated, 0);

    assert_eq!(state(&reg, 1), WindowState::Inactive);
    assert_eq!(reg.len(), 1);
    assert!(reg.active().is_none());
}

#[test]
fn at_most_one_window_is_active_for_any_prefix() {
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (2, FakeWindow::app("B", "b.exe")),
        (3, FakeWindow::app("C", "c.exe")),
    ]);
    let mut reg = registry(&system);
    let stream = [
        (ShellHookKind::WindowCreated, 1),
        (ShellHookKind::WindowActivated, 1),
        (ShellHookKind::WindowActivated, 2),
        (ShellHookKind::Flash, 3),
        (ShellHookKind::RudeAppActivated, 3),
        (ShellHookKind::WindowReplacing, 3),
        (ShellHookKind::WindowActivated, 1),
        (ShellHookKind::WindowDestroyed, 1),
        (ShellHookKind::WindowActivated, 2),
        (ShellHookKind::Flash, 2),
        (ShellHookKind::WindowActivated, 0),
    ];

    for (kind, hwnd) in stream {
        reg.handle_shell_hook(kind, hwnd);
        let active = reg
            .windows()
            .iter()
            .filter(|w| w.state == WindowState::Active)
            .count();
        assert!(active <= 1, "{active} active after {kind:?} 0x{hwnd:X}");
    }
}

#[test]
fn flash_for_ineligible_untracked_window_changes_nothing() {
    // Arrange
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (9, FakeWindow::tool("Notifier", "a.exe")),
    ]);
    let mut reg = registry(&system);
    reg.initialize();
    let before = reg.snapshot();
    let seen = recorder(&mut reg);

    // Act
    reg.handle_shell_hook(ShellHookKind::Flash, 9);

    // Assert
    assert_eq!(reg.snapshot(), before);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn flash_marks_tracked_window_but_not_the_active_one() {
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (2, FakeWindow::app("B", "b.exe")),
        (3, FakeWindow::app("C", "c.exe")),
    ]);
    system.set_foreground(Some(1));
    let mut reg = registry(&system);
    reg.initialize();

    reg.handle_shell_hook(ShellHookKind::Flash, 1);
    reg.handle_shell_hook(ShellHookKind::Flash, 2);

    assert_eq!(state(&reg, 1), WindowState::Active);
    assert_eq!(state(&reg, 2), WindowState::Flashing);

    reg.handle_shell_hook(ShellHookKind::WindowActivated, 2);
    assert_eq!(state(&reg, 2), WindowState::Active);
}

#[test]
fn flash_for_eligible_untracked_window_adds_it_flashing() {
    let system = FakeSystem::with([(4, FakeWindow::app("Chat", "chat.exe"))]);
    let mut reg = registry(&system);

    reg.handle_shell_hook(ShellHookKind::Flash, 4);

    assert_eq!(state(&reg, 4), WindowState::Flashing);
}

#[test]
fn replacing_resets_tracked_window_or_adds_new_one() {
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (2, FakeWindow::app("B", "b.exe")),
    ]);
    system.set_foreground(Some(1));
    let mut reg = registry(&system);
    reg.initialize();
    reg.handle_shell_hook(ShellHookKind::WindowDestroyed, 2);

    reg.handle_shell_hook(ShellHookKind::WindowReplacing, 1);
    reg.handle_shell_hook(ShellHookKind::WindowReplacing, 2);

    assert_eq!(state(&reg, 1), WindowState::Inactive);
    assert_eq!(state(&reg, 2), WindowState::Inactive);
}

#[test]
fn redraw_refreshes_window_and_siblings() {
    // Arrange
    let system = FakeSystem::with([
        (1, FakeWindow::app("Doc1", "word.exe")),
        (2, FakeWindow::app("Doc2", "word.exe")),
    ]);
    let mut reg = registry(&system);
    reg.initialize();
    reg.take_icon_requests();
    system.update(1, |w| w.title = "Doc1*".into());
    system.update(2, |w| w.title = "Doc2*".into());
    let seen = recorder(&mut reg);

    // Act
    reg.handle_shell_hook(ShellHookKind::Redraw, 1);

    // Assert
    assert_eq!(reg.get(1).unwrap().title, "Doc1*");
    assert_eq!(reg.get(2).unwrap().title, "Doc2*");
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            RegistryChange::Updated {
                hwnd: 1,
                field: WindowField::Title
            },
            RegistryChange::Updated {
                hwnd: 2,
                field: WindowField::Title
            },
        ]
    );
    assert_eq!(reg.take_icon_requests().len(), 2);
}

#[test]
fn monitor_change_updates_the_monitor() {
    let system = FakeSystem::with([(1, FakeWindow::app("A", "a.exe"))]);
    let mut reg = registry(&system);
    reg.initialize();
    system.update(1, |w| w.monitor = Some("DISPLAY2".into()));

    reg.handle_shell_hook(ShellHookKind::MonitorChanged, 1);

    assert_eq!(reg.get(1).unwrap().monitor.as_deref(), Some("DISPLAY2"));
}

#[test]
fn uncloak_rechecks_eligibility() {
    // Arrange
    let mut host = FakeWindow::app("Store", "frame.exe");
    host.cloaked = true;
    let system = FakeSystem::with([(1, host)]);
    let mut reg = registry(&system);
    reg.handle_shell_hook(ShellHookKind::WindowCreated, 1);
    assert!(reg.is_empty());

    // Act
    system.update(1, |w| w.cloaked = false);
    reg.handle_uncloaked(1);

    // Assert
    assert!(reg.get(1).unwrap().eligible);
}

#[test]
fn progress_updates_apply_only_to_tracked_windows() {
    // Arrange
    let system = FakeSystem::with([(1, FakeWindow::app("Copy", "explorer.exe"))]);
    let mut reg = registry(&system);
    reg.initialize();
    let value = TaskbarListCommand {
        hwnd: 1,
        op: TaskbarListOp::SetProgressValue { value: 32767 },
    };
    let paused = TaskbarListCommand {
        hwnd: 1,
        op: TaskbarListOp::SetProgressState {
            state: ProgressState::Paused,
        },
    };
    let stranger = TaskbarListCommand {
        hwnd: 9,
        op: TaskbarListOp::SetProgressValue { value: 10 },
    };

    // Act
    let applied = [
        reg.apply_taskbar_list(&value),
        reg.apply_taskbar_list(&paused),
        reg.apply_taskbar_list(&stranger),
    ];

    // Assert
    assert_eq!(applied, [true, true, false]);
    let window = reg.get(1).unwrap();
    assert_eq!(window.progress_value, 32767);
    assert_eq!(window.progress_state, ProgressState::Paused);
    assert!(!reg.contains(9));
}

#[test]
fn tab_commands_are_acknowledged_without_effect() {
    let system = FakeSystem::with([(1, FakeWindow::app("A", "a.exe"))]);
    let mut reg = registry(&system);
    reg.initialize();
    let before = reg.snapshot();

    for op in [
        TaskbarListOp::RegisterTab,
        TaskbarListOp::SetTabOrder,
        TaskbarListOp::SetOverlayIcon,
        TaskbarListOp::SetThumbnailClip,
    ] {
        assert!(!reg.apply_taskbar_list(&TaskbarListCommand { hwnd: 1, op }));
    }

    assert_eq!(reg.snapshot(), before);
}

#[test]
fn icon_is_published_only_when_it_changes() {
    let system = FakeSystem::with([(1, FakeWindow::app("A", "a.exe"))]);
    let mut reg = registry(&system);
    reg.initialize();
    let requests = reg.take_icon_requests();
    assert_eq!(requests[0].exe_path.as_deref(), Some("a.exe"));

    let resolved = IconResolved {
        hwnd: 1,
        icon: Some(IconHandle(0x10)),
    };
    assert!(reg.apply_icon(resolved));
    assert!(!reg.apply_icon(resolved));
    assert!(!reg.apply_icon(IconResolved { hwnd: 1, icon: None }));
    assert_eq!(reg.get(1).unwrap().icon, Some(IconHandle(0x10)));
}

#[test]
fn unanswered_close_removes_only_after_timeout() {
    // Arrange
    let mut hung = FakeWindow::app("Frozen", "frozen.exe");
    hung.hung = true;
    let system = FakeSystem::with([(1, hung)]);
    let mut reg = registry(&system);
    reg.initialize();
    let removed_at = Arc::new(Mutex::new(None));
    let sink = removed_at.clone();
    reg.subscribe(move |change| {
        if *change == RegistryChange::Removed(1) {
            *sink.lock().unwrap() = Some(Instant::now());
        }
    });

    // Act
    let started = Instant::now();
    let outcome = reg.close(1);

    // Assert
    assert_eq!(outcome, CloseOutcome::Removed);
    assert!(!reg.contains(1));
    let removed_at = removed_at.lock().unwrap().unwrap();
    assert!(removed_at.duration_since(started) >= TIMEOUT);
}

#[test]
fn acknowledged_close_reports_whether_window_is_gone() {
    let mut prompting = FakeWindow::app("Unsaved", "editor.exe");
    prompting.closes = false;
    let system = FakeSystem::with([(1, FakeWindow::app("A", "a.exe")), (2, prompting)]);
    let mut reg = registry(&system);
    reg.initialize();

    assert_eq!(reg.close(1), CloseOutcome::Removed);
    assert_eq!(reg.close(2), CloseOutcome::StillPresent);
    assert_eq!(reg.close(3), CloseOutcome::Unknown);
    assert!(reg.contains(2));
}

#[test]
fn toggle_minimizes_active_and_restores_others() {
    let system = FakeSystem::with([
        (1, FakeWindow::app("A", "a.exe")),
        (2, FakeWindow::app("B", "b.exe")),
    ]);
    system.set_foreground(Some(1));
    system.update(2, |w| w.minimized = true);
    let mut reg = registry(&system);
    reg.initialize();

    assert!(reg.toggle(1));
    assert!(reg.toggle(2));
    assert!(!reg.toggle(7));

    assert_eq!(system.calls(), ["minimize 1", "restore 2", "activate 2"]);
}

#[test]
fn commands_ignore_untracked_windows() {
    let system = FakeSystem::with([(1, FakeWindow::app("A", "a.exe"))]);
    let mut reg = registry(&system);
    reg.initialize();

    assert!(reg.show(1));
    assert!(reg.bring_to_front(1));
    assert!(!reg.minimize(2));
    assert!(!reg.restore(2));

    assert_eq!(system.calls(), ["show 1", "activate 1"]);
}

#[test]
fn snapshot_serializes_to_json() {
    let system = FakeSystem::with([(1, FakeWindow::app("A", "a.exe"))]);
    let mut reg = registry(&system);
    reg.initialize();

    let json = serde_json::to_value(reg.snapshot()).unwrap();

    assert_eq!(json[0]["title"], "A");
    assert_eq!(json[0]["state"], "Inactive");
    assert_eq!(json[0]["progress_state"], "NoProgress");
}
