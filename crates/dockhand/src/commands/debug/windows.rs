#[cfg(windows)]
pub fn execute(json: bool) {
    use std::time::Duration;

    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, ContentArrangement, Table};
    use dockhand_core::WindowRegistry;
    use dockhand_windows::Win32WindowSystem;

    // Close is never called here, so the timeout is irrelevant.
    let mut registry = WindowRegistry::new(Win32WindowSystem::new(), Duration::ZERO);
    registry.initialize();

    if json {
        match serde_json::to_string_pretty(&registry.snapshot()) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: could not serialize windows: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HWND"),
            Cell::new("State"),
            Cell::new("Title"),
            Cell::new("Executable"),
            Cell::new("Monitor"),
        ]);

    for window in registry.windows() {
        let exe = window
            .exe_path
            .as_deref()
            .and_then(|p| p.rsplit(['\\', '/']).next())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(format!("0x{:X}", window.hwnd)),
            Cell::new(format!("{:?}", window.state)),
            Cell::new(&window.title),
            Cell::new(exe),
            Cell::new(window.monitor.as_deref().unwrap_or_default()),
        ]);
    }

    println!("{table}");
    println!("\n{} windows tracked", registry.len());
}

#[cfg(not(windows))]
pub fn execute(_json: bool) {
    super::super::windows_only("debug windows");
}
