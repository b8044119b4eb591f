#[cfg(windows)]
pub fn execute(json: bool) {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
    use dockhand_core::Rect;

    let monitors = match dockhand_windows::enumerate_monitors() {
        Ok(monitors) => monitors,
        Err(e) => {
            eprintln!("Error: could not enumerate monitors: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&monitors) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: could not serialize monitors: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let format_rect = |r: Rect| format!("{}x{} at ({}, {})", r.width, r.height, r.x, r.y);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#"),
            Cell::new("Device"),
            Cell::new("Bounds"),
            Cell::new("Work area"),
            Cell::new("Scale").set_alignment(CellAlignment::Right),
            Cell::new("Primary"),
        ]);

    for (index, monitor) in monitors.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index),
            Cell::new(&monitor.device_name),
            Cell::new(format_rect(monitor.bounds)),
            Cell::new(format_rect(monitor.work_area)),
            Cell::new(format!("{:.2}", monitor.dpi_scale)).set_alignment(CellAlignment::Right),
            Cell::new(if monitor.primary { "yes" } else { "" }),
        ]);
    }

    println!("{table}");
    println!("\n{} monitors found", monitors.len());
}

#[cfg(not(windows))]
pub fn execute(_json: bool) {
    super::super::windows_only("debug monitors");
}
