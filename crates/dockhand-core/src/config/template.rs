/// Generates the default `config.toml` contents with explanatory comments.
///
/// Used by `dockhand init` to create a starter config file that users
/// can immediately edit.
pub fn generate_config() -> String {
    r##"# Dockhand configuration
# Location: ~/.config/dockhand/config.toml

[logging]
# Write a log file to ~/.config/dockhand/logs/dockhand.log
enabled = false
# debug | info | warn | error
level = "info"
# Rotate the log file after this many megabytes (one backup is kept).
max_file_mb = 10

[work_area]
# Let Dockhand write the OS work area after placing dock bars and
# restore it on exit. Leave this off while Explorer's taskbar runs.
manage = false

[full_screen]
# Dock bars drop out of the topmost band while a full-screen app
# covers their monitor.
enabled = true
# How often the foreground window is inspected, in milliseconds.
poll_interval_ms = 100

[windows]
# How long closing a window waits for it to respond before the entry
# is removed anyway, in milliseconds.
close_timeout_ms = 200

# Dock bars, registered in the order listed.
#   edge                  top | bottom | left | right
#   thickness             logical pixels (scaled by monitor DPI)
#   monitor               monitor index; omit for the primary monitor
#   requires_screen_edge  subtract this bar from the OS work area
#   auto_hide             register as auto-hide instead of reserving space
[[dock_bar]]
edge = "top"
thickness = 32
requires_screen_edge = true
auto_hide = false
"##
    .to_string()
}
