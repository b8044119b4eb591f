use std::path::Path;

use dockhand_core::config;

/// Creates the default configuration file at `~/.config/dockhand/`.
///
/// An existing file is never overwritten.
pub fn execute() {
    let Some(dir) = config::config_dir() else {
        eprintln!("Error: could not determine home directory.");
        std::process::exit(1);
    };

    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Error: could not create {}: {e}", dir.display());
        std::process::exit(1);
    }

    write_if_missing(
        &dir.join("config.toml"),
        &config::template::generate_config(),
    );

    println!("\nEdit config.toml to add dock bars or change full-screen and close behaviour.");
}

/// Writes content to a file only if it doesn't already exist.
fn write_if_missing(path: &Path, content: &str) {
    if path.exists() {
        println!("Already exists: {}", path.display());
        return;
    }

    match std::fs::write(path, content) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => eprintln!("Error: could not write {}: {e}", path.display()),
    }
}
