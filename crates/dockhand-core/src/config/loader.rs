use std::path::PathBuf;

use super::Config;

/// Returns the config directory: `~/.config/dockhand/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("dockhand"))
}

/// Returns the config file path: `~/.config/dockhand/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
///
/// Returns `Ok(Config)` on success, or an error string describing
/// what went wrong (IO error, parse error, etc.).
pub fn try_load() -> Result<Config, String> {
    let path = config_path().ok_or("could not determine config path")?;
    let content = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    parse(&content).map_err(|e| format!("{}: {e}", path.display()))
}

/// Loads the configuration from disk, falling back to defaults.
///
/// A missing file silently yields defaults; any other failure is
/// reported on stderr and also yields defaults.
pub fn load() -> Config {
    let exists = config_path().is_some_and(|p| p.exists());
    match try_load() {
        Ok(config) => config,
        Err(_) if !exists => Config::default(),
        Err(e) => {
            eprintln!("Warning: {e}");
            Config::default()
        }
    }
}

/// Parses and validates config file contents.
fn parse(content: &str) -> Result<Config, toml::de::Error> {
    let mut config: Config = toml::from_str(content)?;
    config.validate();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_lives_in_dockhand_dir() {
        let Some(path) = config_path() else {
            return;
        };

        assert!(path.ends_with("dockhand/config.toml") || path.ends_with(r"dockhand\config.toml"));
    }

    #[test]
    fn parse_validates_values() {
        let config = parse("[full_screen]\npoll_interval_ms = 5000\n").unwrap();

        assert_eq!(config.full_screen.poll_interval_ms, 1000);
    }

    #[test]
    fn parse_rejects_unknown_edge() {
        let result = parse("[[dock_bar]]\nedge = \"middle\"\n");

        assert!(result.is_err());
    }
}
