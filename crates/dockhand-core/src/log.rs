//! File-based logger with size-based rotation.
//!
//! Lines go to `~/.config/dockhand/logs/dockhand.log`. Once the file
//! grows past the configured size it is renamed to `dockhand.log.1`
//! (replacing any older backup) and a fresh file is started.
//!
//! Logging must never take the notification pump down with it, so
//! every IO failure here is swallowed.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

static LOGGER: OnceLock<Mutex<LogFile>> = OnceLock::new();

const LOG_FILE_NAME: &str = "dockhand.log";

/// Logging configuration, the `[logging]` table of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Parses a config level name. Unknown names fall back to `Info`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

struct LogFile {
    file: Option<File>,
    path: PathBuf,
    min_level: Level,
    max_bytes: u64,
    written: u64,
}

/// Initialises the global logger. Call once at start-up.
///
/// Does nothing if `config.enabled` is `false` or the log directory
/// cannot be created.
pub fn init(config: &LogConfig) {
    if !config.enabled {
        return;
    }
    let Some(dir) = crate::config::config_dir() else {
        return;
    };
    let log_dir = dir.join("logs");
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    if let Some(log) = LogFile::open(&log_dir.join(LOG_FILE_NAME), config) {
        let _ = LOGGER.set(Mutex::new(log));
    }
}

/// Writes a log line if the level is at or above the configured minimum.
pub fn write(level: Level, args: fmt::Arguments<'_>) {
    let Some(mutex) = LOGGER.get() else {
        return;
    };
    let Ok(mut log) = mutex.lock() else {
        return;
    };
    log.append(level, args);
}

impl LogFile {
    fn open(path: &Path, config: &LogConfig) -> Option<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Some(Self {
            file: Some(file),
            path: path.to_path_buf(),
            min_level: Level::parse(&config.level),
            max_bytes: config.max_file_mb * 1024 * 1024,
            written,
        })
    }

    fn append(&mut self, level: Level, args: fmt::Arguments<'_>) {
        if level < self.min_level {
            return;
        }
        let line = format!("{} [{}] {args}\n", timestamp(), level.label());
        if let Some(file) = self.file.as_mut()
            && file.write_all(line.as_bytes()).is_ok()
        {
            self.written += line.len() as u64;
        }
        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        // The handle must be closed first or Windows refuses the rename.
        self.file = None;
        let _ = fs::rename(&self.path, backup_path(&self.path));
        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .ok();
        self.written = 0;
    }
}

/// `dockhand.log` -> `dockhand.log.1`.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".1");
    PathBuf::from(name)
}

/// UTC wall-clock time of day with milliseconds. No chrono dependency.
fn timestamp() -> String {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = elapsed.as_secs();
    let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}.{:03}", elapsed.subsec_millis())
}

/// Logs at DEBUG level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Debug, format_args!($($arg)*)) };
}

/// Logs at INFO level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Info, format_args!($($arg)*)) };
}

/// Logs at WARN level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Warn, format_args!($($arg)*)) };
}

/// Logs at ERROR level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Error, format_args!($($arg)*)) };
}
