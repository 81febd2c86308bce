//! User-facing notifications: coloured console lines plus an append-only log
//!
//! Each notification is printed with a status glyph and appended to the log
//! file as `[YYYY-MM-DD HH:MM:SS] LEVEL: message`. Components receive an
//! `Arc<dyn Notifier>` so tests can swap in a [`RecordingNotifier`].

use chrono::Local;
use colored::Colorize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for operator-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Format one log file entry
///
/// # Examples
///
/// ```
/// use credential_manager::core::notifier::{format_log_line, Level};
///
/// let line = format_log_line("2025-01-02 03:04:05", Level::Warning, "Insecure permissions");
/// assert_eq!(line, "[2025-01-02 03:04:05] WARNING: Insecure permissions\n");
/// ```
pub fn format_log_line(timestamp: &str, level: Level, message: &str) -> String {
    format!("[{}] {}: {}\n", timestamp, level, message)
}

/// Console notifier that mirrors every message into the log file
pub struct ConsoleNotifier {
    log_file: Option<PathBuf>,
    stderr_only: bool,
}

impl ConsoleNotifier {
    /// Console output only, no log file
    pub fn new() -> Self {
        Self {
            log_file: None,
            stderr_only: false,
        }
    }

    /// Console output plus append-only log at `log_file`
    pub fn with_log_file(log_file: impl Into<PathBuf>) -> Self {
        Self {
            log_file: Some(log_file.into()),
            stderr_only: false,
        }
    }

    /// Print every level to stderr, keeping stdout free for `eval`-able output
    pub fn with_stderr_only(mut self, stderr_only: bool) -> Self {
        self.stderr_only = stderr_only;
        self
    }

    fn writes_to_stderr(&self, level: Level) -> bool {
        self.stderr_only || level == Level::Error
    }

    fn append_log(&self, level: Level, message: &str) {
        let Some(path) = &self.log_file else {
            return;
        };

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let line = format_log_line(&timestamp, level, message);

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "failed to append to credential log");
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: Level, message: &str) {
        let glyph = match level {
            Level::Info => "ℹ".blue(),
            Level::Success => "✓".green(),
            Level::Warning => "⚠".yellow(),
            Level::Error => "✗".red(),
        };
        if self.writes_to_stderr(level) {
            eprintln!("{} {}", glyph, message);
        } else {
            println!("{} {}", glyph, message);
        }
        self.append_log(level, message);
    }
}

/// Notifier that keeps messages in memory
#[derive(Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notifications in emission order
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_level_names() {
        assert_eq!(Level::Info.as_str(), "INFO");
        assert_eq!(Level::Success.as_str(), "SUCCESS");
        assert_eq!(Level::Warning.as_str(), "WARNING");
        assert_eq!(Level::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_console_notifier_appends_to_log() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("credentials.log");

        let notifier = ConsoleNotifier::with_log_file(&log);
        notifier.success("Loaded credentials for stripe");
        notifier.error("Credential file not found");

        let content = fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] SUCCESS: Loaded credentials for stripe"));
        assert!(lines[1].ends_with("] ERROR: Credential file not found"));
    }

    #[test]
    fn test_console_notifier_stream_selection() {
        let notifier = ConsoleNotifier::new();
        assert!(!notifier.writes_to_stderr(Level::Info));
        assert!(!notifier.writes_to_stderr(Level::Success));
        assert!(!notifier.writes_to_stderr(Level::Warning));
        assert!(notifier.writes_to_stderr(Level::Error));

        let notifier = ConsoleNotifier::new().with_stderr_only(true);
        for level in [Level::Info, Level::Success, Level::Warning, Level::Error] {
            assert!(notifier.writes_to_stderr(level));
        }
    }

    #[test]
    fn test_console_notifier_survives_unwritable_log() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("missing-dir").join("credentials.log");

        let notifier = ConsoleNotifier::with_log_file(&log);
        notifier.info("still printed");

        assert!(!log.exists());
    }

    #[test]
    fn test_recording_notifier_filters_by_level() {
        let notifier = RecordingNotifier::new();
        notifier.info("a");
        notifier.warning("b");
        notifier.warning("c");

        assert_eq!(notifier.entries().len(), 3);
        assert_eq!(notifier.messages(Level::Warning), vec!["b", "c"]);
        assert!(notifier.messages(Level::Error).is_empty());
    }
}
