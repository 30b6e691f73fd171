//! Chat transcript logging to disk, plus tracing setup.
//!
//! When enabled, appends formatted lines to daily log files named
//! `<target>_<date>.log` under the configured log directory
//! (default: `~/.local/share/tabirc/logs/`).

use crate::app::state::{Line, LineKind, SessionKey};
use crate::config::model::LoggingConfig;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Route `tracing` output to a file so it never fights the terminal UI.
/// `RUST_LOG` controls the filter; the default is quiet.
pub fn init_tracing() -> anyhow::Result<()> {
    let dir = dirs::data_local_dir()
        .map(|d| d.join("tabirc"))
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)?;
    let file = File::create(dir.join("tabirc.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Writes chat lines to per-channel/query daily log files.
///
/// File handles are cached for the lifetime of the logger. A file that
/// cannot be opened is warned about once and skipped.
pub struct ChatLogger {
    enabled: bool,
    log_dir: String,
    log_channels: bool,
    log_queries: bool,
    file_handles: HashMap<String, Option<fs::File>>,
}

impl ChatLogger {
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            log_dir: config.log_dir.clone(),
            log_channels: config.log_channels,
            log_queries: config.log_queries,
            file_handles: HashMap::new(),
        }
    }

    /// Append one line to the right log file. No-op when logging is disabled
    /// or the tab kind is not configured for logging.
    pub fn log_line(&mut self, key: &SessionKey, line: &Line) {
        if !self.enabled {
            return;
        }

        let target = match key {
            SessionKey::Channel(_, chan) if self.log_channels => chan.clone(),
            SessionKey::Query(_, nick) if self.log_queries => nick.clone(),
            _ => return,
        };

        let text = match line.kind {
            LineKind::Error => format!("[{}] !!! {}", line.timestamp, line.text),
            _ => format!("[{}] {}", line.timestamp, line.text),
        };

        // Sanitize target for use as a filename.
        let safe_target: String = target
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        let filename = format!("{}_{}.log", safe_target, date);
        let log_dir = expand_tilde(&self.log_dir);
        let filepath = log_dir.join(&filename);

        let handle = self.file_handles.entry(filename).or_insert_with(|| {
            if let Err(e) = fs::create_dir_all(&log_dir) {
                tracing::warn!("cannot create log directory {:?}: {}", log_dir, e);
                return None;
            }
            match OpenOptions::new().create(true).append(true).open(&filepath) {
                Ok(f) => Some(f),
                Err(e) => {
                    tracing::warn!("cannot open log file {:?}: {}", filepath, e);
                    None
                }
            }
        });

        if let Some(file) = handle {
            let _ = writeln!(file, "{}", text);
        }
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
