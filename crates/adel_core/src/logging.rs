//! Rolling file logs for the dashboard core.
//!
//! Events are `key=value` lines (`event=... module=... status=...`). They
//! carry ids, counts and error codes only; project names, descriptions and
//! draft text never reach the log.
//!
//! # Invariants
//! - One logger per process; repeating the same settings is a no-op.
//! - A second init with other settings is rejected, never applied.
//! - Initialization does not panic.

use crate::config::DashboardConfig;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "adel";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 4 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 120;
const SUPPORTED_LEVELS: &str = "trace|debug|info|warn|error";

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Normalized logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

impl LogSettings {
    /// Validates raw host input.
    pub fn parse(level: &str, log_dir: &str) -> Result<Self, LoggingError> {
        let trimmed = log_dir.trim();
        if trimmed.is_empty() {
            return Err(LoggingError::InvalidDirectory {
                dir: String::new(),
                reason: "log directory cannot be empty",
            });
        }
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: absolute_dir(Path::new(trimmed))?,
        })
    }

    /// Logs go to `logs/` next to the configured database file.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, LoggingError> {
        let parent = config
            .db_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .ok_or_else(|| LoggingError::InvalidDirectory {
                dir: config.db_path.display().to_string(),
                reason: "database path has no parent directory",
            })?;
        Ok(Self {
            level: normalize_level(&config.log_level)?,
            log_dir: absolute_dir(&parent.join("logs"))?,
        })
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDirectory { dir: String, reason: &'static str },
    CreateDir { dir: PathBuf, source: std::io::Error },
    /// Logging already runs with different settings.
    Conflict { active: LogSettings, requested: LogSettings },
    Backend(FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => {
                write!(f, "unsupported log level `{level}`; expected {SUPPORTED_LEVELS}")
            }
            Self::InvalidDirectory { dir, reason } => write!(f, "{reason}: `{dir}`"),
            Self::CreateDir { dir, source } => {
                write!(f, "failed to create log directory `{}`: {source}", dir.display())
            }
            Self::Conflict { active, requested } => write!(
                f,
                "logging already initialized with level `{}` at `{}`; refusing to switch to level `{}` at `{}`",
                active.level,
                active.log_dir.display(),
                requested.level,
                requested.log_dir.display()
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FlexiLoggerError> for LoggingError {
    fn from(value: FlexiLoggerError) -> Self {
        Self::Backend(value)
    }
}

/// Starts file logging from raw host input (`level`, absolute `log_dir`).
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    init_with(LogSettings::parse(level, log_dir)?)
}

pub fn init_logging_from_config(config: &DashboardConfig) -> Result<(), LoggingError> {
    init_with(LogSettings::from_config(config)?)
}

/// Settings of the running logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE_LOGGER.get().map(|active| active.settings.clone())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn init_with(requested: LogSettings) -> Result<(), LoggingError> {
    let active = ACTIVE_LOGGER.get_or_try_init(|| start(&requested))?;
    if active.settings == requested {
        Ok(())
    } else {
        Err(LoggingError::Conflict {
            active: active.settings.clone(),
            requested,
        })
    }
}

fn start(settings: &LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.log_dir).map_err(|source| LoggingError::CreateDir {
        dir: settings.log_dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(settings.level)?
        .log_to_file(
            FileSpec::default()
                .directory(settings.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    install_panic_hook();
    info!(
        "event=logging_start module=core status=ok level={} platform={} version={}",
        settings.level,
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        settings: settings.clone(),
        _handle: handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        _ => Err(LoggingError::UnsupportedLevel(level.trim().to_string())),
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, LoggingError> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Err(LoggingError::InvalidDirectory {
            dir: dir.display().to_string(),
            reason: "log directory must be absolute",
        })
    }
}

// Called only from `start`, which the OnceCell runs at most once.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        error!(
            "event=panic module=core status=error location={} payload={}",
            location,
            one_line(&panic_text(info), MAX_PANIC_PAYLOAD_CHARS)
        );
        previous(info);
    }));
}

fn panic_text(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

fn one_line(value: &str, max_chars: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
