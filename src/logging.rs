//! Per-run log file.
//!
//! Every run writes a timestamped file `logfile_<ddmmyy_HHMMSS>.log` into a
//! `logs/` directory next to the executable (or a directory given on the
//! command line). The subscriber is installed for the lifetime of a [`RunLog`]
//! and removed again when it is dropped.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "tidydl=debug";

/// Errors that can occur while setting up the run log.
#[derive(Debug)]
pub enum LogError {
    /// The log directory could not be created.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The log file could not be created.
    FileCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => write!(
                f,
                "Failed to create log directory {}: {}",
                path.display(),
                source
            ),
            Self::FileCreationFailed { path, source } => write!(
                f,
                "Failed to create log file {}: {}",
                path.display(),
                source
            ),
        }
    }
}

impl std::error::Error for LogError {}

/// Returns the default log directory: `logs/` next to the running executable.
pub fn default_log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Returns the file name for a log started at `time`.
///
/// ```
/// use chrono::TimeZone;
/// use tidydl::logging::log_file_name;
///
/// let time = chrono::Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(log_file_name(&time), "logfile_090324_140507.log");
/// ```
pub fn log_file_name<Tz>(time: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("logfile_{}.log", time.format("%d%m%y_%H%M%S"))
}

/// An active per-run log. Logging goes to the file until this is dropped.
pub struct RunLog {
    path: PathBuf,
    _guard: DefaultGuard,
}

impl RunLog {
    /// Creates `log_dir` if needed, opens a new timestamped log file in it and
    /// installs it as the default subscriber for the current thread.
    pub fn init(log_dir: &Path) -> Result<Self, LogError> {
        fs::create_dir_all(log_dir).map_err(|e| LogError::DirectoryCreationFailed {
            path: log_dir.to_path_buf(),
            source: e,
        })?;

        let path = log_dir.join(log_file_name(&chrono::Local::now()));
        let file = File::create(&path).map_err(|e| LogError::FileCreationFailed {
            path: path.clone(),
            source: e,
        })?;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .finish();

        let guard = tracing::subscriber::set_default(subscriber);
        tracing::debug!("Log started: {}", path.display());

        Ok(Self {
            path,
            _guard: guard,
        })
    }

    /// Path of the log file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the log file.
    pub fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }
}
