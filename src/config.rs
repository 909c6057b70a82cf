//! Run configuration.
//!
//! Two things are configurable: the downloads directory to organize, and
//! additions to the type-to-category tables.
//!
//! The downloads directory comes from the command line or, failing that, the
//! `DOWNLOADS_DIRECTORY` environment variable (a `.env` file in the working
//! directory is honored). It is validated before anything is touched.
//!
//! # Configuration File Format
//!
//! Category table additions are stored in TOML:
//!
//! ```toml
//! [extensions]
//! heic = "image/heic"
//! torrent = "application/x-bittorrent"
//!
//! [subtypes]
//! "x-bittorrent" = "torrent"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the downloads directory.
pub const DOWNLOADS_DIR_VAR: &str = "DOWNLOADS_DIRECTORY";

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".tidydlrc.toml";

/// Errors that can occur while resolving the run configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// No downloads directory was given on the command line or in the environment.
    MissingRoot,
    /// The downloads directory does not exist.
    RootNotFound(PathBuf),
    /// The downloads directory path exists but is not a directory.
    RootNotDirectory(PathBuf),
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A configured MIME type is not of the form `type/subtype`.
    InvalidMimeType {
        /// The extension the MIME type was configured for.
        extension: String,
        /// The offending value.
        mime: String,
    },
    /// A configured category name cannot be used as a directory name.
    InvalidCategoryName(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingRoot => write!(
                f,
                "No downloads directory given: pass a path or set {}",
                DOWNLOADS_DIR_VAR
            ),
            ConfigError::RootNotFound(path) => {
                write!(f, "Downloads directory not found: {}", path.display())
            }
            ConfigError::RootNotDirectory(path) => {
                write!(f, "Not a directory: {}", path.display())
            }
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidMimeType { extension, mime } => write!(
                f,
                "Invalid MIME type '{}' for extension '{}': expected type/subtype",
                mime, extension
            ),
            ConfigError::InvalidCategoryName(name) => {
                write!(f, "Invalid category name '{}'", name)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolves and validates the downloads directory.
///
/// An explicit path wins over the environment value. Empty values count as
/// missing.
///
/// # Errors
///
/// Returns `ConfigError::MissingRoot` if neither source provides a path,
/// `ConfigError::RootNotFound` if it does not exist and
/// `ConfigError::RootNotDirectory` if it is not a directory.
///
/// # Examples
///
/// ```
/// use tidydl::config::{resolve_root, ConfigError};
///
/// assert!(matches!(resolve_root(None, Some(String::new())), Err(ConfigError::MissingRoot)));
/// ```
pub fn resolve_root(
    explicit: Option<&Path>,
    env_value: Option<String>,
) -> Result<PathBuf, ConfigError> {
    let root = match explicit {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => match env_value {
            Some(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
            _ => return Err(ConfigError::MissingRoot),
        },
    };

    if !root.exists() {
        return Err(ConfigError::RootNotFound(root));
    }
    if !root.is_dir() {
        return Err(ConfigError::RootNotDirectory(root));
    }

    Ok(root)
}

/// Reads the downloads directory from the environment, loading `.env` first.
pub fn root_from_env() -> Option<String> {
    dotenv::dotenv().ok();
    std::env::var(DOWNLOADS_DIR_VAR).ok()
}

/// Additions to the extension and subtype tables.
///
/// Keys are case-insensitive. Entries replace built-in entries with the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// File extension to MIME type (e.g. `heic = "image/heic"`).
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,

    /// MIME subtype to category name (e.g. `"x-bittorrent" = "torrent"`).
    #[serde(default)]
    pub subtypes: BTreeMap<String, String>,
}

impl CategoryConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.tidydlrc.toml` in the current directory
    /// 3. Look for `~/.config/tidydl/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any file found is invalid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("tidydl")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    /// Returns a validation error if an entry is unusable.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that MIME types are `type/subtype` and category names are usable
    /// as directory names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (extension, mime) in &self.extensions {
            let valid = mime
                .split_once('/')
                .is_some_and(|(top, sub)| !top.is_empty() && !sub.is_empty());
            if !valid {
                return Err(ConfigError::InvalidMimeType {
                    extension: extension.clone(),
                    mime: mime.clone(),
                });
            }
        }

        for category in self.subtypes.values() {
            let name = category.trim();
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(ConfigError::InvalidCategoryName(category.clone()));
            }
        }

        Ok(())
    }
}
