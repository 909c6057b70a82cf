//! tidydl - keeps a downloads directory sorted
//!
//! This library classifies files by MIME type, maintains numbered category
//! directories (`01. Folder`, `02. Document`, ...) at the top level of a
//! downloads directory, and moves loose files and stray folders into them.

pub mod category_dir;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use category_dir::{CategoryDir, CategoryIndex};
pub use config::{CategoryConfig, ConfigError};
pub use file_category::FileClassifier;
pub use file_organizer::{DownloadsOrganizer, OrganizeError, OrganizeReport};
pub use logging::RunLog;

pub use cli::{Cli, run_cli};
