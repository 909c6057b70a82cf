/// Downloads organization: one pass over the top level of a root directory.
///
/// Subdirectories that are not numbered category directories are moved into
/// the Folders directory (`01. Folder`). Files are classified by MIME type and
/// moved into numbered category directories such as `02. Document`, which are
/// created on first use. Failures are isolated per entry: a failed or skipped
/// entry is logged and reported, and the pass carries on.
use crate::category_dir::{self, CategoryDir, CategoryIndex};
use crate::file_category::FileClassifier;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Name of the directory that collects unnumbered subdirectories.
pub const FOLDERS_DIR_NAME: &str = "01. Folder";

/// Whether a moved entry was a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// A single relocation performed (or planned, in dry-run mode) during a pass.
#[derive(Debug, Clone)]
pub struct Move {
    pub kind: EntryKind,
    /// The path of the entry before organization.
    pub source: PathBuf,
    /// The path of the entry after organization.
    pub destination: PathBuf,
    /// Name of the directory the entry was moved into, e.g. `02. Document`.
    pub category: String,
}

/// What happened to one top-level entry.
#[derive(Debug, Clone)]
pub enum Outcome {
    Moved(Move),
    /// Already organized: the Folders directory or a numbered category directory.
    Kept(PathBuf),
    /// Left in place on purpose, e.g. because the destination name is taken.
    Skipped { path: PathBuf, reason: String },
    Failed { path: PathBuf, reason: String },
}

/// Progress notifications emitted while a pass runs.
#[derive(Debug)]
pub enum Progress<'a> {
    /// The pass is about to process `total` entries.
    Started { total: usize },
    /// A category directory was created (or would be, in dry-run mode).
    CreatedDir(&'a Path),
    Entry(&'a Outcome),
}

/// Errors that can occur during organization.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to move an entry into its destination directory.
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// An entry with the destination name already exists.
    DestinationExists { path: PathBuf },
    /// The root directory path is invalid or doesn't exist.
    InvalidBasePath { path: PathBuf, source: io::Error },
    /// The root directory could not be listed.
    RootUnreadable { path: PathBuf, source: io::Error },
    /// Every category number is taken.
    NumbersExhausted { category: String },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DestinationExists { path } => {
                write!(f, "Destination already exists: {}", path.display())
            }
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::RootUnreadable { path, source } => {
                write!(f, "Cannot read directory {}: {}", path.display(), source)
            }
            Self::NumbersExhausted { category } => {
                write!(f, "No category number left for {}", category)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Creates `path` and any missing parents. Succeeds if it already exists.
///
/// A permission failure is logged as a warning before the error is returned.
pub fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(path).map_err(|e| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            warn!(
                "Permission denied. Cannot create directory '{}'.",
                path.display()
            );
        }
        OrganizeError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// Moves `source` to `destination`.
///
/// Falls back to copy-then-delete when the two paths are on different
/// filesystems. Directories are copied recursively.
pub fn relocate(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                "Cross-device move of {}, copying instead",
                source.display()
            );
            copy_recursive(source, destination)?;
            if fs::symlink_metadata(source)?.is_dir() {
                fs::remove_dir_all(source)
            } else {
                fs::remove_file(source)
            }
        }
        result => result,
    }
}

fn copy_recursive(source: &Path, destination: &Path) -> io::Result<()> {
    if fs::symlink_metadata(source)?.is_dir() {
        fs::create_dir(destination)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &destination.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(source, destination).map(|_| ())
    }
}

/// Moves `source` into `dest_dir`, keeping its name.
///
/// Never overwrites: if `dest_dir` already holds an entry with the same name,
/// returns `OrganizeError::DestinationExists`.
///
/// # Examples
///
/// ```no_run
/// use tidydl::file_organizer::move_into;
/// use std::path::Path;
///
/// let moved = move_into(
///     Path::new("/home/user/Downloads/report.pdf"),
///     Path::new("/home/user/Downloads/02. Document"),
/// );
/// match moved {
///     Ok(path) => println!("Now at {}", path.display()),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn move_into(source: &Path, dest_dir: &Path) -> OrganizeResult<PathBuf> {
    let destination = destination_for(source, dest_dir)?;

    if fs::symlink_metadata(&destination).is_ok() {
        return Err(OrganizeError::DestinationExists { path: destination });
    }

    relocate(source, &destination).map_err(|e| OrganizeError::MoveFailed {
        source: source.to_path_buf(),
        destination: destination.clone(),
        source_error: e,
    })?;

    Ok(destination)
}

fn destination_for(source: &Path, dest_dir: &Path) -> OrganizeResult<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| OrganizeError::MoveFailed {
            source: source.to_path_buf(),
            destination: dest_dir.to_path_buf(),
            source_error: io::Error::new(
                io::ErrorKind::InvalidInput,
                "entry has no name component",
            ),
        })?;
    Ok(dest_dir.join(file_name))
}

/// Summary of one organization pass.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// True if nothing was changed on disk.
    pub dry_run: bool,
    /// Subdirectories moved into the Folders directory.
    pub moved_dirs: Vec<Move>,
    /// Files moved into category directories.
    pub moved_files: Vec<Move>,
    /// Directories left in place because they are already organized.
    pub kept: Vec<PathBuf>,
    /// Entries left in place, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Entries that could not be processed, with the error.
    pub failed: Vec<(PathBuf, String)>,
    /// Directories created by the pass (or that would be, in dry-run mode).
    pub created_dirs: Vec<PathBuf>,
}

impl OrganizeReport {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Moved(mv) => match mv.kind {
                EntryKind::Directory => self.moved_dirs.push(mv),
                EntryKind::File => self.moved_files.push(mv),
            },
            Outcome::Kept(path) => self.kept.push(path),
            Outcome::Skipped { path, reason } => self.skipped.push((path, reason)),
            Outcome::Failed { path, reason } => self.failed.push((path, reason)),
        }
    }

    /// Total number of entries moved.
    pub fn total_moved(&self) -> usize {
        self.moved_dirs.len() + self.moved_files.len()
    }

    /// Returns true if no entry failed or was skipped.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// Number of moved entries per destination directory name.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for mv in self.moved_dirs.iter().chain(&self.moved_files) {
            *counts.entry(mv.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// A top-level entry of the root directory.
struct RootEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Organizes the top level of a downloads directory.
///
/// # Examples
///
/// ```no_run
/// use tidydl::file_category::FileClassifier;
/// use tidydl::file_organizer::DownloadsOrganizer;
///
/// let organizer = DownloadsOrganizer::new("/home/user/Downloads", FileClassifier::default());
/// match organizer.run() {
///     Ok(report) => println!("Moved {} entries", report.total_moved()),
///     Err(e) => eprintln!("Organization failed: {}", e),
/// }
/// ```
pub struct DownloadsOrganizer {
    root: PathBuf,
    classifier: FileClassifier,
    dry_run: bool,
    excluded: Vec<PathBuf>,
}

impl DownloadsOrganizer {
    pub fn new(root: impl Into<PathBuf>, classifier: FileClassifier) -> Self {
        Self {
            root: root.into(),
            classifier,
            dry_run: false,
            excluded: Vec::new(),
        }
    }

    /// In dry-run mode the pass reports what it would do without touching the disk.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Never move `path`. If `path` lies deeper inside the root, the
    /// top-level entry that contains it is kept instead.
    pub fn exclude(mut self, path: impl AsRef<Path>) -> Self {
        let path = canonical(path.as_ref());
        let root = canonical(&self.root);
        let top_level = path
            .strip_prefix(&root)
            .ok()
            .and_then(|rel| rel.components().next())
            .map(|first| root.join(first));
        self.excluded.push(top_level.unwrap_or(path));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folders_dir(&self) -> PathBuf {
        self.root.join(FOLDERS_DIR_NAME)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Runs one organization pass.
    pub fn run(&self) -> OrganizeResult<OrganizeReport> {
        self.run_with(|_| {})
    }

    /// Runs one organization pass, reporting progress to `on_progress`.
    ///
    /// Directories are processed before files, each in name order, so number
    /// allocation is reproducible.
    ///
    /// # Errors
    ///
    /// Only fails if the root is not a directory or cannot be listed. Errors
    /// on individual entries are collected in the report.
    pub fn run_with<F>(&self, mut on_progress: F) -> OrganizeResult<OrganizeReport>
    where
        F: FnMut(Progress<'_>),
    {
        if !self.root.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: self.root.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "not an existing directory"),
            });
        }

        info!(
            "Organizing {}{}",
            self.root.display(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        let mut report = OrganizeReport::new(self.dry_run);

        let folders_dir = self.folders_dir();
        let folders_existed = folders_dir.is_dir();
        let folders_ready = match self.prepare_dir(&folders_dir) {
            Ok(()) => {
                if !folders_existed {
                    on_progress(Progress::CreatedDir(&folders_dir));
                    report.created_dirs.push(folders_dir.clone());
                }
                true
            }
            Err(e) => {
                error!("Folders directory unavailable, subdirectories stay in place: {}", e);
                false
            }
        };

        let entries = self.list_entries()?;

        let mut index = CategoryIndex::scan(&self.root).map_err(|e| {
            OrganizeError::RootUnreadable {
                path: self.root.clone(),
                source: e,
            }
        })?;
        if self.dry_run
            && folders_ready
            && !folders_existed
            && let Some(folders) = CategoryDir::parse(FOLDERS_DIR_NAME)
        {
            index.insert(folders);
        }

        on_progress(Progress::Started {
            total: entries.len(),
        });

        let (dirs, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|e| e.is_dir);

        for entry in &dirs {
            let outcome = self.organize_dir(entry, &folders_dir, folders_ready);
            on_progress(Progress::Entry(&outcome));
            report.record(outcome);
        }

        for entry in &files {
            let outcome = self.organize_file(entry, &mut index, &mut report, &mut on_progress);
            on_progress(Progress::Entry(&outcome));
            report.record(outcome);
        }

        info!(
            "Pass finished: {} moved, {} skipped, {} failed",
            report.total_moved(),
            report.skipped.len(),
            report.failed.len()
        );

        Ok(report)
    }

    /// Creates `path`. A dry run only checks that nothing else occupies it.
    fn prepare_dir(&self, path: &Path) -> OrganizeResult<()> {
        if !self.dry_run {
            return ensure_dir(path);
        }
        if fs::symlink_metadata(path).is_ok() && !path.is_dir() {
            return Err(OrganizeError::DirectoryCreationFailed {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "occupied by something that is not a directory",
                ),
            });
        }
        Ok(())
    }

    /// Lists the top level of the root, sorted by name, without excluded entries.
    fn list_entries(&self) -> OrganizeResult<Vec<RootEntry>> {
        let read_dir = fs::read_dir(&self.root).map_err(|e| OrganizeError::RootUnreadable {
            path: self.root.clone(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Error reading entry in {}: {}", self.root.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            if self.is_excluded(&path) {
                debug!("Excluded: {}", path.display());
                continue;
            }

            // Follows symlinks; dangling links are neither files nor directories
            let Ok(metadata) = fs::metadata(&path) else {
                debug!("Skipping unresolvable entry {}", path.display());
                continue;
            };
            if !metadata.is_dir() && !metadata.is_file() {
                continue;
            }

            entries.push(RootEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                is_dir: metadata.is_dir(),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        let path = canonical(path);
        self.excluded.iter().any(|excluded| *excluded == path)
    }

    fn organize_dir(&self, entry: &RootEntry, folders_dir: &Path, folders_ready: bool) -> Outcome {
        if entry.path == folders_dir || category_dir::is_numbered(&entry.name) {
            debug!("Keeping category directory {}", entry.name);
            return Outcome::Kept(entry.path.clone());
        }

        if !folders_ready {
            return Outcome::Failed {
                path: entry.path.clone(),
                reason: format!("{} is unavailable", FOLDERS_DIR_NAME),
            };
        }

        self.move_entry(entry, EntryKind::Directory, folders_dir, FOLDERS_DIR_NAME)
    }

    fn organize_file<F>(
        &self,
        entry: &RootEntry,
        index: &mut CategoryIndex,
        report: &mut OrganizeReport,
        on_progress: &mut F,
    ) -> Outcome
    where
        F: FnMut(Progress<'_>),
    {
        let mime_type = self.classifier.mime_type(&entry.path);
        let category = self.classifier.category_for_mime(mime_type.as_deref());
        debug!(
            "{} classified as {} ({})",
            entry.name,
            category,
            mime_type.as_deref().unwrap_or("unknown type")
        );

        let Some(target) = index.resolve(&category) else {
            let e = OrganizeError::NumbersExhausted { category };
            error!("Error organizing {}: {}", entry.name, e);
            return Outcome::Failed {
                path: entry.path.clone(),
                reason: e.to_string(),
            };
        };
        let dest_dir = self.root.join(target.dir_name());

        if index.find(&category).is_none() {
            let existed = dest_dir.is_dir();
            if let Err(e) = self.prepare_dir(&dest_dir) {
                error!("Error creating directory for {}: {}", entry.name, e);
                return Outcome::Failed {
                    path: entry.path.clone(),
                    reason: e.to_string(),
                };
            }
            if !existed {
                on_progress(Progress::CreatedDir(&dest_dir));
                report.created_dirs.push(dest_dir.clone());
            }
            index.insert(target.clone());
        }

        self.move_entry(entry, EntryKind::File, &dest_dir, target.dir_name())
    }

    fn move_entry(
        &self,
        entry: &RootEntry,
        kind: EntryKind,
        dest_dir: &Path,
        category: &str,
    ) -> Outcome {
        let label = match kind {
            EntryKind::Directory => "directory",
            EntryKind::File => "file",
        };

        let result = if self.dry_run {
            destination_for(&entry.path, dest_dir).and_then(|destination| {
                if fs::symlink_metadata(&destination).is_ok() {
                    Err(OrganizeError::DestinationExists { path: destination })
                } else {
                    Ok(destination)
                }
            })
        } else {
            move_into(&entry.path, dest_dir)
        };

        match result {
            Ok(destination) => {
                info!("Moved {} {} to {}", label, entry.name, category);
                Outcome::Moved(Move {
                    kind,
                    source: entry.path.clone(),
                    destination,
                    category: category.to_string(),
                })
            }
            Err(OrganizeError::DestinationExists { path }) => {
                warn!(
                    "Not moving {} {}: {} already exists",
                    label,
                    entry.name,
                    path.display()
                );
                Outcome::Skipped {
                    path: entry.path.clone(),
                    reason: format!("{} already contains {}", category, entry.name),
                }
            }
            Err(e) => {
                error!("Error moving {} {}: {}", label, entry.name, e);
                Outcome::Failed {
                    path: entry.path.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organizer(root: &Path) -> DownloadsOrganizer {
        DownloadsOrganizer::new(root, FileClassifier::default())
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("a").join("b");

        ensure_dir(&path).expect("First creation failed");
        ensure_dir(&path).expect("Second creation failed");
        assert!(path.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_on_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("taken");
        fs::write(&path, "x").expect("Failed to write file");

        let result = ensure_dir(&path);
        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
    }

    #[test]
    fn test_move_into_moves_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("test.txt");
        let dest_dir = temp_dir.path().join("04. Text");
        fs::write(&file_path, "test content").expect("Failed to write test file");
        fs::create_dir(&dest_dir).expect("Failed to create dir");

        let moved = move_into(&file_path, &dest_dir).expect("Failed to move file");

        assert_eq!(moved, dest_dir.join("test.txt"));
        assert!(!file_path.exists());
        assert_eq!(fs::read_to_string(moved).unwrap(), "test content");
    }

    #[test]
    fn test_move_into_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("test.txt");
        let dest_dir = temp_dir.path().join("04. Text");
        fs::write(&file_path, "new").expect("Failed to write test file");
        fs::create_dir(&dest_dir).expect("Failed to create dir");
        fs::write(dest_dir.join("test.txt"), "old").expect("Failed to write test file");

        let result = move_into(&file_path, &dest_dir);

        assert!(matches!(result, Err(OrganizeError::DestinationExists { .. })));
        assert!(file_path.exists());
        assert_eq!(fs::read_to_string(dest_dir.join("test.txt")).unwrap(), "old");
    }

    #[test]
    fn test_run_invalid_base_path() {
        let result = organizer(Path::new("/non/existent/path")).run();
        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
    }

    #[test]
    fn test_run_creates_folders_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report = organizer(temp_dir.path()).run().expect("Run failed");

        assert!(temp_dir.path().join(FOLDERS_DIR_NAME).is_dir());
        assert_eq!(report.created_dirs, vec![temp_dir.path().join(FOLDERS_DIR_NAME)]);
        assert_eq!(report.total_moved(), 0);
    }

    #[test]
    fn test_run_moves_unnumbered_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("MyStuff")).unwrap();
        fs::write(root.join("MyStuff").join("inner.txt"), "x").unwrap();
        fs::create_dir(root.join("05. Video")).unwrap();

        let report = organizer(root).run().expect("Run failed");

        assert!(root.join(FOLDERS_DIR_NAME).join("MyStuff").join("inner.txt").exists());
        assert!(!root.join("MyStuff").exists());
        assert!(root.join("05. Video").is_dir());
        assert_eq!(report.moved_dirs.len(), 1);
        assert_eq!(report.kept.len(), 2);
    }

    #[test]
    fn test_run_allocates_next_number() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("03. Image")).unwrap();
        fs::write(root.join("report.pdf"), "%PDF").unwrap();

        let report = organizer(root).run().expect("Run failed");

        assert!(root.join("04. Document").join("report.pdf").exists());
        assert_eq!(report.moved_files[0].category, "04. Document");
    }

    #[test]
    fn test_run_reuses_category_across_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.pdf"), "a").unwrap();
        fs::write(root.join("b.pdf"), "b").unwrap();

        let report = organizer(root).run().expect("Run failed");

        assert!(root.join("02. Document").join("a.pdf").exists());
        assert!(root.join("02. Document").join("b.pdf").exists());
        assert_eq!(report.category_counts().get("02. Document"), Some(&2));
        assert_eq!(report.created_dirs.len(), 2);
    }

    #[test]
    fn test_run_skips_name_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join(FOLDERS_DIR_NAME).join("Photos")).unwrap();
        fs::create_dir(root.join("Photos")).unwrap();

        let report = organizer(root).run().expect("Run failed");

        assert!(root.join("Photos").is_dir());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.failed.is_empty());
        assert!(!report.is_complete_success());
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("MyStuff")).unwrap();
        fs::write(root.join("report.pdf"), "%PDF").unwrap();

        let report = organizer(root).dry_run(true).run().expect("Run failed");

        assert!(report.dry_run);
        assert!(root.join("MyStuff").is_dir());
        assert!(root.join("report.pdf").is_file());
        assert!(!root.join(FOLDERS_DIR_NAME).exists());
        assert_eq!(report.moved_dirs.len(), 1);
        assert_eq!(report.moved_files[0].category, "02. Document");
        assert_eq!(
            report.moved_files[0].destination,
            root.join("02. Document").join("report.pdf")
        );
    }

    #[test]
    fn test_excluded_entry_stays() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("logs")).unwrap();

        let report = organizer(root)
            .exclude(root.join("logs"))
            .run()
            .expect("Run failed");

        assert!(root.join("logs").is_dir());
        assert!(report.moved_dirs.is_empty());
    }

    #[test]
    fn test_excluding_nested_path_keeps_top_level_entry() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("logs").join("run1")).unwrap();
        fs::create_dir(root.join("Stuff")).unwrap();

        let report = organizer(root)
            .exclude(root.join("logs").join("run1"))
            .run()
            .expect("Run failed");

        assert!(root.join("logs").join("run1").is_dir());
        assert!(root.join(FOLDERS_DIR_NAME).join("Stuff").is_dir());
        assert_eq!(report.moved_dirs.len(), 1);
    }

    #[test]
    fn test_dry_run_reports_occupied_folders_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join(FOLDERS_DIR_NAME), "not a directory").unwrap();
        fs::create_dir(root.join("MyStuff")).unwrap();

        let planned = organizer(root).dry_run(true).run().expect("Dry run failed");
        let actual = organizer(root).run().expect("Run failed");

        let failed = |report: &OrganizeReport| -> Vec<PathBuf> {
            report.failed.iter().map(|(path, _)| path.clone()).collect()
        };
        assert_eq!(failed(&planned), vec![root.join("MyStuff")]);
        assert_eq!(failed(&planned), failed(&actual));
        assert!(planned.moved_dirs.is_empty());
        assert!(root.join("MyStuff").is_dir());
    }

    #[test]
    fn test_run_fails_file_when_numbers_are_exhausted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join(format!("{}. Last", i64::MAX))).unwrap();
        fs::write(root.join("report.pdf"), "%PDF").unwrap();

        let report = organizer(root).run().expect("Run failed");

        assert!(root.join("report.pdf").is_file());
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].1.contains("No category number left"));
    }

    #[test]
    fn test_run_keeps_signed_and_wide_prefixes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("-1. Archive")).unwrap();
        fs::create_dir(root.join("4294967296. Big")).unwrap();
        fs::create_dir(root.join("05. Document. Old")).unwrap();
        fs::write(root.join("r.pdf"), "%PDF").unwrap();

        let report = organizer(root).run().expect("Run failed");

        assert!(root.join("-1. Archive").is_dir());
        assert!(root.join("4294967296. Big").is_dir());
        assert!(root.join("05. Document. Old").join("r.pdf").is_file());
        assert!(report.moved_dirs.is_empty());
        assert_eq!(report.created_dirs, vec![root.join(FOLDERS_DIR_NAME)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind root
        let writable = fs::write(locked.join("write-check"), "x").is_ok();
        let result = if writable {
            None
        } else {
            Some(ensure_dir(&locked.join("02. Document")))
        };
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let Some(result) = result else {
            return;
        };
        match result {
            Err(OrganizeError::DirectoryCreationFailed { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("Expected a permission failure, got {:?}", other),
        }
    }

    #[test]
    fn test_progress_events() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "a").unwrap();

        let mut started = None;
        let mut created = 0;
        let mut entries = 0;
        organizer(root)
            .run_with(|progress| match progress {
                Progress::Started { total } => started = Some(total),
                Progress::CreatedDir(_) => created += 1,
                Progress::Entry(_) => entries += 1,
            })
            .expect("Run failed");

        // 01. Folder is listed too, after being created
        assert_eq!(started, Some(2));
        assert_eq!(created, 2);
        assert_eq!(entries, 2);
    }
}
