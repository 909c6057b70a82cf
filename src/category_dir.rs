//! Numbered category directories.
//!
//! A category directory lives at the top level of the downloads root and is
//! named `"<NN>. <Name>"`, e.g. `"03. Document"`. Numbers below ten are
//! zero-padded to two digits. This module parses and formats those names and
//! keeps an index of the categories present in a root so that new categories
//! receive the next free number.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Separator between the number and the name of a category directory.
pub const SEPARATOR: &str = ". ";

/// A directory named `"<number>. <name>"`.
///
/// A directory found on disk keeps its original name, so `"2. Document"` is
/// reused as-is rather than recreated as `"02. Document"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDir {
    pub number: i64,
    pub name: String,
    dir_name: String,
}

impl CategoryDir {
    pub fn new(number: i64, name: impl Into<String>) -> Self {
        let name = name.into();
        let dir_name = format!("{}{}{}", format_number(number), SEPARATOR, name);
        Self {
            number,
            name,
            dir_name,
        }
    }

    /// Parses a directory name of the form `"<int>. <name>"`.
    ///
    /// The prefix may be signed and is trimmed. The name is the text up to
    /// the next `". "`, trimmed, so `"05. Document. Old"` is the `Document`
    /// category. Returns `None` when the separator is missing or the prefix is
    /// not an integer that fits in an `i64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidydl::category_dir::CategoryDir;
    ///
    /// let dir = CategoryDir::parse("07. Video").unwrap();
    /// assert_eq!(dir.number, 7);
    /// assert_eq!(dir.name, "Video");
    /// assert!(CategoryDir::parse("Holiday photos").is_none());
    /// assert!(CategoryDir::parse("v2. Draft").is_none());
    /// ```
    pub fn parse(dir_name: &str) -> Option<Self> {
        let (prefix, rest) = dir_name.split_once(SEPARATOR)?;
        let number = prefix.trim().parse::<i64>().ok()?;
        let name = rest.split(SEPARATOR).next().unwrap_or(rest);
        Some(Self {
            number,
            name: name.trim().to_string(),
            dir_name: dir_name.to_string(),
        })
    }

    /// Returns the directory name, e.g. `"01. Folder"`.
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }
}

impl fmt::Display for CategoryDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name)
    }
}

/// Returns true if `dir_name` starts with an integer followed by `". "`.
///
/// Such directories are already organized and stay at the top level. The
/// integer may carry a sign and has no size limit.
pub fn is_numbered(dir_name: &str) -> bool {
    dir_name
        .split_once(SEPARATOR)
        .is_some_and(|(prefix, _)| is_integer(prefix.trim()))
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Formats a category number: two digits below ten, plain decimal otherwise.
///
/// ```
/// use tidydl::category_dir::format_number;
///
/// assert_eq!(format_number(4), "04");
/// assert_eq!(format_number(12), "12");
/// ```
pub fn format_number(number: i64) -> String {
    if (0..10).contains(&number) {
        format!("{:02}", number)
    } else {
        number.to_string()
    }
}

/// The set of category directories in a root, used to reuse or allocate numbers.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    dirs: Vec<CategoryDir>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerates the numbered subdirectories of `root`, in scan order.
    ///
    /// Entries that are not directories or do not match `"<int>. <name>"`
    /// are left out, as are prefixes too large for an `i64`.
    pub fn scan(root: &Path) -> io::Result<Self> {
        let mut index = Self::new();
        for entry in fs::read_dir(root)?.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(dir) = CategoryDir::parse(&entry.file_name().to_string_lossy()) {
                index.insert(dir);
            }
        }
        Ok(index)
    }

    /// Records a category directory.
    pub fn insert(&mut self, dir: CategoryDir) {
        self.dirs.push(dir);
    }

    /// Finds the directory for a category name (exact match).
    pub fn find(&self, name: &str) -> Option<&CategoryDir> {
        self.dirs.iter().find(|dir| dir.name == name)
    }

    /// The highest number in use, if any.
    pub fn max_number(&self) -> Option<i64> {
        self.dirs.iter().map(|dir| dir.number).max()
    }

    /// The number the next new category receives: one past the maximum, and
    /// never below 1. `None` once `i64::MAX` is taken.
    pub fn next_number(&self) -> Option<i64> {
        match self.max_number() {
            Some(max) => max.checked_add(1).map(|next| next.max(1)),
            None => Some(1),
        }
    }

    /// Returns the existing directory for `name`, or a new one numbered
    /// [`CategoryIndex::next_number`]. The index is not modified; call
    /// [`CategoryIndex::insert`] once the directory exists.
    ///
    /// `None` if a new directory is needed but no number is left.
    pub fn resolve(&self, name: &str) -> Option<CategoryDir> {
        match self.find(name) {
            Some(dir) => Some(dir.clone()),
            None => self
                .next_number()
                .map(|number| CategoryDir::new(number, name)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryDir> {
        self.dirs.iter()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_valid_names() {
        assert_eq!(
            CategoryDir::parse("01. Folder"),
            Some(CategoryDir::new(1, "Folder"))
        );
        assert_eq!(
            CategoryDir::parse("12. Document"),
            Some(CategoryDir::new(12, "Document"))
        );

        let padded = CategoryDir::parse(" 3. Audio ").unwrap();
        assert_eq!(padded.number, 3);
        assert_eq!(padded.name, "Audio");
        assert_eq!(padded.dir_name(), " 3. Audio ");
    }

    #[test]
    fn test_parse_name_stops_at_next_separator() {
        let dir = CategoryDir::parse("05. Document. Old").unwrap();
        assert_eq!(dir.number, 5);
        assert_eq!(dir.name, "Document");
        assert_eq!(dir.dir_name(), "05. Document. Old");
    }

    #[test]
    fn test_parse_signed_and_wide_prefixes() {
        let negative = CategoryDir::parse("-1. Archive").unwrap();
        assert_eq!(negative.number, -1);
        assert_eq!(negative.name, "Archive");

        let wide = CategoryDir::parse("4294967296. Big").unwrap();
        assert_eq!(wide.number, 4_294_967_296);

        assert_eq!(CategoryDir::parse("+3. Audio").map(|d| d.number), Some(3));
        assert!(CategoryDir::parse("99999999999999999999. Huge").is_none());
    }

    #[test]
    fn test_parse_keeps_unpadded_dir_name() {
        let dir = CategoryDir::parse("2. Document").unwrap();
        assert_eq!(dir.number, 2);
        assert_eq!(dir.dir_name(), "2. Document");
        assert_eq!(CategoryDir::new(2, "Document").dir_name(), "02. Document");
    }

    #[test]
    fn test_parse_rejects_unnumbered() {
        assert!(CategoryDir::parse("MyStuff").is_none());
        assert!(CategoryDir::parse("01 Folder").is_none());
        assert!(CategoryDir::parse("01.Folder").is_none());
        assert!(CategoryDir::parse("abc. Folder").is_none());
        assert!(CategoryDir::parse("-. Folder").is_none());
    }

    #[test]
    fn test_is_numbered() {
        assert!(is_numbered("01. Folder"));
        assert!(is_numbered("100. Misc"));
        assert!(is_numbered("-1. Archive"));
        assert!(is_numbered("4294967296. Big"));
        assert!(is_numbered("99999999999999999999. Huge"));
        assert!(!is_numbered("+. Plus"));
        assert!(!is_numbered("1e3. Science"));
        assert!(!is_numbered("Projects"));
        assert!(!is_numbered("2024 Taxes"));
        assert!(!is_numbered("Mr. Robot"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "00");
        assert_eq!(format_number(1), "01");
        assert_eq!(format_number(9), "09");
        assert_eq!(format_number(10), "10");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(-1), "-1");
    }

    #[test]
    fn test_dir_name() {
        assert_eq!(CategoryDir::new(1, "Folder").dir_name(), "01. Folder");
        assert_eq!(CategoryDir::new(42, "Video").dir_name(), "42. Video");
    }

    #[test]
    fn test_next_number_empty_index() {
        let index = CategoryIndex::new();
        assert_eq!(index.next_number(), Some(1));
        assert_eq!(index.resolve("Document"), Some(CategoryDir::new(1, "Document")));
    }

    #[test]
    fn test_next_number_after_negative_prefixes() {
        let mut index = CategoryIndex::new();
        index.insert(CategoryDir::new(-5, "Archive"));
        assert_eq!(index.next_number(), Some(1));

        index.insert(CategoryDir::new(1, "Folder"));
        assert_eq!(index.next_number(), Some(2));
    }

    #[test]
    fn test_next_number_never_reuses_maximum() {
        let mut index = CategoryIndex::new();
        index.insert(CategoryDir::new(4_294_967_295, "Big"));
        assert_eq!(index.next_number(), Some(4_294_967_296));

        index.insert(CategoryDir::new(i64::MAX, "Last"));
        assert_eq!(index.next_number(), None);
        assert_eq!(index.resolve("Document"), None);
        assert_eq!(index.resolve("Last").map(|d| d.number), Some(i64::MAX));
    }

    #[test]
    fn test_next_number_uses_maximum_not_last() {
        let mut index = CategoryIndex::new();
        index.insert(CategoryDir::new(3, "Image"));
        index.insert(CategoryDir::new(1, "Folder"));
        index.insert(CategoryDir::new(2, "Video"));

        assert_eq!(index.next_number(), Some(4));
        assert_eq!(index.resolve("Data"), Some(CategoryDir::new(4, "Data")));
    }

    #[test]
    fn test_resolve_reuses_existing_number() {
        let mut index = CategoryIndex::new();
        index.insert(CategoryDir::new(1, "Folder"));
        index.insert(CategoryDir::new(7, "Document"));

        assert_eq!(index.resolve("Document"), Some(CategoryDir::new(7, "Document")));
        // Names are matched exactly
        assert_eq!(index.resolve("document"), Some(CategoryDir::new(8, "document")));
    }

    #[test]
    fn test_scan_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::create_dir(root.join("01. Folder")).expect("Failed to create dir");
        fs::create_dir(root.join("04. Image")).expect("Failed to create dir");
        fs::create_dir(root.join("Projects")).expect("Failed to create dir");
        fs::write(root.join("02. Notes.txt"), "not a directory").expect("Failed to write file");

        let index = CategoryIndex::scan(root).expect("Failed to scan");
        assert_eq!(index.len(), 2);
        assert_eq!(index.find("Image").map(|d| d.number), Some(4));
        assert!(index.find("Notes.txt").is_none());
        assert_eq!(index.next_number(), Some(5));
    }
}
