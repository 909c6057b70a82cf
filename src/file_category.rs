/// File classification for the downloads organizer.
///
/// A file is classified in two steps: its extension is resolved to a MIME type,
/// and the MIME type is reduced to a category name such as `Document` or `Image`.
///
/// # Examples
///
/// ```
/// use tidydl::file_category::FileClassifier;
/// use std::path::Path;
///
/// let classifier = FileClassifier::default();
/// assert_eq!(classifier.classify(Path::new("report.pdf")), "Document");
/// assert_eq!(classifier.classify(Path::new("archive.rar")), "Compressed");
/// assert_eq!(classifier.classify(Path::new("no_extension")), "Other");
/// ```
use crate::config::CategoryConfig;
use std::collections::HashMap;
use std::path::Path;

/// Category used when no MIME type can be determined.
pub const UNDETERMINED_CATEGORY: &str = "other";

/// Extensions the standard MIME database does not know, or knows differently
/// than the organizer expects.
const EXTRA_EXTENSIONS: &[(&str, &str)] = &[
    ("webp", "image/webp"),
    ("psd", "project/vnd.adobe.photoshop"),
    ("prproj", "project/vnd.adobe.premiere"),
    ("rar", "compressed/x-rar-compressed"),
    ("msi", "application/x-msi"),
    ("7z", "compressed/x-7z-compressed"),
    ("deb", "application/vnd.debian.binary-package"),
    ("iso", "application/x-iso9660-image"),
    ("xmp", "application/rdf+xml"),
    ("crdownload", "file/x-chrome-download"),
    // Windows registry types
    ("zip", "application/x-zip-compressed"),
    ("mdb", "application/msaccess"),
    ("accdb", "application/msaccess"),
    ("pub", "application/vnd.ms-publisher"),
];

/// MIME subtypes that map to a category other than their top-level type.
const SUBTYPE_OVERRIDES: &[(&str, &str)] = &[
    ("pdf", "document"),
    (
        "vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "document",
    ),
    (
        "vnd.openxmlformats-officedocument.spreadsheetml.template",
        "document",
    ),
    (
        "vnd.openxmlformats-officedocument.wordprocessingml.document",
        "document",
    ),
    (
        "vnd.openxmlformats-officedocument.presentationml.presentation",
        "document",
    ),
    ("msword", "document"),
    ("vnd.ms-excel", "document"),
    ("vnd.ms-publisher", "document"),
    ("msaccess", "database"),
    ("svg+xml", "graphics"),
    ("json", "data"),
    ("x-zip-compressed", "compressed"),
];

/// Maps file names to MIME types and MIME types to category names.
///
/// Lookups are case-insensitive. The built-in tables can be extended with
/// [`FileClassifier::register_extension`] and [`FileClassifier::register_subtype`]
/// or from a [`CategoryConfig`].
#[derive(Debug, Clone)]
pub struct FileClassifier {
    extension_map: HashMap<String, String>,
    subtype_map: HashMap<String, String>,
}

impl FileClassifier {
    /// Creates a classifier with the built-in extension and subtype tables.
    pub fn new() -> Self {
        let mut classifier = Self {
            extension_map: HashMap::new(),
            subtype_map: HashMap::new(),
        };

        for (ext, mime) in EXTRA_EXTENSIONS {
            classifier.register_extension(ext, mime);
        }
        for (subtype, category) in SUBTYPE_OVERRIDES {
            classifier.register_subtype(subtype, category);
        }

        classifier
    }

    /// Creates a classifier with the built-in tables extended by `config`.
    ///
    /// Configured entries replace built-in entries with the same key.
    pub fn with_config(config: &CategoryConfig) -> Self {
        let mut classifier = Self::new();
        for (ext, mime) in &config.extensions {
            classifier.register_extension(ext, mime);
        }
        for (subtype, category) in &config.subtypes {
            classifier.register_subtype(subtype, category);
        }
        classifier
    }

    /// Registers a MIME type for a file extension. A leading dot is ignored.
    pub fn register_extension(&mut self, ext: &str, mime: &str) {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.extension_map.insert(ext, mime.to_lowercase());
    }

    /// Registers a category name for a MIME subtype.
    pub fn register_subtype(&mut self, subtype: &str, category: &str) {
        self.subtype_map
            .insert(subtype.to_lowercase(), category.to_string());
    }

    /// Resolves the MIME type of a file from its extension.
    ///
    /// Registered extensions take precedence over the standard MIME database.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidydl::file_category::FileClassifier;
    /// use std::path::Path;
    ///
    /// let classifier = FileClassifier::default();
    /// assert_eq!(
    ///     classifier.mime_type(Path::new("photo.PNG")).as_deref(),
    ///     Some("image/png")
    /// );
    /// assert_eq!(
    ///     classifier.mime_type(Path::new("setup.7z")).as_deref(),
    ///     Some("compressed/x-7z-compressed")
    /// );
    /// assert_eq!(classifier.mime_type(Path::new("README")), None);
    /// ```
    pub fn mime_type(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_lowercase();

        if let Some(mime) = self.extension_map.get(&ext) {
            return Some(mime.clone());
        }

        mime_guess::from_ext(&ext)
            .first_raw()
            .map(|mime| mime.to_string())
    }

    /// Reduces a MIME type to a capitalized category name.
    ///
    /// The subtype is looked up in the override table first; otherwise the
    /// top-level type is used. `None` yields `Other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidydl::file_category::FileClassifier;
    ///
    /// let classifier = FileClassifier::default();
    /// assert_eq!(classifier.category_for_mime(Some("application/pdf")), "Document");
    /// assert_eq!(classifier.category_for_mime(Some("video/mp4")), "Video");
    /// assert_eq!(classifier.category_for_mime(None), "Other");
    /// ```
    pub fn category_for_mime(&self, mime_type: Option<&str>) -> String {
        let Some(mime) = mime_type else {
            return capitalize(UNDETERMINED_CATEGORY);
        };

        let (top_level, subtype) = match mime.split_once('/') {
            Some((top_level, subtype)) => (top_level, Some(subtype)),
            None => (mime, None),
        };

        let category = subtype
            .and_then(|subtype| self.subtype_map.get(&subtype.to_lowercase()))
            .map(String::as_str)
            .unwrap_or(top_level);

        if category.is_empty() {
            return capitalize(UNDETERMINED_CATEGORY);
        }
        capitalize(category)
    }

    /// Classifies a file by name, returning its category name.
    pub fn classify(&self, path: &Path) -> String {
        self.category_for_mime(self.mime_type(path).as_deref())
    }
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
