//! Input files and the file system view handed to sensors.
//!
//! An [`InputFile`] is identified by its `file://` URI. Paths are made
//! absolute and lexically normalised before conversion so that the same file
//! reached through `./` or `..` segments always maps to one URI; sensors rely
//! on this to attach linter output to the files the host enumerated.

use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use url::Url;

use crate::error::HostError;

/// Lexically normalises a path: drops `.` segments and resolves `..` against
/// the preceding normal segment. Symbolic links are not consulted.
///
/// # Example
///
/// ```
/// use ansible_host::normalize_path;
/// use std::path::Path;
///
/// let path = normalize_path(Path::new("/project/./roles/../site.yml"));
/// assert_eq!(path, Path::new("/project/site.yml"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Converts a path into the `file://` URI used as file identity.
///
/// Relative paths are resolved against the current working directory.
///
/// # Errors
///
/// Returns [`HostError::InvalidPath`] when the path cannot be made absolute
/// or has no URL representation.
pub fn file_uri(path: &Path) -> Result<Url, HostError> {
    let invalid = || HostError::InvalidPath {
        path: path.to_path_buf(),
    };
    let absolute = std::path::absolute(path).map_err(|_| invalid())?;
    Url::from_file_path(normalize_path(&absolute)).map_err(|()| invalid())
}

/// Host-owned handle for a file to be analysed.
///
/// Equality and hashing use the URI only.
///
/// # Example
///
/// ```
/// use ansible_host::InputFile;
///
/// let file = InputFile::new("/project/site.yml", "yaml").expect("absolute path");
/// assert_eq!(file.uri().as_str(), "file:///project/site.yml");
/// assert_eq!(file.language(), "yaml");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct InputFile {
    key: String,
    path: PathBuf,
    uri: Url,
    language: String,
    lines: Option<u32>,
}

impl InputFile {
    /// Creates an input file; the key defaults to the normalised path.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidPath`] when the path has no URI form.
    pub fn new(path: impl AsRef<Path>, language: impl Into<String>) -> Result<Self, HostError> {
        let uri = file_uri(path.as_ref())?;
        let absolute = uri.to_file_path().map_err(|()| HostError::InvalidPath {
            path: path.as_ref().to_path_buf(),
        })?;
        Ok(Self {
            key: absolute.display().to_string(),
            path: absolute,
            uri,
            language: language.into(),
            lines: None,
        })
    }

    /// Replaces the display key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Records the number of lines in the file.
    #[must_use]
    pub const fn with_lines(mut self, lines: u32) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Returns the display key, usually relative to the base directory.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the absolute, normalised path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the URI identity.
    #[must_use]
    pub const fn uri(&self) -> &Url {
        &self.uri
    }

    /// Returns the language tag.
    #[must_use]
    pub const fn language(&self) -> &str {
        self.language.as_str()
    }

    /// Returns the line count when the host measured it.
    #[must_use]
    pub const fn lines(&self) -> Option<u32> {
        self.lines
    }
}

impl PartialEq for InputFile {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for InputFile {}

impl Hash for InputFile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl std::fmt::Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

/// The set of files the host offers to sensors, rooted at a base directory.
#[derive(Debug, Clone)]
pub struct FileSystem {
    base_dir: PathBuf,
    files: Vec<InputFile>,
}

impl FileSystem {
    /// Creates an empty file system rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            files: Vec::new(),
        }
    }

    /// Adds a file; a file already present under the same URI is replaced.
    pub fn add(&mut self, file: InputFile) -> &mut Self {
        if let Some(existing) = self.files.iter_mut().find(|f| f.uri == file.uri) {
            *existing = file;
        } else {
            self.files.push(file);
        }
        self
    }

    /// Creates and adds a file located relative to the base directory.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidPath`] when the joined path has no URI form.
    pub fn add_relative(
        &mut self,
        relative: impl AsRef<Path>,
        language: &str,
    ) -> Result<&InputFile, HostError> {
        let relative = relative.as_ref();
        let file = InputFile::new(self.base_dir.join(relative), language)?
            .with_key(relative.display().to_string());
        let uri = file.uri.clone();
        self.add(file);
        self.input_file(&uri).ok_or(HostError::InvalidPath {
            path: relative.to_path_buf(),
        })
    }

    /// Returns the base directory used to resolve relative paths.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns every file in insertion order.
    #[must_use]
    pub fn files(&self) -> &[InputFile] {
        &self.files
    }

    /// Iterates over files tagged with `language`.
    pub fn input_files<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a InputFile> {
        self.files.iter().filter(move |f| f.language == language)
    }

    /// Looks up a file by URI.
    #[must_use]
    pub fn input_file(&self, uri: &Url) -> Option<&InputFile> {
        self.files.iter().find(|f| &f.uri == uri)
    }

    /// Returns the number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` when no files are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests;
