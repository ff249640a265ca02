//! File system repositories for the vault and the site

use crate::error::{PublishError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const NOTE_EXTENSION: &str = "md";

/// Read-only view of the vault directory holding publishable notes
#[derive(Debug, Clone)]
pub struct VaultRepository {
    root: PathBuf,
}

impl VaultRepository {
    pub fn new(root: PathBuf) -> Self {
        VaultRepository { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Markdown files directly inside the source directory, sorted by name
    pub fn list_notes(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(PublishError::SourceNotFound(self.root.clone()));
        }

        let mut notes = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if has_extension(&path, NOTE_EXTENSION) {
                notes.push(path);
            }
        }

        notes.sort();
        Ok(notes)
    }

    pub fn read_note(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(PublishError::Io)
    }
}

/// A site directory whose files are owned by the publisher
/// (the content directory or the media directory)
#[derive(Debug, Clone)]
pub struct SiteDirectory {
    root: PathBuf,
}

impl SiteDirectory {
    pub fn new(root: PathBuf) -> Self {
        SiteDirectory { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Create the directory (and parents) if missing
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(PublishError::Io)
    }

    /// Read a file, `None` if it does not exist
    pub fn read(&self, filename: &str) -> Result<Option<String>> {
        let path = self.root.join(filename);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some).map_err(PublishError::Io)
    }

    /// Write `content` unless the file already holds exactly these bytes.
    ///
    /// Writes to a temp file in the same directory, then renames it over the
    /// target. The temp file is removed if either step fails. Returns whether
    /// the file changed.
    pub fn write_if_changed(&self, filename: &str, content: &str) -> Result<bool> {
        let path = self.root.join(filename);

        if let Ok(existing) = fs::read(&path) {
            if existing == content.as_bytes() {
                return Ok(false);
            }
        }

        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }

        let tmp_name = format!(".{}.notepress-tmp-{}", filename, std::process::id());
        let tmp_path = self.root.join(tmp_name);

        if let Err(e) = fs::write(&tmp_path, content).and_then(|_| replace(&tmp_path, &path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PublishError::Io(e));
        }
        Ok(true)
    }

    /// Every regular file in the directory except hidden ones, sorted.
    /// A missing directory has no files.
    pub fn list_files(&self) -> Result<Vec<String>> {
        self.list_matching(|_| true)
    }

    /// File names in the directory whose extension is one of `extensions`
    /// (case-insensitive), sorted. A missing directory has no files.
    pub fn list_by_extension(&self, extensions: &[String]) -> Result<Vec<String>> {
        self.list_matching(|path| extensions.iter().any(|ext| has_extension(path, ext)))
    }

    fn list_matching(&self, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with('.') && keep(path.as_path()) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    pub fn remove(&self, filename: &str) -> Result<()> {
        fs::remove_file(self.root.join(filename)).map_err(PublishError::Io)
    }
}

#[cfg(not(windows))]
fn replace(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::rename(from, to)
}

// rename does not overwrite on Windows
#[cfg(windows)]
fn replace(from: &Path, to: &Path) -> std::io::Result<()> {
    if to.is_file() {
        fs::remove_file(to)?;
    }
    fs::rename(from, to)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension.trim_start_matches('.')))
}
