//! Locating embedded media inside the vault

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Searches configured vault directories for media files by exact name
#[derive(Debug, Clone)]
pub struct MediaLocator {
    search_dirs: Vec<PathBuf>,
}

impl MediaLocator {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        MediaLocator { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// First file named `name`, trying directories in configured order.
    /// Hidden directories are skipped; entries are visited in name order.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .find_map(|dir| Self::find_in(dir, name))
    }

    fn find_in(dir: &Path, name: &str) -> Option<PathBuf> {
        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|n| !n.starts_with('.'))
            });

        walker
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.file_name().to_str() == Some(name))
            .map(|entry| entry.into_path())
    }
}
