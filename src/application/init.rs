//! Initialize configuration use case

use crate::error::Result;
use crate::infrastructure::config::DEFAULT_CONFIG_FILE;
use crate::infrastructure::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a starter `notepress.toml` into `dir`.
///
/// Vault and website paths are written relative to the file, so the
/// directory can sit next to both. Returns the path of the new file.
pub fn init(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(DEFAULT_CONFIG_FILE);

    let mut config = Config::new(PathBuf::from("vault"), PathBuf::from("website"));
    config.paths.media_sources = vec![PathBuf::from("attachments")];
    config.filters.required_tags = vec!["status/evergreen".to_string()];
    config.filters.excluded_tags = vec!["status/draft".to_string(), "private".to_string()];

    config.save_to_path(&path)?;
    Ok(path)
}
