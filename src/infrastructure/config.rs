//! Configuration management

use crate::domain::tags::TaxonomyRules;
use crate::domain::TagFilter;
use crate::error::{PublishError, Result};
use crate::infrastructure::optimizer::ImageParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "notepress.toml";
pub const CONFIG_ENV_VAR: &str = "NOTEPRESS_CONFIG";

pub const DEFAULT_SOURCE_DIR: &str = ".";
pub const DEFAULT_CONTENT_DIR: &str = "content/blog";
pub const DEFAULT_MEDIA_DIR: &str = "static/images";

pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_LINK_PREFIX: &str = "/blog";
pub const DEFAULT_MEDIA_PREFIX: &str = "/images";
pub const DEFAULT_OUTPUT_EXTENSION: &str = "md";
pub const DEFAULT_RELATED_HEADING: &str = "Related Reading";

pub const DEFAULT_MAX_WIDTH: u32 = 1200;
pub const DEFAULT_WEBP_QUALITY: u8 = 85;
pub const DEFAULT_TARGET_EXTENSION: &str = "webp";
pub const DEFAULT_FALLBACK_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the note vault
    pub vault: PathBuf,
    /// Directory inside the vault holding publishable notes
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Root of the static site
    pub website: PathBuf,
    /// Directory inside the site receiving published notes
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    /// Directory inside the site receiving media
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
    /// Vault directories searched (recursively) for embedded media
    #[serde(default)]
    pub media_sources: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub required_tags: Vec<String>,
    pub excluded_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub author: String,
    pub link_prefix: String,
    pub media_prefix: String,
    pub output_extension: String,
    pub related_heading: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            author: DEFAULT_AUTHOR.to_string(),
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
            media_prefix: DEFAULT_MEDIA_PREFIX.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            related_heading: DEFAULT_RELATED_HEADING.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub related_reading: bool,
    pub optimize_images: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            related_reading: true,
            optimize_images: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub max_width: u32,
    pub webp_quality: u8,
    pub lossless_optimize: bool,
    /// Extension referenced from published notes
    pub target_extension: String,
    /// Extensions the optimizer may leave next to the target file
    pub fallback_extensions: Vec<String>,
    /// External optimizer command template; originals are copied when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            max_width: DEFAULT_MAX_WIDTH,
            webp_quality: DEFAULT_WEBP_QUALITY,
            lossless_optimize: true,
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            fallback_extensions: DEFAULT_FALLBACK_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            command: None,
        }
    }
}

/// Source of version-history timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    #[default]
    Git,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub backend: HistoryBackend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyRules,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_DIR)
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_media_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MEDIA_DIR)
}

impl Config {
    /// Create a config with default settings for the given vault and site
    pub fn new(vault: PathBuf, website: PathBuf) -> Self {
        Config {
            paths: PathsConfig {
                vault,
                source_dir: default_source_dir(),
                website,
                content_dir: default_content_dir(),
                media_dir: default_media_dir(),
                media_sources: Vec::new(),
            },
            filters: FilterConfig::default(),
            taxonomy: TaxonomyRules::default(),
            site: SiteConfig::default(),
            features: FeatureConfig::default(),
            images: ImageConfig::default(),
            history: HistoryConfig::default(),
        }
    }

    /// Load config from a TOML file.
    ///
    /// Relative `vault` and `website` paths are resolved against the
    /// directory containing the file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PublishError::ConfigNotFound(path.to_path_buf())
            } else {
                PublishError::Io(e)
            }
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| {
            PublishError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_relative_to(base);
        Ok(config)
    }

    /// Save config as TOML, refusing to overwrite an existing file
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(PublishError::Config(format!(
                "{} already exists",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| PublishError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)?;
        Ok(())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if self.paths.vault.is_relative() {
            self.paths.vault = base.join(&self.paths.vault);
        }
        if self.paths.website.is_relative() {
            self.paths.website = base.join(&self.paths.website);
        }
    }

    /// Resolve the config path: explicit argument, then NOTEPRESS_CONFIG, then ./notepress.toml
    pub fn locate(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn source_dir(&self) -> PathBuf {
        self.paths.vault.join(&self.paths.source_dir)
    }

    pub fn content_dir(&self) -> PathBuf {
        self.paths.website.join(&self.paths.content_dir)
    }

    pub fn media_dir(&self) -> PathBuf {
        self.paths.website.join(&self.paths.media_dir)
    }

    pub fn media_search_dirs(&self) -> Vec<PathBuf> {
        self.paths
            .media_sources
            .iter()
            .map(|dir| self.paths.vault.join(dir))
            .collect()
    }

    pub fn tag_filter(&self) -> TagFilter {
        TagFilter::new(
            self.filters.required_tags.iter().cloned(),
            self.filters.excluded_tags.iter().cloned(),
        )
    }

    pub fn image_params(&self) -> ImageParams {
        ImageParams {
            max_width: self.images.max_width,
            quality: self.images.webp_quality,
            lossless: self.images.lossless_optimize,
        }
    }
}
