//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod history;
pub mod media;
pub mod optimizer;
pub mod repository;

pub use config::{Config, HistoryBackend};
pub use history::{GitHistory, History, NoHistory};
pub use media::MediaLocator;
pub use optimizer::{CommandOptimizer, CopyOptimizer, ImageOptimizer, ImageParams};
pub use repository::{SiteDirectory, VaultRepository};
