//! Error types for notepress

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the publisher
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("History lookup failed: {0}")]
    History(String),

    #[error("Image optimizer failed: {0}")]
    Optimizer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PublishError::ConfigNotFound(_) => 2,
            PublishError::SourceNotFound(_) => 3,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            PublishError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    Suggestions:\n\
                    • Run 'notepress init' to write a default notepress.toml\n\
                    • Pass an explicit file with --config <path>\n\
                    • Set NOTEPRESS_CONFIG environment variable to your config path",
                    path.display()
                )
            }
            PublishError::SourceNotFound(path) => {
                format!(
                    "Source directory not found: {}\n\n\
                    Suggestions:\n\
                    • Check [paths] vault and source_dir in your config\n\
                    • Relative paths are resolved against the config file's directory",
                    path.display()
                )
            }
            PublishError::Config(msg) => {
                if msg.contains("already exists") {
                    format!(
                        "{}\n\n\
                        Edit the existing file or remove it before running 'notepress init' again",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using PublishError
pub type Result<T> = std::result::Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_suggestions() {
        let err = PublishError::ConfigNotFound(PathBuf::from("/tmp/notepress.toml"));
        let msg = err.display_with_suggestions();
        assert!(msg.contains("notepress init"));
        assert!(msg.contains("NOTEPRESS_CONFIG"));
        assert!(msg.contains("--config"));
    }

    #[test]
    fn test_source_not_found_suggestions() {
        let err = PublishError::SourceNotFound(PathBuf::from("/vault/Zettelkasten"));
        let msg = err.display_with_suggestions();
        assert!(msg.contains("/vault/Zettelkasten"));
        assert!(msg.contains("source_dir"));
    }

    #[test]
    fn test_config_already_exists_hint() {
        let err = PublishError::Config("notepress.toml already exists".to_string());
        assert!(err.display_with_suggestions().contains("remove it"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(PublishError::ConfigNotFound(PathBuf::new()).exit_code(), 2);
        assert_eq!(PublishError::SourceNotFound(PathBuf::new()).exit_code(), 3);
        assert_eq!(PublishError::Config("x".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_io_errors_convert() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/notepress/file.md")?)
        }

        let err = read_missing().unwrap_err();
        assert!(matches!(err, PublishError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_other_errors_fallback() {
        let err = PublishError::History("not a repository".to_string());
        let msg = err.display_with_suggestions();
        assert_eq!(msg, "History lookup failed: not a repository");
    }
}
