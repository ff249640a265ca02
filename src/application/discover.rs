//! Note discovery use case
//!
//! Enumerates the source directory and splits notes into eligible and skipped.

use crate::domain::{Note, TagFilter};
use crate::error::Result;
use crate::infrastructure::VaultRepository;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A note that will not be published, with the reason why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNote {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// Number of markdown files examined
    pub total: usize,
    pub eligible: Vec<Note>,
    pub skipped: Vec<SkippedNote>,
}

/// Service for discovering publishable notes
pub struct DiscoveryService {
    vault: VaultRepository,
    filter: TagFilter,
}

impl DiscoveryService {
    pub fn new(vault: VaultRepository, filter: TagFilter) -> Self {
        DiscoveryService { vault, filter }
    }

    /// Read every note in the source directory and classify it.
    ///
    /// # Errors
    ///
    /// Fails only when the source directory itself cannot be listed. A note
    /// that cannot be read or has malformed frontmatter is reported and the
    /// scan continues.
    pub fn execute(&self) -> Result<DiscoveryReport> {
        let paths = self.vault.list_notes()?;
        let mut report = DiscoveryReport {
            total: paths.len(),
            ..DiscoveryReport::default()
        };

        for path in paths {
            let content = match self.vault.read_note(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(note = %path.display(), "Could not read note: {}", e);
                    report.skipped.push(SkippedNote {
                        path,
                        reason: format!("Unreadable: {}", e),
                    });
                    continue;
                }
            };

            let (note, problem) = Note::from_source(&path, &content);
            if let Some(problem) = problem {
                warn!(note = %path.display(), "Ignoring malformed frontmatter: {}", problem);
            }

            let eligibility = self.filter.evaluate(&note.tags);
            if eligibility.is_eligible() {
                debug!(note = %path.display(), "Eligible");
                report.eligible.push(note);
            } else {
                debug!(note = %path.display(), reason = %eligibility, "Skipped");
                report.skipped.push(SkippedNote {
                    path,
                    reason: eligibility.to_string(),
                });
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use std::fs;
    use tempfile::TempDir;

    fn service(root: PathBuf) -> DiscoveryService {
        DiscoveryService::new(
            VaultRepository::new(root),
            TagFilter::new(
                vec!["status/evergreen".to_string()],
                vec!["private".to_string()],
            ),
        )
    }

    #[test]
    fn test_discovery_classifies_notes() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("a.md"),
            "---\ntags: [status/evergreen]\n---\nA",
        )
        .unwrap();
        fs::write(
            temp.path().join("b.md"),
            "---\ntags:\n  - status/evergreen\n  - private\n---\nB",
        )
        .unwrap();
        fs::write(temp.path().join("c.md"), "---\ntags: rust\n---\nC").unwrap();
        fs::write(temp.path().join("d.md"), "---\ntags: [oops\n---\nD").unwrap();

        let report = service(temp.path().to_path_buf()).execute().unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.eligible.len(), 1);
        assert_eq!(report.eligible[0].stem(), "a");

        let reasons: Vec<&str> = report.skipped.iter().map(|s| s.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec![
                "Contains excluded tags: private",
                "Missing required tags: status/evergreen",
                "Missing required tags: status/evergreen",
            ]
        );
    }

    #[test]
    fn test_discovery_single_string_tag() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.md"), "---\ntags: status/evergreen\n---\nA").unwrap();

        let report = service(temp.path().to_path_buf()).execute().unwrap();
        assert_eq!(report.eligible.len(), 1);
    }

    #[test]
    fn test_discovery_missing_source_is_fatal() {
        let temp = TempDir::new().unwrap();
        let result = service(temp.path().join("nope")).execute();
        assert!(matches!(result, Err(PublishError::SourceNotFound(_))));
    }

    #[test]
    fn test_discovery_empty_directory() {
        let temp = TempDir::new().unwrap();
        let report = service(temp.path().to_path_buf()).execute().unwrap();
        assert_eq!(report.total, 0);
        assert!(report.eligible.is_empty());
        assert!(report.skipped.is_empty());
    }
}
