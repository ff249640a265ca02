//! Version-history lookups used as a timestamp source

use crate::error::{PublishError, Result};
use chrono::{DateTime, FixedOffset};
use std::path::Path;
use std::process::{Command, Output};

/// Read access to the version history of files on disk
pub trait History {
    /// Author timestamps of the commits touching `path`, oldest first.
    /// An untracked file, or one outside any repository, has an empty log.
    fn commit_dates(&self, path: &Path) -> Result<Vec<DateTime<FixedOffset>>>;

    /// Content of `path` at the last commit, `None` if it was never committed
    fn committed_content(&self, path: &Path) -> Result<Option<String>>;
}

/// History backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitHistory {
    program: String,
}

impl GitHistory {
    pub fn new() -> Self {
        GitHistory {
            program: "git".to_string(),
        }
    }

    /// Run git from the directory containing `path`
    fn run(&self, path: &Path, args: &[&str]) -> Result<Output> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        Command::new(&self.program)
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .map_err(|e| {
                PublishError::History(format!("Failed to run '{}': {}", self.program, e))
            })
    }
}

impl Default for GitHistory {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PublishError::History(format!("Not a file: {}", path.display())))
}

fn outside_repository(stderr: &str) -> bool {
    stderr.to_lowercase().contains("not a git repository")
}

/// Parse `git log --format=%aI` output (newest first) into oldest-first timestamps
fn parse_log(stdout: &str) -> Result<Vec<DateTime<FixedOffset>>> {
    let mut dates = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            DateTime::parse_from_rfc3339(line).map_err(|e| {
                PublishError::History(format!("Unexpected log date '{}': {}", line, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    dates.reverse();
    Ok(dates)
}

impl History for GitHistory {
    fn commit_dates(&self, path: &Path) -> Result<Vec<DateTime<FixedOffset>>> {
        let name = file_name(path)?;
        let output = self.run(path, &["log", "--follow", "--format=%aI", "--", &name])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if outside_repository(&stderr) {
                return Ok(Vec::new());
            }
            return Err(PublishError::History(format!(
                "git log failed for {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        parse_log(&String::from_utf8_lossy(&output.stdout))
    }

    fn committed_content(&self, path: &Path) -> Result<Option<String>> {
        let name = file_name(path)?;
        let spec = format!("HEAD:./{}", name);
        let output = self.run(path, &["show", &spec])?;

        // Untracked files, missing HEAD and non-repositories all land here
        if !output.status.success() {
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

/// History that knows nothing; every file has an empty log
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl History for NoHistory {
    fn commit_dates(&self, _path: &Path) -> Result<Vec<DateTime<FixedOffset>>> {
        Ok(Vec::new())
    }

    fn committed_content(&self, _path: &Path) -> Result<Option<String>> {
        Ok(None)
    }
}
