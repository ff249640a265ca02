//! Publication and creation date provenance
//!
//! Each candidate source is tried in order and either yields a value or
//! reports that it has none; the last step always succeeds.

use crate::domain::dates::{created_from_frontmatter, format_timestamp, recorded_publication_date};
use crate::infrastructure::History;
use chrono::{DateTime, Local, Utc};
use serde_yaml::Mapping;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Where a publication date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationSource {
    /// Output file as last committed to the site's history
    Committed,
    /// Output file left on disk by the previous run
    PriorOutput,
    /// `created` field of the source note
    Created,
    Now,
}

/// Where a creation date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationSource {
    /// Oldest commit touching the source note
    History,
    Filesystem,
    Now,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<S> {
    pub value: String,
    pub source: S,
}

impl<S> Resolved<S> {
    fn new(value: String, source: S) -> Self {
        Resolved { value, source }
    }
}

pub struct DateResolver {
    history: Box<dyn History>,
}

impl DateResolver {
    pub fn new(history: Box<dyn History>) -> Self {
        DateResolver { history }
    }

    /// Stable "first published" date for the output at `output_path`.
    ///
    /// `prior_output` is the current content of that file, `None` when the
    /// note has never been published.
    pub fn publication_date(
        &self,
        output_path: &Path,
        prior_output: Option<&str>,
        source: &Mapping,
        now: DateTime<Utc>,
    ) -> Resolved<PublicationSource> {
        if let Some(prior) = prior_output {
            if let Some(date) = self.committed_date(output_path) {
                return Resolved::new(date, PublicationSource::Committed);
            }
            if let Some(date) = recorded_publication_date(prior) {
                return Resolved::new(date, PublicationSource::PriorOutput);
            }
        }

        if let Some(created) = created_from_frontmatter(source) {
            return Resolved::new(created, PublicationSource::Created);
        }

        Resolved::new(format_timestamp(&now), PublicationSource::Now)
    }

    fn committed_date(&self, output_path: &Path) -> Option<String> {
        match self.history.committed_content(output_path) {
            Ok(Some(content)) => recorded_publication_date(&content),
            Ok(None) => None,
            Err(e) => {
                debug!(path = %output_path.display(), "No committed revision: {}", e);
                None
            }
        }
    }

    /// Creation date of the source note, recomputed on every run
    pub fn creation_date(&self, source_path: &Path, now: DateTime<Utc>) -> Resolved<CreationSource> {
        let dates = match self.history.commit_dates(source_path) {
            Ok(dates) => dates,
            Err(e) => {
                warn!(
                    note = %source_path.display(),
                    "Could not get creation date: {}", e
                );
                return Resolved::new(format_timestamp(&now), CreationSource::Now);
            }
        };

        if let Some(first) = dates.first() {
            return Resolved::new(format_timestamp(first), CreationSource::History);
        }

        match filesystem_created(source_path) {
            Some(created) => Resolved::new(format_timestamp(&created), CreationSource::Filesystem),
            None => Resolved::new(format_timestamp(&now), CreationSource::Now),
        }
    }
}

/// Creation time, or modification time where the platform lacks it
fn filesystem_created(path: &Path) -> Option<DateTime<Local>> {
    let metadata = fs::metadata(path).ok()?;
    let time = metadata.created().or_else(|_| metadata.modified()).ok()?;
    Some(DateTime::<Local>::from(time))
}
