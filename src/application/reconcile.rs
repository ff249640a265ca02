//! Orphan sweeps over the content and media directories

use crate::domain::reconcile::{media_references, orphans, retained_media};
use crate::error::Result;
use crate::infrastructure::config::{ImageConfig, SiteConfig};
use crate::infrastructure::SiteDirectory;
use std::collections::BTreeSet;
use tracing::info;

/// Files removed (or, on a dry run, that would be removed) by one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: Vec<String>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

pub struct Reconciler {
    content: SiteDirectory,
    media: SiteDirectory,
    note_extension: String,
    media_prefix: String,
    target_extension: String,
    fallback_extensions: Vec<String>,
}

impl Reconciler {
    pub fn new(
        content: SiteDirectory,
        media: SiteDirectory,
        site: &SiteConfig,
        images: &ImageConfig,
    ) -> Self {
        Reconciler {
            content,
            media,
            note_extension: site.output_extension.clone(),
            media_prefix: site.media_prefix.clone(),
            target_extension: images.target_extension.clone(),
            fallback_extensions: images.fallback_extensions.clone(),
        }
    }

    /// Remove published notes whose file name is not in `valid`.
    pub fn sweep_notes(&self, valid: &BTreeSet<String>, dry_run: bool) -> Result<SweepReport> {
        let existing = self
            .content
            .list_by_extension(std::slice::from_ref(&self.note_extension))?;
        let removed = orphans(&existing, valid);

        if !dry_run {
            for name in &removed {
                self.content.remove(name)?;
                info!(file = %name, "Removed orphaned note");
            }
        }

        Ok(SweepReport { removed })
    }

    /// Remove every media file no remaining published note refers to.
    /// Hidden files are left alone.
    ///
    /// `removed_notes` are left out of the scan; after a real sweep they are
    /// already gone, on a dry run they are the notes that would be.
    pub fn sweep_media(&self, removed_notes: &[String], dry_run: bool) -> Result<SweepReport> {
        let notes = self
            .content
            .list_by_extension(std::slice::from_ref(&self.note_extension))?;

        let mut references = BTreeSet::new();
        for name in notes.iter().filter(|n| !removed_notes.contains(*n)) {
            if let Some(document) = self.content.read(name)? {
                references.extend(media_references(&document, &self.media_prefix));
            }
        }

        let keep = retained_media(&references, &self.target_extension, &self.fallback_extensions);
        let existing = self.media.list_files()?;
        let removed = orphans(&existing, &keep);

        if !dry_run {
            for name in &removed {
                self.media.remove(name)?;
                info!(file = %name, "Removed orphaned media");
            }
        }

        Ok(SweepReport { removed })
    }
}
