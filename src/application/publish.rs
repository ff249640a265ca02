//! Publish use case
//!
//! Drives a full reconciliation run: discovery, per-note transformation and
//! media processing, then the orphan sweeps once every note has been written.

use crate::application::dates::DateResolver;
use crate::application::discover::{DiscoveryService, SkippedNote};
use crate::application::reconcile::Reconciler;
use crate::domain::links::media_slug;
use crate::domain::tags::TagConverter;
use crate::domain::{slugify, titlecase, LinkRewriter, Note, TagFilter};
use crate::error::Result;
use crate::infrastructure::config::{FeatureConfig, SiteConfig};
use crate::infrastructure::{
    CommandOptimizer, Config, CopyOptimizer, GitHistory, History, HistoryBackend, ImageOptimizer,
    ImageParams, MediaLocator, NoHistory, SiteDirectory, VaultRepository,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_yaml::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// A note that a dry run would publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedNote {
    pub source: PathBuf,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    Published {
        source: PathBuf,
        slug: String,
        /// False when the output already held identical bytes
        changed: bool,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

/// End-of-run summary
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub discovered: usize,
    pub eligible: usize,
    pub published: usize,
    pub failed: usize,
    pub outcomes: Vec<NoteOutcome>,
    pub planned: Vec<PlannedNote>,
    pub skipped: Vec<SkippedNote>,
    pub removed_notes: Vec<String>,
    pub removed_media: Vec<String>,
    /// Embedded media not found in any search directory
    pub missing_media: Vec<String>,
    pub dry_run: bool,
}

struct PublishedNote {
    changed: bool,
    missing_media: Vec<String>,
}

/// Result of assigning output slugs to the eligible notes
struct Plan<'a> {
    notes: Vec<(&'a Note, String)>,
    /// Notes whose title and file name both slug to nothing
    unsluggable: Vec<&'a Note>,
}

/// Service for publishing the vault into the site
pub struct PublishService {
    vault: VaultRepository,
    filter: TagFilter,
    content: SiteDirectory,
    media: SiteDirectory,
    locator: MediaLocator,
    converter: TagConverter,
    rewriter: LinkRewriter,
    dates: DateResolver,
    optimizer: Box<dyn ImageOptimizer>,
    reconciler: Reconciler,
    site: SiteConfig,
    features: FeatureConfig,
    image_params: ImageParams,
}

impl PublishService {
    /// Build the service and its collaborators from configuration
    pub fn from_config(config: &Config) -> Self {
        let history: Box<dyn History> = match config.history.backend {
            HistoryBackend::Git => Box::new(GitHistory::new()),
            HistoryBackend::None => Box::new(NoHistory),
        };

        let optimizer: Box<dyn ImageOptimizer> = match &config.images.command {
            Some(command) => Box::new(CommandOptimizer::new(
                command.clone(),
                &config.images.target_extension,
            )),
            None => Box::new(CopyOptimizer),
        };

        let content = SiteDirectory::new(config.content_dir());
        let media = SiteDirectory::new(config.media_dir());

        PublishService {
            vault: VaultRepository::new(config.source_dir()),
            filter: config.tag_filter(),
            reconciler: Reconciler::new(
                content.clone(),
                media.clone(),
                &config.site,
                &config.images,
            ),
            content,
            media,
            locator: MediaLocator::new(config.media_search_dirs()),
            converter: TagConverter::new(&config.taxonomy),
            rewriter: rewriter_for(&config.site, optimizer.as_ref()),
            dates: DateResolver::new(history),
            optimizer,
            site: config.site.clone(),
            features: config.features.clone(),
            image_params: config.image_params(),
        }
    }

    /// Replace the history collaborator
    pub fn with_history(mut self, history: Box<dyn History>) -> Self {
        self.dates = DateResolver::new(history);
        self
    }

    /// Replace the image optimizer; media links follow its output extension
    pub fn with_optimizer(mut self, optimizer: Box<dyn ImageOptimizer>) -> Self {
        self.rewriter = rewriter_for(&self.site, optimizer.as_ref());
        self.optimizer = optimizer;
        self
    }

    fn output_filename(&self, slug: &str) -> String {
        format!("{}.{}", slug, self.site.output_extension)
    }

    /// Pair each eligible note with its slug, warning when two notes collide.
    /// The later note overwrites the earlier one.
    fn plan<'a>(&self, eligible: &'a [Note]) -> Plan<'a> {
        let mut owners: BTreeMap<String, String> = BTreeMap::new();
        let mut plan = Plan {
            notes: Vec::with_capacity(eligible.len()),
            unsluggable: Vec::new(),
        };

        for note in eligible {
            let Some(slug) = note_slug(note) else {
                warn!(
                    note = %note.file_name(),
                    "Title and file name have no URL-safe characters"
                );
                plan.unsluggable.push(note);
                continue;
            };
            if let Some(previous) = owners.insert(slug.clone(), note.file_name()) {
                warn!(
                    slug = %slug,
                    "{} and {} publish to the same slug; the latter wins",
                    previous,
                    note.file_name()
                );
            }
            plan.notes.push((note, slug));
        }

        plan
    }

    /// Run the pipeline.
    ///
    /// With `dry_run` nothing is written or deleted; the report lists what a
    /// real run would publish and remove.
    ///
    /// # Errors
    ///
    /// Returns an error if the source directory is missing or a sweep fails.
    /// A note that fails to publish is counted and reported, not returned.
    pub fn execute(&self, dry_run: bool) -> Result<PublishReport> {
        let discovery = DiscoveryService::new(self.vault.clone(), self.filter.clone()).execute()?;
        info!(
            discovered = discovery.total,
            eligible = discovery.eligible.len(),
            "Discovery complete"
        );

        let mut report = PublishReport {
            discovered: discovery.total,
            eligible: discovery.eligible.len(),
            skipped: discovery.skipped.clone(),
            dry_run,
            ..PublishReport::default()
        };

        let plan = self.plan(&discovery.eligible);
        for note in &plan.unsluggable {
            report.failed += 1;
            report.outcomes.push(NoteOutcome::Failed {
                source: note.path.clone(),
                error: "Cannot derive a slug from the title or file name".to_string(),
            });
        }

        let planned = &plan.notes;
        let valid: BTreeSet<String> = planned
            .iter()
            .map(|(_, slug)| self.output_filename(slug))
            .collect();

        if dry_run {
            report.planned = planned
                .iter()
                .map(|(note, slug)| PlannedNote {
                    source: note.path.clone(),
                    slug: slug.clone(),
                })
                .collect();
        } else {
            self.content.ensure()?;
            self.media.ensure()?;

            let now = Utc::now();
            for (note, slug) in planned {
                match self.publish_note(note, slug, now) {
                    Ok(published) => {
                        info!(
                            note = %note.file_name(),
                            slug = %slug,
                            changed = published.changed,
                            "Published"
                        );
                        report.published += 1;
                        report.missing_media.extend(published.missing_media);
                        report.outcomes.push(NoteOutcome::Published {
                            source: note.path.clone(),
                            slug: slug.clone(),
                            changed: published.changed,
                        });
                    }
                    Err(e) => {
                        error!(note = %note.file_name(), "Failed to publish: {:#}", e);
                        report.failed += 1;
                        report.outcomes.push(NoteOutcome::Failed {
                            source: note.path.clone(),
                            error: format!("{:#}", e),
                        });
                    }
                }
            }
            report.missing_media.sort();
            report.missing_media.dedup();
        }

        let notes = self.reconciler.sweep_notes(&valid, dry_run)?;
        let media = self.reconciler.sweep_media(&notes.removed, dry_run)?;
        report.removed_notes = notes.removed;
        report.removed_media = media.removed;

        Ok(report)
    }

    fn publish_note(
        &self,
        note: &Note,
        slug: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<PublishedNote> {
        let filename = self.output_filename(slug);
        let output_path = self.content.path_for(&filename);
        let prior = self
            .content
            .read(&filename)
            .with_context(|| format!("Failed to read existing {}", output_path.display()))?;

        let mut frontmatter = self.converter.enhance_frontmatter(&note.frontmatter, &note.tags);
        for key in ["title", "date", "doc", "author"] {
            frontmatter.shift_remove(key);
        }

        let site_tags: BTreeSet<String> = self
            .converter
            .filter_tags_for_frontmatter(&note.tags)
            .into_iter()
            .map(|tag| tag.replace('/', "-"))
            .collect();
        if !site_tags.is_empty() {
            frontmatter.insert(
                "tags".into(),
                Value::Sequence(site_tags.into_iter().map(Value::String).collect()),
            );
        }

        let date = self
            .dates
            .publication_date(&output_path, prior.as_deref(), &note.frontmatter, now);
        let doc = self.dates.creation_date(&note.path, now);
        debug!(
            note = %note.file_name(),
            date_source = ?date.source,
            doc_source = ?doc.source,
            "Resolved dates"
        );

        frontmatter.insert("date".into(), Value::String(date.value));
        frontmatter.insert("doc".into(), Value::String(doc.value));
        frontmatter.insert(
            "title".into(),
            Value::String(titlecase(&note.title()).replace(';', ":")),
        );
        frontmatter.insert("author".into(), Value::String(self.site.author.clone()));

        let links = self.rewriter.rewrite_links(&note.body);
        let embeds = self.rewriter.rewrite_embeds(&links.content);
        let mut body = embeds.content;

        if self.features.related_reading {
            if let Some(section) = self.rewriter.related_section(
                &note.related(),
                slug,
                &links.references,
                &self.site.related_heading,
            ) {
                body.push_str(&section);
            }
        }

        let missing_media = self.process_media(&embeds.media, &note.file_name());

        let yaml = serde_yaml::to_string(&frontmatter)
            .with_context(|| format!("Failed to serialize frontmatter for {}", note.file_name()))?;
        let document = format!("---\n{}---\n{}", yaml, body);

        let changed = self
            .content
            .write_if_changed(&filename, &document)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        Ok(PublishedNote {
            changed,
            missing_media,
        })
    }

    /// Locate and optimize every embedded file; returns the ones not found.
    fn process_media(&self, media: &BTreeSet<String>, note: &str) -> Vec<String> {
        if !self.features.optimize_images {
            return Vec::new();
        }

        let mut missing = Vec::new();
        for name in media {
            let Some(source) = self.locator.locate(name) else {
                warn!(note = %note, image = %name, "Image not found");
                missing.push(name.clone());
                continue;
            };

            let base = media_slug(name);
            let result = self
                .optimizer
                .optimize(&source, self.media.root(), &base, &self.image_params);
            if let Err(e) = result {
                warn!(note = %note, image = %name, "Image optimization failed: {}", e);
            }
        }

        missing
    }
}

/// Slug of the note's title, or of its file stem when the title has no
/// URL-safe characters
fn note_slug(note: &Note) -> Option<String> {
    let slug = slugify(&note.title());
    if !slug.is_empty() {
        return Some(slug);
    }
    let stem = Path::new(&note.file_name())
        .file_stem()
        .map(|s| slugify(&s.to_string_lossy()))
        .unwrap_or_default();
    (!stem.is_empty()).then_some(stem)
}

fn rewriter_for(site: &SiteConfig, optimizer: &dyn ImageOptimizer) -> LinkRewriter {
    LinkRewriter::new(
        &site.link_prefix,
        &site.media_prefix,
        optimizer.media_extension(),
    )
}
