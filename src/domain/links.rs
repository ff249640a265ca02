//! Wikilink and embedded-media rewriting
//!
//! Both passes are pure: they return the rewritten text together with the set
//! of names they touched instead of filling a caller-provided accumulator.

use crate::domain::slug::slugify;
use pulldown_cmark::{Event, Parser as MdParser, Tag};
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

/// `[[target]]`, `[[target|alias]]` and, with a leading `!`, embeds
fn wikilink_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(!?)\[\[([^\]]+)\]\]").unwrap())
}

fn embed_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"!\[\[([^\]]+)\]\]").unwrap())
}

/// Output of the cross-reference pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRewrite {
    pub content: String,
    /// Distinct link targets as written, before slugging
    pub references: BTreeSet<String>,
}

/// Output of the embedded-media pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRewrite {
    pub content: String,
    /// Original media file names, extension included
    pub media: BTreeSet<String>,
}

/// Extension of the file the publisher writes for an embedded media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaExtension {
    /// Every file is converted to this extension
    Target(String),
    /// The source extension is kept, lowercased
    Source,
}

impl MediaExtension {
    pub fn target(extension: &str) -> Self {
        MediaExtension::Target(extension.trim_start_matches('.').to_string())
    }
}

/// Rewrites vault link syntax into site-relative markdown
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    link_prefix: String,
    media_prefix: String,
    media_extension: MediaExtension,
}

impl LinkRewriter {
    pub fn new(link_prefix: &str, media_prefix: &str, media_extension: MediaExtension) -> Self {
        LinkRewriter {
            link_prefix: link_prefix.trim_end_matches('/').to_string(),
            media_prefix: media_prefix.trim_end_matches('/').to_string(),
            media_extension,
        }
    }

    /// Site path of the note whose title is `target`
    pub fn note_url(&self, target: &str) -> String {
        format!("{}/{}", self.link_prefix, slugify(target))
    }

    /// File name the published form of `media_name` is written under
    pub fn media_file_name(&self, media_name: &str) -> String {
        let slug = media_slug(media_name);
        let extension = match &self.media_extension {
            MediaExtension::Target(ext) => Some(ext.clone()),
            MediaExtension::Source => Path::new(media_name)
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase()),
        };
        match extension {
            Some(ext) if !ext.is_empty() => format!("{}.{}", slug, ext),
            _ => slug,
        }
    }

    /// Site path of the published form of `media_name`
    pub fn media_url(&self, media_name: &str) -> String {
        format!("{}/{}", self.media_prefix, self.media_file_name(media_name))
    }

    /// Replace `[[target]]` / `[[target|alias]]` with markdown links.
    ///
    /// Embeds (`![[...]]`) are left untouched for [`Self::rewrite_embeds`],
    /// and so is anything inside code or raw HTML blocks.
    ///
    /// # Examples
    ///
    /// ```
    /// use notepress::domain::{LinkRewriter, MediaExtension};
    ///
    /// let rewriter = LinkRewriter::new("/blog", "/images", MediaExtension::target("webp"));
    /// let result = rewriter.rewrite_links("See [[Another Note|this]].");
    /// assert_eq!(result.content, "See [this](/blog/another-note).");
    /// assert!(result.references.contains("Another Note"));
    /// ```
    pub fn rewrite_links(&self, content: &str) -> LinkRewrite {
        let mut references = BTreeSet::new();
        let literal = literal_ranges(content);

        let rewritten = wikilink_regex().replace_all(content, |caps: &Captures<'_>| {
            if !caps[1].is_empty() || is_literal(&literal, caps.get(0)) {
                return caps[0].to_string();
            }

            let (target, alias) = split_alias(&caps[2]);
            references.insert(target.to_string());
            format!("[{}]({})", alias.unwrap_or(target), self.note_url(target))
        });

        LinkRewrite {
            content: rewritten.into_owned(),
            references,
        }
    }

    /// Replace `![[file.png]]` with markdown images pointing at the
    /// optimized asset, collecting every original file name.
    ///
    /// Embeds inside code or raw HTML are kept verbatim and not collected,
    /// matching what the media sweep sees in the published document. So are
    /// embeds whose file name has no URL-safe characters.
    pub fn rewrite_embeds(&self, content: &str) -> MediaRewrite {
        let mut media = BTreeSet::new();
        let literal = literal_ranges(content);

        let rewritten = embed_regex().replace_all(content, |caps: &Captures<'_>| {
            if is_literal(&literal, caps.get(0)) {
                return caps[0].to_string();
            }
            // Obsidian puts display size after the pipe: ![[photo.png|300]]
            let (name, _) = split_alias(&caps[1]);
            let slug = media_slug(name);
            if slug.is_empty() {
                return caps[0].to_string();
            }
            media.insert(name.to_string());
            format!("![{}]({})", slug, self.media_url(name))
        });

        MediaRewrite {
            content: rewritten.into_owned(),
            media,
        }
    }

    /// Build the "related reading" block appended to a note body.
    ///
    /// Entries pointing at the note itself or already linked inline are
    /// skipped; returns `None` when nothing is left so no empty heading is
    /// ever emitted.
    pub fn related_section(
        &self,
        related: &[String],
        own_slug: &str,
        references: &BTreeSet<String>,
        heading: &str,
    ) -> Option<String> {
        let mut seen = BTreeSet::new();
        let mut items = Vec::new();

        for entry in related {
            let inner = strip_brackets(entry);
            let (name, _) = split_alias(inner);
            let slug = slugify(name);

            if name.is_empty() || slug.is_empty() {
                continue;
            }
            if slug == own_slug || references.contains(name) {
                continue;
            }
            if !seen.insert(slug.clone()) {
                continue;
            }

            items.push(format!("- [{}]({}/{})", name, self.link_prefix, slug));
        }

        if items.is_empty() {
            return None;
        }

        Some(format!(
            "\n\n---\n\n## {}\n\n{}\n",
            heading,
            items.join("\n")
        ))
    }
}

/// Slugged file stem of a media reference
pub fn media_slug(media_name: &str) -> String {
    let stem = Path::new(media_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| media_name.to_string());
    slugify(&stem)
}

/// Byte ranges markdown renders verbatim: code spans, code blocks and raw
/// HTML blocks
fn literal_ranges(content: &str) -> Vec<Range<usize>> {
    MdParser::new(content)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_) | Tag::HtmlBlock) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

fn is_literal(literal: &[Range<usize>], found: Option<regex::Match<'_>>) -> bool {
    found.is_some_and(|m| literal.iter().any(|r| r.start <= m.start() && m.end() <= r.end))
}

fn split_alias(inner: &str) -> (&str, Option<&str>) {
    match inner.split_once('|') {
        Some((target, alias)) => (target.trim(), Some(alias.trim())),
        None => (inner.trim(), None),
    }
}

fn strip_brackets(entry: &str) -> &str {
    let trimmed = entry.trim();
    let trimmed = trimmed.strip_prefix("[[").unwrap_or(trimmed);
    trimmed.strip_suffix("]]").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> LinkRewriter {
        LinkRewriter::new("/blog", "/images", MediaExtension::target("webp"))
    }

    fn refs(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rewrite_links_plain_and_alias() {
        let result = rewriter()
            .rewrite_links("A [[Another Note]] and [[Complex Note Title|simpler alias]].");
        assert_eq!(
            result.content,
            "A [Another Note](/blog/another-note) and [simpler alias](/blog/complex-note-title)."
        );
        assert_eq!(result.references, refs(&["Another Note", "Complex Note Title"]));
    }

    #[test]
    fn test_rewrite_links_skips_embeds() {
        let result = rewriter().rewrite_links("![[diagram.png]] then [[Note]]");
        assert_eq!(result.content, "![[diagram.png]] then [Note](/blog/note)");
        assert_eq!(result.references, refs(&["Note"]));
    }

    #[test]
    fn test_rewrite_links_deduplicates_references() {
        let result = rewriter().rewrite_links("[[A]] [[A|again]] [[ A ]]");
        assert_eq!(result.references, refs(&["A"]));
        assert_eq!(
            result.content,
            "[A](/blog/a) [again](/blog/a) [A](/blog/a)"
        );
    }

    #[test]
    fn test_rewrite_links_no_links() {
        let result = rewriter().rewrite_links("nothing [here](/x) to [do]");
        assert_eq!(result.content, "nothing [here](/x) to [do]");
        assert!(result.references.is_empty());
    }

    #[test]
    fn test_rewrite_embeds() {
        let result = rewriter().rewrite_embeds("Look: ![[diagram.png]]");
        assert_eq!(result.content, "Look: ![diagram](/images/diagram.webp)");
        assert_eq!(result.media, refs(&["diagram.png"]));
    }

    #[test]
    fn test_rewrite_embeds_slugs_names_and_drops_size() {
        let result = rewriter().rewrite_embeds("![[My Photo 1.JPG|300]] ![[Scan.pdf]]");
        assert_eq!(
            result.content,
            "![my-photo-1](/images/my-photo-1.webp) ![scan](/images/scan.webp)"
        );
        assert_eq!(result.media, refs(&["My Photo 1.JPG", "Scan.pdf"]));
    }

    #[test]
    fn test_link_then_embed_pipeline() {
        let r = rewriter();
        let links = r.rewrite_links("See [[Another Note]] and ![[diagram.png]].");
        let embeds = r.rewrite_embeds(&links.content);
        assert_eq!(
            embeds.content,
            "See [Another Note](/blog/another-note) and ![diagram](/images/diagram.webp)."
        );
        assert_eq!(links.references, refs(&["Another Note"]));
        assert_eq!(embeds.media, refs(&["diagram.png"]));
    }

    #[test]
    fn test_related_section_renders_list() {
        let related = vec!["[[First Note]]".to_string(), "[[Second|2nd]]".to_string()];
        let section = rewriter()
            .related_section(&related, "me", &BTreeSet::new(), "Related Reading")
            .unwrap();
        assert_eq!(
            section,
            "\n\n---\n\n## Related Reading\n\n- [First Note](/blog/first-note)\n- [Second](/blog/second)\n"
        );
    }

    #[test]
    fn test_related_section_skips_self_and_inline_references() {
        let related = vec![
            "[[Me]]".to_string(),
            "[[Linked Inline]]".to_string(),
            "Plain Entry".to_string(),
            "[[plain entry]]".to_string(),
        ];
        let section = rewriter()
            .related_section(&related, "me", &refs(&["Linked Inline"]), "Related")
            .unwrap();
        assert!(!section.contains("/blog/me)"));
        assert!(!section.contains("Linked Inline"));
        assert_eq!(section.matches("/blog/plain-entry").count(), 1);
    }

    #[test]
    fn test_related_section_empty_is_none() {
        let r = rewriter();
        assert_eq!(r.related_section(&[], "me", &BTreeSet::new(), "Related"), None);
        let only_self = vec!["[[Me]]".to_string(), "  ".to_string()];
        assert_eq!(
            r.related_section(&only_self, "me", &BTreeSet::new(), "Related"),
            None
        );
    }

    #[test]
    fn test_prefixes_are_normalized() {
        let r = LinkRewriter::new("/notes/", "/static/img/", MediaExtension::target(".png"));
        assert_eq!(r.note_url("A B"), "/notes/a-b");
        assert_eq!(r.media_url("x.jpg"), "/static/img/x.png");
    }

    #[test]
    fn test_source_extension_is_kept_lowercased() {
        let r = LinkRewriter::new("/blog", "/images", MediaExtension::Source);
        assert_eq!(r.media_url("My Logo.SVG"), "/images/my-logo.svg");
        assert_eq!(r.media_file_name("diagram.png"), "diagram.png");
        assert_eq!(r.media_file_name("README"), "readme");

        let result = r.rewrite_embeds("![[Scan.pdf]]");
        assert_eq!(result.content, "![scan](/images/scan.pdf)");
    }

    #[test]
    fn test_rewrite_embeds_leaves_code_alone() {
        let text = "```\n![[chart.png]]\n```\n\nInline `![[inline.png]]` and ![[real.png]]\n\n    ![[indented.png]]\n";
        let result = rewriter().rewrite_embeds(text);

        assert_eq!(result.media, refs(&["real.png"]));
        assert!(result.content.starts_with("```\n![[chart.png]]\n```"));
        assert!(result.content.contains("`![[inline.png]]`"));
        assert!(result.content.contains("![real](/images/real.webp)"));
        assert!(result.content.contains("    ![[indented.png]]"));
    }

    #[test]
    fn test_rewrite_embeds_skips_unsluggable_names() {
        let result = rewriter().rewrite_embeds("![[???.png]] ![[ok.png]]");
        assert_eq!(result.content, "![[???.png]] ![ok](/images/ok.webp)");
        assert_eq!(result.media, refs(&["ok.png"]));
    }

    #[test]
    fn test_rewrite_embeds_leaves_html_blocks_alone() {
        let result = rewriter().rewrite_embeds("<div>\n![[boxed.png]]\n</div>\n\n![[open.png]]\n");
        assert_eq!(result.media, refs(&["open.png"]));
        assert!(result.content.contains("<div>\n![[boxed.png]]\n</div>"));
    }

    #[test]
    fn test_rewrite_links_leaves_code_alone() {
        let result = rewriter().rewrite_links("`[[Literal]]` and [[Real Note]]");
        assert_eq!(result.content, "`[[Literal]]` and [Real Note](/blog/real-note)");
        assert_eq!(result.references, refs(&["Real Note"]));
    }
}
