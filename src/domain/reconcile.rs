//! Mark-and-sweep set computations for published output

use crate::domain::note::{parse_frontmatter, Frontmatter};
use pulldown_cmark::{Event, Parser as MdParser, Tag};
use std::collections::BTreeSet;
use std::path::Path;

/// Files present in `existing` but absent from `keep`, in listing order
pub fn orphans(existing: &[String], keep: &BTreeSet<String>) -> Vec<String> {
    existing
        .iter()
        .filter(|name| !keep.contains(*name))
        .cloned()
        .collect()
}

/// Media file names referenced by image destinations under `media_prefix`
/// in a published document. The frontmatter block is ignored.
pub fn media_references(document: &str, media_prefix: &str) -> BTreeSet<String> {
    let body = match parse_frontmatter(document) {
        Frontmatter::Parsed { body, .. } => body,
        _ => document,
    };
    let prefix = format!("{}/", media_prefix.trim_end_matches('/'));

    MdParser::new(body)
        .filter_map(|event| match event {
            Event::Start(Tag::Image { dest_url, .. }) => dest_url
                .strip_prefix(prefix.as_str())
                .filter(|name| !name.is_empty() && !name.contains('/'))
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

/// Expand references so a `<name>.<target>` reference also keeps the
/// `<name>.<fallback>` files an optimizer may leave beside it.
pub fn retained_media(
    references: &BTreeSet<String>,
    target_extension: &str,
    fallback_extensions: &[String],
) -> BTreeSet<String> {
    let target = target_extension.trim_start_matches('.');
    let mut keep = references.clone();

    for name in references {
        let path = Path::new(name);
        let is_target = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(target));
        if !is_target {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        for fallback in fallback_extensions {
            keep.insert(format!("{}.{}", stem, fallback.trim_start_matches('.')));
        }
    }

    keep
}
