//! Source notes and YAML frontmatter

use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Marker line opening and closing a frontmatter block
pub const FRONTMATTER_MARKER: &str = "---";

/// Outcome of splitting a document into frontmatter and body
#[derive(Debug, Clone, PartialEq)]
pub enum Frontmatter<'a> {
    /// No leading marker line; the whole text is body
    Absent,
    /// A well-formed block
    Parsed { fields: Mapping, body: &'a str },
    /// A block was present but could not be used; callers treat the whole
    /// text as body and report the reason
    Malformed { reason: String },
}

/// Split `content` into its frontmatter mapping and body.
///
/// The first line must be exactly `---` (a leading BOM is ignored) and the
/// block ends at the next `---` line. An empty block yields an empty mapping.
pub fn parse_frontmatter(content: &str) -> Frontmatter<'_> {
    let text = content.trim_start_matches('\u{feff}');

    let Some(first_end) = text.find('\n') else {
        return Frontmatter::Absent;
    };
    if text[..first_end].trim_end() != FRONTMATTER_MARKER {
        return Frontmatter::Absent;
    }

    let block_start = first_end + 1;
    let mut offset = block_start;
    let mut block_end = None;
    for line in text[block_start..].split_inclusive('\n') {
        if line.trim_end() == FRONTMATTER_MARKER {
            block_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((yaml_end, body_start)) = block_end else {
        return Frontmatter::Malformed {
            reason: "unterminated frontmatter block".to_string(),
        };
    };

    let yaml = &text[block_start..yaml_end];
    let body = &text[body_start..];

    if yaml.trim().is_empty() {
        return Frontmatter::Parsed {
            fields: Mapping::new(),
            body,
        };
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(fields)) => Frontmatter::Parsed { fields, body },
        Ok(Value::Null) => Frontmatter::Parsed {
            fields: Mapping::new(),
            body,
        },
        Ok(_) => Frontmatter::Malformed {
            reason: "frontmatter is not a mapping".to_string(),
        },
        Err(e) => Frontmatter::Malformed {
            reason: e.to_string(),
        },
    }
}

/// Render a scalar YAML value as text; sequences, mappings and nulls yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// Read a field declared either as a single string or as a list of strings.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

/// Normalized tag set from a `tags` field in either accepted shape
pub fn extract_tags(frontmatter: &Mapping) -> BTreeSet<String> {
    frontmatter
        .get("tags")
        .map(string_list)
        .unwrap_or_default()
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// A source note read from the vault
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub path: PathBuf,
    pub frontmatter: Mapping,
    pub body: String,
    pub tags: BTreeSet<String>,
}

impl Note {
    /// Build a note from raw file content.
    ///
    /// Returns the note plus the reason its frontmatter was discarded, if it was.
    pub fn from_source(path: &Path, content: &str) -> (Self, Option<String>) {
        let (frontmatter, body, problem) = match parse_frontmatter(content) {
            Frontmatter::Absent => (Mapping::new(), content.to_string(), None),
            Frontmatter::Parsed { fields, body } => (fields, body.to_string(), None),
            Frontmatter::Malformed { reason } => {
                (Mapping::new(), content.to_string(), Some(reason))
            }
        };

        let tags = extract_tags(&frontmatter);
        let note = Note {
            path: path.to_path_buf(),
            frontmatter,
            body,
            tags,
        };
        (note, problem)
    }

    /// File name without extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The `title` field, falling back to the file stem
    pub fn title(&self) -> String {
        self.frontmatter
            .get("title")
            .and_then(scalar_to_string)
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| self.stem())
    }

    /// Entries of the `related` field
    pub fn related(&self) -> Vec<String> {
        self.frontmatter
            .get("related")
            .map(string_list)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter_absent() {
        assert_eq!(parse_frontmatter("# Title\nBody"), Frontmatter::Absent);
        assert_eq!(parse_frontmatter(""), Frontmatter::Absent);
        assert_eq!(parse_frontmatter("---"), Frontmatter::Absent);
    }

    #[test]
    fn test_parse_frontmatter_basic() {
        let content = "---\ntitle: Hello\ntags:\n  - a\n---\n# Body\n";
        match parse_frontmatter(content) {
            Frontmatter::Parsed { fields, body } => {
                assert_eq!(fields.get("title"), Some(&Value::String("Hello".into())));
                assert_eq!(body, "# Body\n");
            }
            other => panic!("Expected parsed frontmatter, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_frontmatter_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Hello\r\n---\r\nBody";
        match parse_frontmatter(content) {
            Frontmatter::Parsed { fields, body } => {
                assert_eq!(fields.get("title"), Some(&Value::String("Hello".into())));
                assert_eq!(body, "Body");
            }
            other => panic!("Expected parsed frontmatter, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_frontmatter_empty_block() {
        match parse_frontmatter("---\n---\nBody") {
            Frontmatter::Parsed { fields, body } => {
                assert!(fields.is_empty());
                assert_eq!(body, "Body");
            }
            other => panic!("Expected parsed frontmatter, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_frontmatter_unterminated() {
        assert!(matches!(
            parse_frontmatter("---\ntitle: x\nno closing marker"),
            Frontmatter::Malformed { .. }
        ));
    }

    #[test]
    fn test_parse_frontmatter_invalid_yaml() {
        assert!(matches!(
            parse_frontmatter("---\ntitle: [unclosed\n---\nBody"),
            Frontmatter::Malformed { .. }
        ));
    }

    #[test]
    fn test_parse_frontmatter_not_a_mapping() {
        assert!(matches!(
            parse_frontmatter("---\n- a\n- b\n---\nBody"),
            Frontmatter::Malformed { .. }
        ));
    }

    #[test]
    fn test_extract_tags_list_and_string_forms_agree() {
        let list: Mapping = serde_yaml::from_str("tags:\n  - status/evergreen\n").unwrap();
        let single: Mapping = serde_yaml::from_str("tags: status/evergreen\n").unwrap();
        assert_eq!(extract_tags(&list), extract_tags(&single));
        assert!(extract_tags(&list).contains("status/evergreen"));
    }

    #[test]
    fn test_extract_tags_stringifies_scalars_and_skips_blanks() {
        let fm: Mapping = serde_yaml::from_str("tags:\n  - 2024\n  - ' '\n  - rust\n").unwrap();
        let tags = extract_tags(&fm);
        assert_eq!(
            tags.into_iter().collect::<Vec<_>>(),
            vec!["2024".to_string(), "rust".to_string()]
        );
    }

    #[test]
    fn test_extract_tags_missing() {
        assert!(extract_tags(&Mapping::new()).is_empty());
    }

    #[test]
    fn test_note_from_source_malformed_keeps_full_text() {
        let content = "---\ntags: [oops\n---\nBody";
        let (note, problem) = Note::from_source(Path::new("/v/a.md"), content);
        assert!(problem.is_some());
        assert!(note.frontmatter.is_empty());
        assert!(note.tags.is_empty());
        assert_eq!(note.body, content);
    }

    #[test]
    fn test_note_title_fallback_to_stem() {
        let (note, _) = Note::from_source(Path::new("/v/My Note.md"), "Body");
        assert_eq!(note.title(), "My Note");
        assert_eq!(note.file_name(), "My Note.md");

        let (titled, _) = Note::from_source(Path::new("/v/x.md"), "---\ntitle: Real Title\n---\n");
        assert_eq!(titled.title(), "Real Title");
    }

    #[test]
    fn test_note_related_forms() {
        let (note, _) = Note::from_source(
            Path::new("/v/x.md"),
            "---\nrelated:\n  - \"[[A]]\"\n  - \"[[B|bee]]\"\n---\n",
        );
        assert_eq!(note.related(), vec!["[[A]]", "[[B|bee]]"]);

        let (single, _) = Note::from_source(Path::new("/v/y.md"), "---\nrelated: \"[[A]]\"\n---\n");
        assert_eq!(single.related(), vec!["[[A]]"]);
    }
}
