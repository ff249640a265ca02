//! Mapping of hierarchical tags onto site taxonomies (topics, categories, series)

use super::parser::HierarchicalTag;
use crate::domain::slug::{capitalize, singularize, slugify, titleize};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Leaf terms too generic to stand alone as a topic.
pub const DEFAULT_GENERIC_TERMS: &[&str] = &[
    "analysis",
    "complexity",
    "theory",
    "general",
    "miscellaneous",
    "optimization",
    "design",
];

/// Parent segments whose disambiguating label is not simply their singular form.
pub const DEFAULT_CONTEXT_LABELS: &[(&str, &str)] = &[
    ("math", "mathematical"),
    ("maths", "mathematical"),
    ("mathematics", "mathematical"),
    ("physics", "physical"),
    ("stats", "statistical"),
    ("statistics", "statistical"),
];

/// Target category plus subcategories for a domain tag prefix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Configurable tables driving the tag conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyRules {
    /// Domain tag path prefix -> categories
    pub domain_mappings: BTreeMap<String, CategoryMapping>,
    /// Full type tag -> series name
    pub type_mappings: BTreeMap<String, String>,
    pub generic_terms: Vec<String>,
    pub context_labels: BTreeMap<String, String>,
}

impl Default for TaxonomyRules {
    fn default() -> Self {
        TaxonomyRules {
            domain_mappings: BTreeMap::new(),
            type_mappings: BTreeMap::new(),
            generic_terms: DEFAULT_GENERIC_TERMS.iter().map(|s| s.to_string()).collect(),
            context_labels: DEFAULT_CONTEXT_LABELS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Site taxonomy terms derived from one note's tags; each list sorted and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomies {
    pub topics: Vec<String>,
    pub categories: Vec<String>,
    pub series: Vec<String>,
}

/// Converts hierarchical tags to site taxonomies
#[derive(Debug, Clone)]
pub struct TagConverter {
    domain_mappings: BTreeMap<String, CategoryMapping>,
    type_mappings: BTreeMap<String, String>,
    generic_terms: HashSet<String>,
    context_labels: BTreeMap<String, String>,
}

impl TagConverter {
    pub fn new(rules: &TaxonomyRules) -> Self {
        TagConverter {
            domain_mappings: rules.domain_mappings.clone(),
            type_mappings: rules.type_mappings.clone(),
            generic_terms: rules
                .generic_terms
                .iter()
                .map(|term| term.to_lowercase())
                .collect(),
            context_labels: rules
                .context_labels
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
        }
    }

    fn is_generic(&self, leaf: &str) -> bool {
        self.generic_terms.contains(&leaf.to_lowercase())
    }

    fn context_label(&self, segment: &str) -> String {
        self.context_labels
            .get(&segment.to_lowercase())
            .cloned()
            .unwrap_or_else(|| singularize(segment))
    }

    /// Convert a tag to a topic string.
    ///
    /// Generic leaves borrow their parent for context so that, for example,
    /// `algorithms/analysis` and `math/analysis` stay distinct.
    ///
    /// # Examples
    ///
    /// ```
    /// use notepress::domain::tags::{TagConverter, TaxonomyRules};
    ///
    /// let converter = TagConverter::new(&TaxonomyRules::default());
    /// assert_eq!(converter.tag_to_topic("domain/cs/algorithms/analysis"), "Algorithm-Analysis");
    /// assert_eq!(converter.tag_to_topic("domain/math/analysis"), "Mathematical-Analysis");
    /// assert_eq!(converter.tag_to_topic("domain/cs/systems/databases"), "Databases");
    /// ```
    pub fn tag_to_topic(&self, tag: &str) -> String {
        let parsed = HierarchicalTag::parse(tag);
        let leaf = parsed.leaf();

        let base = if self.is_generic(leaf) {
            match &parsed {
                HierarchicalTag::Domain {
                    subdomain: Some(subdomain),
                    ..
                } if !subdomain.eq_ignore_ascii_case(leaf) => {
                    format!("{}-{}", self.context_label(subdomain), leaf)
                }
                HierarchicalTag::Domain { domain, .. } => {
                    format!("{}-{}", self.context_label(domain), leaf)
                }
                _ => leaf.to_string(),
            }
        } else {
            leaf.to_string()
        };

        slugify(&base)
            .split('-')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Categories for a domain tag: the longest configured prefix wins,
    /// otherwise the uppercased domain plus the title-cased subdomain.
    pub fn get_categories_from_tag(&self, tag: &str) -> Vec<String> {
        let parsed = HierarchicalTag::parse(tag);
        let HierarchicalTag::Domain {
            domain, subdomain, ..
        } = &parsed
        else {
            return Vec::new();
        };

        let parts: Vec<&str> = tag.split('/').collect();
        for len in (2..=parts.len()).rev() {
            let prefix = parts[..len].join("/");
            if let Some(mapping) = self.domain_mappings.get(&prefix) {
                let mut categories = Vec::new();
                if !mapping.category.is_empty() {
                    categories.push(mapping.category.clone());
                }
                categories.extend(mapping.subcategories.iter().cloned());
                return categories;
            }
        }

        let mut categories = vec![domain.to_uppercase()];
        if let Some(subdomain) = subdomain {
            categories.push(titleize(subdomain));
        }
        categories
    }

    /// Series for a type tag: explicit mapping, else the title-cased type segment.
    pub fn get_series_from_tag(&self, tag: &str) -> Option<String> {
        if let Some(series) = self.type_mappings.get(tag) {
            return Some(series.clone());
        }

        match HierarchicalTag::parse(tag) {
            HierarchicalTag::Type { kind, .. } if !kind.is_empty() => Some(titleize(&kind)),
            _ => None,
        }
    }

    /// Convert a note's full tag set into site taxonomies.
    pub fn convert_tags(&self, tags: &BTreeSet<String>) -> Taxonomies {
        let mut topics = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut series = BTreeSet::new();

        for tag in tags {
            match HierarchicalTag::parse(tag) {
                HierarchicalTag::Domain { .. } => {
                    topics.insert(self.tag_to_topic(tag));
                    categories.extend(self.get_categories_from_tag(tag));
                }
                HierarchicalTag::Type { .. } => {
                    series.extend(self.get_series_from_tag(tag));
                }
                HierarchicalTag::Status { .. } => {}
                HierarchicalTag::Opaque { .. } => {
                    topics.insert(self.tag_to_topic(tag));
                }
            }
        }

        Taxonomies {
            topics: topics.into_iter().collect(),
            categories: categories.into_iter().collect(),
            series: series.into_iter().collect(),
        }
    }

    /// Domain tags only, sorted; status and type tags are internal.
    pub fn filter_tags_for_frontmatter(&self, tags: &BTreeSet<String>) -> Vec<String> {
        tags.iter()
            .filter(|tag| HierarchicalTag::parse(tag).is_domain())
            .cloned()
            .collect()
    }

    /// Build published frontmatter: drops `related` and `tags`, adds the
    /// non-empty taxonomies. The site takes a single series, the first in sort order.
    pub fn enhance_frontmatter(&self, frontmatter: &Mapping, tags: &BTreeSet<String>) -> Mapping {
        let taxonomies = self.convert_tags(tags);
        let mut enhanced = frontmatter.clone();

        enhanced.shift_remove("related");
        enhanced.shift_remove("tags");

        if !taxonomies.topics.is_empty() {
            enhanced.insert("topics".into(), string_sequence(taxonomies.topics));
        }
        if !taxonomies.categories.is_empty() {
            enhanced.insert("categories".into(), string_sequence(taxonomies.categories));
        }
        if let Some(series) = taxonomies.series.into_iter().next() {
            enhanced.insert("series".into(), Value::String(series));
        }

        enhanced
    }
}

fn string_sequence(items: Vec<String>) -> Value {
    Value::Sequence(items.into_iter().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> TagConverter {
        let mut rules = TaxonomyRules::default();
        rules.domain_mappings.insert(
            "domain/cs/algorithms".to_string(),
            CategoryMapping {
                category: "Computer Science".to_string(),
                subcategories: vec!["Algorithms".to_string()],
            },
        );
        rules.domain_mappings.insert(
            "domain/cs".to_string(),
            CategoryMapping {
                category: "Computer Science".to_string(),
                subcategories: vec![],
            },
        );
        rules
            .type_mappings
            .insert("type/zettelkasten".to_string(), "Zettelkasten Notes".to_string());
        TagConverter::new(&rules)
    }

    fn tag_set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_topic_generic_uses_subdomain() {
        let c = converter();
        assert_eq!(c.tag_to_topic("domain/cs/algorithms/analysis"), "Algorithm-Analysis");
        assert_eq!(c.tag_to_topic("domain/cs/algorithms/complexity"), "Algorithm-Complexity");
    }

    #[test]
    fn test_topic_generic_falls_back_to_domain() {
        let c = converter();
        assert_eq!(c.tag_to_topic("domain/math/analysis"), "Mathematical-Analysis");
        assert_eq!(c.tag_to_topic("domain/finance/theory"), "Finance-Theory");
    }

    #[test]
    fn test_topic_generic_is_case_insensitive() {
        let c = converter();
        assert_eq!(c.tag_to_topic("domain/cs/algorithms/Analysis"), "Algorithm-Analysis");
    }

    #[test]
    fn test_topic_generic_outside_domain_is_bare() {
        let c = converter();
        assert_eq!(c.tag_to_topic("design"), "Design");
        assert_eq!(c.tag_to_topic("project/design"), "Design");
    }

    #[test]
    fn test_topic_specific_leaf() {
        let c = converter();
        assert_eq!(c.tag_to_topic("domain/cs/systems/databases"), "Databases");
        assert_eq!(
            c.tag_to_topic("domain/math/probability-statistics"),
            "Probability-Statistics"
        );
    }

    #[test]
    fn test_custom_generic_terms() {
        let rules = TaxonomyRules {
            generic_terms: vec!["Basics".to_string()],
            ..TaxonomyRules::default()
        };
        let c = TagConverter::new(&rules);
        assert_eq!(c.tag_to_topic("domain/cs/compilers/basics"), "Compiler-Basics");
        assert_eq!(c.tag_to_topic("domain/cs/algorithms/analysis"), "Analysis");
    }

    #[test]
    fn test_categories_longest_prefix_wins() {
        let c = converter();
        assert_eq!(
            c.get_categories_from_tag("domain/cs/algorithms/analysis"),
            vec!["Computer Science", "Algorithms"]
        );
        assert_eq!(
            c.get_categories_from_tag("domain/cs/systems/databases"),
            vec!["Computer Science"]
        );
    }

    #[test]
    fn test_categories_fallback() {
        let c = converter();
        assert_eq!(
            c.get_categories_from_tag("domain/math/probability-statistics"),
            vec!["MATH", "Probability Statistics"]
        );
        assert_eq!(c.get_categories_from_tag("domain/finance"), vec!["FINANCE"]);
    }

    #[test]
    fn test_categories_only_for_domain_tags() {
        let c = converter();
        assert!(c.get_categories_from_tag("type/zettelkasten").is_empty());
        assert!(c.get_categories_from_tag("evergreen").is_empty());
    }

    #[test]
    fn test_series_mapping_and_fallback() {
        let c = converter();
        assert_eq!(
            c.get_series_from_tag("type/zettelkasten"),
            Some("Zettelkasten Notes".to_string())
        );
        assert_eq!(
            c.get_series_from_tag("type/literature-note"),
            Some("Literature Note".to_string())
        );
        assert_eq!(c.get_series_from_tag("domain/cs"), None);
    }

    #[test]
    fn test_convert_tags() {
        let c = converter();
        let result = c.convert_tags(&tag_set(&[
            "domain/cs/algorithms/analysis",
            "domain/cs/algorithms/complexity",
            "type/zettelkasten",
            "status/evergreen",
        ]));

        assert_eq!(result.topics, vec!["Algorithm-Analysis", "Algorithm-Complexity"]);
        assert_eq!(result.categories, vec!["Algorithms", "Computer Science"]);
        assert_eq!(result.series, vec!["Zettelkasten Notes"]);
    }

    #[test]
    fn test_convert_tags_opaque_become_topics() {
        let c = converter();
        let result = c.convert_tags(&tag_set(&["rust", "status/draft"]));
        assert_eq!(result.topics, vec!["Rust"]);
        assert!(result.categories.is_empty());
        assert!(result.series.is_empty());
    }

    #[test]
    fn test_filter_tags_for_frontmatter() {
        let c = converter();
        let tags = tag_set(&["domain/cs/algorithms", "type/zettelkasten", "status/evergreen"]);
        assert_eq!(c.filter_tags_for_frontmatter(&tags), vec!["domain/cs/algorithms"]);
    }

    #[test]
    fn test_enhance_frontmatter() {
        let c = converter();
        let fm: Mapping = serde_yaml::from_str(
            "title: Note\ntags:\n  - domain/cs/algorithms/analysis\nrelated:\n  - \"[[Other]]\"\n",
        )
        .unwrap();
        let tags = tag_set(&[
            "domain/cs/algorithms/analysis",
            "type/zettelkasten",
            "type/literature-note",
        ]);

        let enhanced = c.enhance_frontmatter(&fm, &tags);

        assert!(enhanced.get("tags").is_none());
        assert!(enhanced.get("related").is_none());
        assert_eq!(enhanced.get("title"), Some(&Value::String("Note".to_string())));
        assert_eq!(
            enhanced.get("topics"),
            Some(&string_sequence(vec!["Algorithm-Analysis".to_string()]))
        );
        // "Literature Note" sorts before "Zettelkasten Notes"
        assert_eq!(
            enhanced.get("series"),
            Some(&Value::String("Literature Note".to_string()))
        );
    }

    #[test]
    fn test_enhance_frontmatter_omits_empty_lists() {
        let c = converter();
        let enhanced = c.enhance_frontmatter(&Mapping::new(), &tag_set(&["status/evergreen"]));
        assert!(enhanced.is_empty());
    }
}
