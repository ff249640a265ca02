//! Hierarchical tag parsing
//!
//! Tags are slash-delimited paths such as `domain/cs/algorithms/analysis`.
//! The first segment selects how the rest is interpreted.

/// Root segment of subject-area tags.
pub const DOMAIN_ROOT: &str = "domain";
/// Root segment of content-type tags.
pub const TYPE_ROOT: &str = "type";
/// Root segment of workflow-status tags.
pub const STATUS_ROOT: &str = "status";

/// A tag parsed into its taxonomy role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchicalTag {
    /// `domain/<domain>[/<subdomain>[/<subsubdomain>...]]`
    Domain {
        domain: String,
        subdomain: Option<String>,
        subsubdomain: Option<String>,
        leaf: String,
        /// Every segment but the last, or the whole tag when it has only two segments
        full_path: String,
    },
    /// `type/<type>[/...]`
    Type { kind: String, leaf: String },
    /// `status/<status>[/...]`; only used for discovery filtering
    Status { status: String, leaf: String },
    /// Single-segment tags and tags under an unrecognized root
    Opaque { root: String, leaf: String },
}

impl HierarchicalTag {
    /// Parse a tag string.
    ///
    /// # Examples
    ///
    /// ```
    /// use notepress::domain::tags::HierarchicalTag;
    ///
    /// let tag = HierarchicalTag::parse("domain/cs/algorithms/analysis");
    /// assert_eq!(tag.leaf(), "analysis");
    /// assert_eq!(tag.full_path(), Some("domain/cs/algorithms"));
    /// ```
    pub fn parse(tag: &str) -> Self {
        let parts: Vec<&str> = tag.split('/').collect();

        if parts.len() < 2 {
            return HierarchicalTag::Opaque {
                root: tag.to_string(),
                leaf: tag.to_string(),
            };
        }

        let leaf = parts[parts.len() - 1].to_string();

        match parts[0] {
            DOMAIN_ROOT => HierarchicalTag::Domain {
                domain: parts[1].to_string(),
                subdomain: parts.get(2).map(|s| s.to_string()),
                subsubdomain: parts.get(3).map(|s| s.to_string()),
                leaf,
                full_path: if parts.len() > 2 {
                    parts[..parts.len() - 1].join("/")
                } else {
                    tag.to_string()
                },
            },
            TYPE_ROOT => HierarchicalTag::Type {
                kind: parts[1].to_string(),
                leaf,
            },
            STATUS_ROOT => HierarchicalTag::Status {
                status: parts[1].to_string(),
                leaf,
            },
            root => HierarchicalTag::Opaque {
                root: root.to_string(),
                leaf,
            },
        }
    }

    /// Final segment of the tag
    pub fn leaf(&self) -> &str {
        match self {
            HierarchicalTag::Domain { leaf, .. }
            | HierarchicalTag::Type { leaf, .. }
            | HierarchicalTag::Status { leaf, .. }
            | HierarchicalTag::Opaque { leaf, .. } => leaf,
        }
    }

    /// Lookup path for domain tags
    pub fn full_path(&self) -> Option<&str> {
        match self {
            HierarchicalTag::Domain { full_path, .. } => Some(full_path),
            _ => None,
        }
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, HierarchicalTag::Domain { .. })
    }
}
