//! Hierarchical tag system

pub mod parser;
pub mod taxonomy;

// Re-export main types
pub use parser::{HierarchicalTag, DOMAIN_ROOT, STATUS_ROOT, TYPE_ROOT};
pub use taxonomy::{CategoryMapping, TagConverter, Taxonomies, TaxonomyRules};
