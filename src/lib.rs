//! notepress - Publish a markdown vault into a static site
//!
//! Selects notes by tag, rewrites wikilinks and embeds into site links, maps
//! hierarchical tags onto site taxonomies, and reconciles the site's content
//! and media directories so they always match the current set of eligible notes.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::PublishError;
