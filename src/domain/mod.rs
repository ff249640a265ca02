//! Domain layer - Pure note, tag and link transformations

pub mod dates;
pub mod filter;
pub mod links;
pub mod note;
pub mod reconcile;
pub mod slug;
pub mod tags;

pub use filter::{Eligibility, TagFilter};
pub use links::{LinkRewrite, LinkRewriter, MediaExtension, MediaRewrite};
pub use note::Note;
pub use slug::{slugify, titlecase};
