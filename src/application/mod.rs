//! Application layer - Use cases and orchestration

pub mod dates;
pub mod discover;
pub mod init;
pub mod publish;
pub mod reconcile;

pub use dates::{CreationSource, DateResolver, PublicationSource};
pub use discover::{DiscoveryReport, DiscoveryService, SkippedNote};
pub use publish::{NoteOutcome, PlannedNote, PublishReport, PublishService};
pub use reconcile::{Reconciler, SweepReport};
