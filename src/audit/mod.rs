pub mod cache;
pub mod classifier;
pub mod utils;

pub use cache::{AuditArtifact, LocalAuditCache};
pub use classifier::{classify, classify_entries, resolve_enrollment};
