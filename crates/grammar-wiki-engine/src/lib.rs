pub mod checks;
pub mod conventions;
pub mod io;
pub mod models;
pub mod parsing;
pub mod reconcile;
pub mod resolve;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use conventions::Conventions;
pub use io::IoError;
pub use models::{Corpus, DocId, Document};
pub use reconcile::{BacklinkSummary, ForwardSummary, reconcile_backlinks, reconcile_forward};
pub use resolve::{NameIndex, Resolution, Resolver, canonical_link};
