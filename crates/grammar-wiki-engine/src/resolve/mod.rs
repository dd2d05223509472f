//! Turning link targets into documents, and documents back into link text.

pub mod format;
pub mod name_index;
pub mod resolver;

pub use format::canonical_link;
pub use name_index::NameIndex;
pub use resolver::{Resolution, Resolver};
