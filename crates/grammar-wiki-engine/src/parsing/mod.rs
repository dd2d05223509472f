//! Text-level parsing of corpus documents: link occurrences and the trailing
//! backlinks block.

pub mod links;
pub mod sections;
pub mod span;

pub use links::{Link, LinkScope, parse_links};
pub use sections::{BacklinksBlock, Sections, split_sections};
pub use span::Span;
