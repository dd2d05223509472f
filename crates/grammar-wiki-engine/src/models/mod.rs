pub mod corpus;
pub mod document;

pub use corpus::Corpus;
pub use document::{DocId, Document};
