//! Older path-based maintenance tools: literal link checks and the
//! qualify-everything normalizer.

pub mod literal;
pub mod normalize;

pub use literal::{LiteralCheck, check_literal_links, find_broken_links};
pub use normalize::{
    ElementIndex, NormalizeOutcome, NormalizeSummary, normalize_corpus, normalize_links,
};
