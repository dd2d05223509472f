use crate::models::{Corpus, DocId};
use std::collections::BTreeMap;

/// Short name to every document carrying that stem.
///
/// Every document sits in exactly one bucket, keyed by its own name. A bucket
/// with more than one entry marks an ambiguous name; resolving it is left to
/// the [`Resolver`](crate::resolve::Resolver).
#[derive(Debug, Default)]
pub struct NameIndex {
    buckets: BTreeMap<String, Vec<DocId>>,
}

impl NameIndex {
    pub fn build(corpus: &Corpus) -> Self {
        let mut buckets: BTreeMap<String, Vec<DocId>> = BTreeMap::new();
        for (id, doc) in corpus.iter() {
            buckets.entry(doc.name().to_string()).or_default().push(id);
        }
        log::debug!(
            "Name index: {} names over {} documents",
            buckets.len(),
            corpus.len()
        );
        Self { buckets }
    }

    /// Documents named `name`, in path order; empty when there are none.
    pub fn lookup(&self, name: &str) -> &[DocId] {
        self.buckets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names shared by more than one document, sorted by name.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.buckets
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(name, ids)| (name.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
