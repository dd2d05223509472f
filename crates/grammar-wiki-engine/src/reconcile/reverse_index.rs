use crate::models::{Corpus, DocId};
use crate::parsing::{Link, LinkScope, parse_links};
use crate::resolve::{Resolution, Resolver};
use std::collections::{BTreeMap, BTreeSet};

/// A content link that contributes nothing to the reverse index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    pub source: DocId,
    pub link: Link,
    pub resolution: Resolution,
}

/// Target document to the set of documents linking to it.
///
/// Built from scratch every run. Several links between the same pair count
/// once.
#[derive(Debug, Default)]
pub struct ReverseIndex {
    inbound: BTreeMap<DocId, BTreeSet<DocId>>,
    dangling: Vec<DanglingLink>,
}

impl ReverseIndex {
    pub fn build(resolver: &Resolver<'_>) -> Self {
        let corpus: &Corpus = resolver.corpus();
        let mut index = Self::default();

        for (source, doc) in corpus.iter() {
            for link in parse_links(doc.content(), corpus.conventions(), LinkScope::Content) {
                match resolver.resolve(&link.target, source) {
                    Resolution::Resolved(target) => {
                        index.inbound.entry(target).or_default().insert(source);
                    }
                    resolution => index.dangling.push(DanglingLink {
                        source,
                        link,
                        resolution,
                    }),
                }
            }
        }

        log::debug!(
            "Reverse index: {} linked documents, {} dangling links",
            index.inbound.len(),
            index.dangling.len()
        );
        index
    }

    /// Documents linking to `target`; empty when nothing does.
    pub fn inbound(&self, target: DocId) -> BTreeSet<DocId> {
        self.inbound.get(&target).cloned().unwrap_or_default()
    }

    /// Links that were unresolved or ambiguous, in corpus order.
    pub fn dangling(&self) -> &[DanglingLink] {
        &self.dangling
    }
}
