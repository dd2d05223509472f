use crate::io::IoError;
use crate::models::{Corpus, DocId};
use crate::parsing::sections::replace_backlinks_body;
use crate::parsing::{LinkScope, parse_links, split_sections};
use crate::reconcile::reverse_index::{DanglingLink, ReverseIndex};
use crate::resolve::{NameIndex, Resolver, canonical_link};
use std::collections::BTreeSet;

/// Drift between a document's backlinks block and its true inbound set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklinkReport {
    pub document: DocId,
    /// Linking documents the block does not list.
    pub missing: BTreeSet<DocId>,
    /// Listed documents that no longer link here.
    pub extra: BTreeSet<DocId>,
    /// The block claims to be intentionally empty but inbound links exist.
    pub sentinel_conflict: bool,
    /// The inbound set the block should list.
    pub expected: BTreeSet<DocId>,
    pub fixed: bool,
}

impl BacklinkReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && !self.sentinel_conflict
    }
}

/// Compares backlinks blocks with the reverse index and renders replacements.
pub struct BacklinkReconciler<'a> {
    resolver: Resolver<'a>,
}

impl<'a> BacklinkReconciler<'a> {
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    /// Compare the block of `document` with `expected`.
    ///
    /// Returns `None` for documents without a backlinks block: those are not
    /// tracked. Block links that do not resolve to exactly one document are
    /// ignored, since a stale entry may point at a moved file.
    pub fn check(&self, document: DocId, expected: &BTreeSet<DocId>) -> Option<BacklinkReport> {
        let corpus = self.resolver.corpus();
        let conventions = corpus.conventions();
        let block = split_sections(corpus.get(document).content(), conventions).backlinks?;

        let current: BTreeSet<DocId> = parse_links(block.body, conventions, LinkScope::Everything)
            .iter()
            .filter_map(|link| self.resolver.resolve(&link.target, document).resolved())
            .collect();

        Some(BacklinkReport {
            document,
            missing: expected.difference(&current).copied().collect(),
            extra: current.difference(expected).copied().collect(),
            sentinel_conflict: conventions.is_sentinel(block.body) && !expected.is_empty(),
            expected: expected.clone(),
            fixed: false,
        })
    }

    /// Block body listing `expected`, one canonical link per line.
    ///
    /// Sorted by short name, then qualified path; the sentinel when empty.
    pub fn render_body(&self, document: DocId, expected: &BTreeSet<DocId>) -> String {
        let corpus = self.resolver.corpus();
        if expected.is_empty() {
            return format!("{}\n", corpus.conventions().empty_sentinel);
        }

        let mut sources: Vec<DocId> = expected.iter().copied().collect();
        sources.sort_by(|a, b| {
            let (a, b) = (corpus.get(*a), corpus.get(*b));
            a.name()
                .cmp(b.name())
                .then_with(|| a.qualified().cmp(b.qualified()))
        });

        let mut body = sources
            .into_iter()
            .map(|source| canonical_link(corpus, document, source, None))
            .collect::<Vec<_>>()
            .join("\n");
        body.push('\n');
        body
    }

    /// Full document text with the block body replaced by the expected set.
    pub fn fixed_text(&self, report: &BacklinkReport) -> String {
        let corpus = self.resolver.corpus();
        let body = self.render_body(report.document, &report.expected);
        replace_backlinks_body(
            corpus.get(report.document).content(),
            corpus.conventions(),
            &body,
        )
    }
}

/// Totals of one backlink pass over the corpus.
#[derive(Debug, Default)]
pub struct BacklinkSummary {
    pub files_scanned: usize,
    /// Documents carrying a backlinks block.
    pub tracked: usize,
    /// Reports for blocks that drifted.
    pub reports: Vec<BacklinkReport>,
    /// Content links left out of the reverse index.
    pub dangling: Vec<DanglingLink>,
}

impl BacklinkSummary {
    pub fn remaining(&self) -> usize {
        self.reports.iter().filter(|r| !r.fixed).count()
    }
}

/// Rebuild the reverse index and bring every backlinks block in line with it.
///
/// With `fix`, drifted blocks are rewritten wholesale; everything before the
/// header stays byte-for-byte.
pub fn reconcile_backlinks(corpus: &mut Corpus, fix: bool) -> Result<BacklinkSummary, IoError> {
    let names = NameIndex::build(corpus);

    let mut pending = Vec::new();
    let mut summary = BacklinkSummary {
        files_scanned: corpus.len(),
        ..BacklinkSummary::default()
    };
    {
        let resolver = Resolver::new(corpus, &names);
        let index = ReverseIndex::build(&resolver);
        let reconciler = BacklinkReconciler::new(resolver);

        for id in corpus.ids() {
            let Some(mut report) = reconciler.check(id, &index.inbound(id)) else {
                continue;
            };
            summary.tracked += 1;
            if report.is_clean() {
                continue;
            }
            if fix {
                pending.push((id, reconciler.fixed_text(&report)));
                report.fixed = true;
            }
            summary.reports.push(report);
        }
        summary.dangling = index.dangling().to_vec();
    }

    for (id, text) in pending {
        corpus.rewrite(id, text)?;
    }

    log::info!(
        "Backlink pass: {} of {} tracked documents drifted, {} fixed",
        summary.reports.len(),
        summary.tracked,
        summary.reports.len() - summary.remaining()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::corpus;
    use pretty_assertions::assert_eq;
    use relative_path::RelativePath;

    fn id(corpus: &Corpus, path: &str) -> DocId {
        corpus.find(RelativePath::new(path)).unwrap()
    }

    fn check(corpus: &Corpus, path: &str) -> Option<BacklinkReport> {
        let names = NameIndex::build(corpus);
        let resolver = Resolver::new(corpus, &names);
        let index = ReverseIndex::build(&resolver);
        let target = id(corpus, path);
        BacklinkReconciler::new(resolver).check(target, &index.inbound(target))
    }

    #[test]
    fn test_documents_without_block_are_untracked() {
        let c = corpus(&[("a.txt", "[[b]]"), ("b.txt", "no block here")]);
        assert!(check(&c, "b.txt").is_none());
    }

    #[test]
    fn test_missing_and_extra() {
        let c = corpus(&[
            ("a.txt", "[[target]]"),
            ("b.txt", "nothing"),
            ("x/dup.txt", ""),
            ("y/dup.txt", ""),
            (
                "target.txt",
                "body\n===== Backlinks =====\n[[b]]\n[[gone:away]]\n[[dup]]\n",
            ),
        ]);
        let report = check(&c, "target.txt").unwrap();

        assert_eq!(report.missing, BTreeSet::from([id(&c, "a.txt")]));
        assert_eq!(report.extra, BTreeSet::from([id(&c, "b.txt")]));
        assert!(!report.sentinel_conflict);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_matching_block_is_clean() {
        let c = corpus(&[
            ("x/a.txt", "[[y:target]]"),
            ("y/target.txt", "body\n===== Backlinks =====\n[[x:a|a]]\n"),
        ]);
        assert!(check(&c, "y/target.txt").unwrap().is_clean());
    }

    #[test]
    fn test_sentinel_with_inbound_links_is_flagged() {
        let c = corpus(&[
            ("a.txt", "[[root]]"),
            ("root.txt", "body\n===== Backlinks =====\n(no backlinks)\n"),
        ]);
        let report = check(&c, "root.txt").unwrap();
        assert!(report.sentinel_conflict);
        assert_eq!(report.missing, BTreeSet::from([id(&c, "a.txt")]));
    }

    #[test]
    fn test_sentinel_without_inbound_links_is_clean() {
        let c = corpus(&[(
            "root.txt",
            "source_text ::= ...\n===== Backlinks =====\nRoot production - no backlinks\n",
        )]);
        assert!(check(&c, "root.txt").unwrap().is_clean());
    }

    #[test]
    fn test_render_body_sorted_by_short_name() {
        let c = corpus(&[
            ("b/zeta.txt", "[[t:target]]"),
            ("t/alpha.txt", "[[target]]"),
            ("a/mid.txt", "[[t:target]]"),
            ("t/target.txt", ""),
        ]);
        let names = NameIndex::build(&c);
        let resolver = Resolver::new(&c, &names);
        let index = ReverseIndex::build(&resolver);
        let target = id(&c, "t/target.txt");

        let body = BacklinkReconciler::new(resolver).render_body(target, &index.inbound(target));
        assert_eq!(body, "[[alpha]]\n[[a:mid|mid]]\n[[b:zeta|zeta]]\n");
    }

    #[test]
    fn test_render_body_empty_uses_sentinel() {
        let c = corpus(&[("t.txt", "")]);
        let names = NameIndex::build(&c);
        let body = BacklinkReconciler::new(Resolver::new(&c, &names))
            .render_body(id(&c, "t.txt"), &BTreeSet::new());
        assert_eq!(body, "(no backlinks)\n");
    }
}
