use crate::io::IoError;
use crate::models::{Corpus, DocId};
use crate::parsing::{Link, LinkScope, Span, parse_links, split_sections};
use crate::resolve::{NameIndex, Resolution, Resolver, canonical_link};

/// A problem with one content link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardIssue {
    /// No document matches; never fixed automatically.
    Unresolved { link: Link },
    /// Several documents match; needs a human to pick one.
    Ambiguous { link: Link, candidates: Vec<DocId> },
    /// Resolves, but is not spelled canonically.
    Reformat {
        link: Link,
        target: DocId,
        canonical: String,
    },
}

impl ForwardIssue {
    pub fn link(&self) -> &Link {
        match self {
            ForwardIssue::Unresolved { link }
            | ForwardIssue::Ambiguous { link, .. }
            | ForwardIssue::Reformat { link, .. } => link,
        }
    }

    pub fn is_fixable(&self) -> bool {
        matches!(self, ForwardIssue::Reformat { .. })
    }
}

/// Forward-link issues of one document, in order of occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardReport {
    pub document: DocId,
    pub issues: Vec<ForwardIssue>,
    /// Number of reformats written back in fix mode.
    pub fixed: usize,
}

impl ForwardReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &Link> {
        self.issues.iter().filter_map(|issue| match issue {
            ForwardIssue::Unresolved { link } => Some(link),
            _ => None,
        })
    }

    pub fn ambiguous(&self) -> impl Iterator<Item = (&Link, &[DocId])> {
        self.issues.iter().filter_map(|issue| match issue {
            ForwardIssue::Ambiguous { link, candidates } => Some((link, candidates.as_slice())),
            _ => None,
        })
    }

    pub fn reformatted(&self) -> impl Iterator<Item = (&Link, &str)> {
        self.issues.iter().filter_map(|issue| match issue {
            ForwardIssue::Reformat {
                link, canonical, ..
            } => Some((link, canonical.as_str())),
            _ => None,
        })
    }
}

/// Checks content links against their canonical form.
pub struct ForwardReconciler<'a> {
    resolver: Resolver<'a>,
}

impl<'a> ForwardReconciler<'a> {
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    /// Resolve every content link of `document` and classify the problems.
    pub fn check(&self, document: DocId) -> ForwardReport {
        let corpus = self.resolver.corpus();
        let doc = corpus.get(document);
        let links = parse_links(doc.content(), corpus.conventions(), LinkScope::Content);

        let issues = links
            .into_iter()
            .filter_map(|link| match self.resolver.resolve(&link.target, document) {
                Resolution::Unresolved => Some(ForwardIssue::Unresolved { link }),
                Resolution::Ambiguous(candidates) => {
                    Some(ForwardIssue::Ambiguous { link, candidates })
                }
                Resolution::Resolved(target) => {
                    let canonical =
                        canonical_link(corpus, document, target, link.label.as_deref());
                    (canonical != link.raw).then_some(ForwardIssue::Reformat {
                        link,
                        target,
                        canonical,
                    })
                }
            })
            .collect();

        ForwardReport {
            document,
            issues,
            fixed: 0,
        }
    }

    /// The document text with every reformat of `report` applied.
    ///
    /// Returns `None` when there is nothing to fix. The backlinks block is
    /// carried over unchanged.
    pub fn fixed_text(&self, report: &ForwardReport) -> Option<String> {
        let corpus = self.resolver.corpus();
        let text = corpus.get(report.document).content();
        let sections = split_sections(text, corpus.conventions());

        let replacements: Vec<(Span, &str)> = report
            .reformatted()
            .map(|(link, canonical)| (link.span, canonical))
            .collect();
        if replacements.is_empty() {
            return None;
        }

        let mut content = apply_replacements(sections.content, replacements);
        content.push_str(sections.trailer());
        Some(content)
    }
}

/// Splice replacements into `text`, last span first so earlier spans stay valid.
///
/// Spans must not overlap; link spans from one parse never do.
pub fn apply_replacements(
    text: &str,
    mut replacements: Vec<(Span, &str)>,
) -> String {
    replacements.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    debug_assert!(
        replacements
            .windows(2)
            .all(|pair| !pair[0].0.overlaps(pair[1].0)),
        "overlapping replacements"
    );

    let mut result = text.to_string();
    for (span, replacement) in replacements {
        result.replace_range(span.start..span.end, replacement);
    }
    result
}

/// Totals of one forward pass over the corpus.
#[derive(Debug, Default)]
pub struct ForwardSummary {
    pub files_scanned: usize,
    pub reports: Vec<ForwardReport>,
}

impl ForwardSummary {
    pub fn files_with_issues(&self) -> usize {
        self.reports.len()
    }

    pub fn total_issues(&self) -> usize {
        self.reports.iter().map(|r| r.issues.len()).sum()
    }

    pub fn total_fixed(&self) -> usize {
        self.reports.iter().map(|r| r.fixed).sum()
    }

    /// Issues still present after the pass (everything minus what was fixed).
    pub fn remaining(&self) -> usize {
        self.total_issues() - self.total_fixed()
    }
}

/// Check every document and, with `fix`, rewrite those with reformattable links.
///
/// Files are only written when at least one link changed; the in-memory
/// corpus is updated alongside so later passes see the fixed text.
pub fn reconcile_forward(corpus: &mut Corpus, fix: bool) -> Result<ForwardSummary, IoError> {
    let names = NameIndex::build(corpus);

    let mut pending = Vec::new();
    let mut summary = ForwardSummary {
        files_scanned: corpus.len(),
        reports: Vec::new(),
    };
    {
        let reconciler = ForwardReconciler::new(Resolver::new(corpus, &names));
        for id in corpus.ids() {
            let mut report = reconciler.check(id);
            if report.is_clean() {
                continue;
            }
            if fix && let Some(text) = reconciler.fixed_text(&report) {
                report.fixed = report.reformatted().count();
                pending.push((id, text));
            }
            summary.reports.push(report);
        }
    }

    for (id, text) in pending {
        corpus.rewrite(id, text)?;
    }

    log::info!(
        "Forward pass: {} issues in {} files, {} fixed",
        summary.total_issues(),
        summary.files_with_issues(),
        summary.total_fixed()
    );
    Ok(summary)
}
