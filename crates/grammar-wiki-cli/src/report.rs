use grammar_wiki_engine::checks::{LiteralCheck, NormalizeSummary};
use grammar_wiki_engine::reconcile::ForwardIssue;
use grammar_wiki_engine::{BacklinkSummary, Corpus, DocId, ForwardSummary, NameIndex, Resolution};
use std::io::{self, Write};

const MAX_DUPLICATES_SHOWN: usize = 5;
const MAX_CANDIDATES_SHOWN: usize = 3;
const MAX_DANGLING_SHOWN: usize = 10;

fn path(corpus: &Corpus, id: DocId) -> &str {
    corpus.get(id).relative_path().as_str()
}

fn paths(corpus: &Corpus, ids: &[DocId], limit: usize) -> String {
    let mut listed = ids
        .iter()
        .take(limit)
        .map(|id| path(corpus, *id))
        .collect::<Vec<_>>()
        .join(", ");
    if ids.len() > limit {
        listed.push_str(&format!(" (+{} more)", ids.len() - limit));
    }
    listed
}

pub fn literal_checks(out: &mut impl Write, file: &str, checks: &[LiteralCheck]) -> io::Result<()> {
    writeln!(out, "Checking links in {file}")?;
    for check in checks {
        if check.is_broken() {
            writeln!(out, "  [BROKEN] {}", check.link.raw)?;
            writeln!(out, "      Expected: {}", check.expected)?;
        } else {
            writeln!(out, "  [OK] {}", check.link.raw)?;
        }
    }
    let broken = checks.iter().filter(|check| check.is_broken()).count();
    writeln!(out, "{} links, {broken} broken", checks.len())
}

pub fn broken_links(
    out: &mut impl Write,
    corpus: &Corpus,
    broken: &[(DocId, Vec<LiteralCheck>)],
) -> io::Result<()> {
    for (document, checks) in broken {
        writeln!(out, "{}", path(corpus, *document))?;
        for check in checks {
            writeln!(out, "  {} -> expected {}", check.link.raw, check.expected)?;
        }
    }
    writeln!(out, "Files with broken links: {}", broken.len())
}

pub fn normalize(out: &mut impl Write, corpus: &Corpus, summary: &NormalizeSummary) -> io::Result<()> {
    writeln!(out, "Element index: {} names", summary.elements)?;
    for (document, rewritten, unmatched) in &summary.files {
        if *rewritten > 0 {
            writeln!(out, "Fixed: {} ({rewritten} links)", path(corpus, *document))?;
        }
        if !unmatched.is_empty() {
            let raw: Vec<&str> = unmatched.iter().map(|link| link.raw.as_str()).collect();
            writeln!(out, "Not fixed: {}: {}", path(corpus, *document), raw.join(", "))?;
        }
    }
    writeln!(out, "Files fixed: {}", summary.files_fixed())
}

pub fn forward(
    out: &mut impl Write,
    corpus: &Corpus,
    names: &NameIndex,
    summary: &ForwardSummary,
    fix: bool,
) -> io::Result<()> {
    writeln!(out, "Scanning {} files...", summary.files_scanned)?;

    let duplicates: Vec<(&str, &[DocId])> = names.duplicates().collect();
    if !duplicates.is_empty() {
        writeln!(
            out,
            "Note: {} short names are shared by several files",
            duplicates.len()
        )?;
        for (name, ids) in duplicates.iter().take(MAX_DUPLICATES_SHOWN) {
            writeln!(out, "  {name}: {}", paths(corpus, ids, usize::MAX))?;
        }
        if duplicates.len() > MAX_DUPLICATES_SHOWN {
            writeln!(out, "  ... and {} more", duplicates.len() - MAX_DUPLICATES_SHOWN)?;
        }
    }

    let mut reformattable = 0;
    for report in &summary.reports {
        writeln!(out)?;
        writeln!(out, "{}", path(corpus, report.document))?;
        for issue in &report.issues {
            let raw = &issue.link().raw;
            match issue {
                ForwardIssue::Unresolved { .. } => {
                    writeln!(out, "  ERROR: {raw} does not resolve")?;
                }
                ForwardIssue::Ambiguous { candidates, .. } => {
                    writeln!(
                        out,
                        "  WARNING: {raw} is ambiguous: {}",
                        paths(corpus, candidates, MAX_CANDIDATES_SHOWN)
                    )?;
                }
                ForwardIssue::Reformat { canonical, .. } => {
                    writeln!(out, "  FIX: {raw} -> {canonical}")?;
                }
            }
        }
        reformattable += report.issues.iter().filter(|i| i.is_fixable()).count();
        if report.fixed > 0 {
            writeln!(out, "  -> Fixed {} links", report.fixed)?;
        }
    }

    let unresolved: usize = summary.reports.iter().map(|r| r.unresolved().count()).sum();
    let ambiguous: usize = summary.reports.iter().map(|r| r.ambiguous().count()).sum();
    writeln!(out)?;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "  Files scanned: {}", summary.files_scanned)?;
    writeln!(out, "  Files with issues: {}", summary.files_with_issues())?;
    writeln!(out, "  Unresolved: {unresolved}")?;
    writeln!(out, "  Ambiguous: {ambiguous}")?;
    writeln!(out, "  Reformattable: {reformattable}")?;
    writeln!(out, "  Fixed: {}", summary.total_fixed())?;
    if !fix && reformattable > 0 {
        writeln!(out, "Run with --fix to rewrite reformattable links.")?;
    }
    Ok(())
}

pub fn backlinks(
    out: &mut impl Write,
    corpus: &Corpus,
    summary: &BacklinkSummary,
    fix: bool,
) -> io::Result<()> {
    writeln!(out, "Checking backlinks across {} files...", summary.files_scanned)?;

    if !summary.dangling.is_empty() {
        writeln!(
            out,
            "WARNING: {} content links left out of backlinks",
            summary.dangling.len()
        )?;
        for dangling in summary.dangling.iter().take(MAX_DANGLING_SHOWN) {
            let reason = match &dangling.resolution {
                Resolution::Ambiguous(candidates) => {
                    format!("ambiguous between {} files", candidates.len())
                }
                _ => "unresolved".to_string(),
            };
            writeln!(
                out,
                "  {}: {} ({reason})",
                path(corpus, dangling.source),
                dangling.link.raw
            )?;
        }
        if summary.dangling.len() > MAX_DANGLING_SHOWN {
            writeln!(out, "  ... and {} more", summary.dangling.len() - MAX_DANGLING_SHOWN)?;
        }
    }

    for report in &summary.reports {
        writeln!(out)?;
        writeln!(out, "{}", path(corpus, report.document))?;
        if report.sentinel_conflict {
            writeln!(
                out,
                "  Marked as having no backlinks, but {} files link here",
                report.expected.len()
            )?;
        }
        if !report.missing.is_empty() {
            writeln!(out, "  Missing ({}):", report.missing.len())?;
            for id in &report.missing {
                writeln!(out, "    + {}", path(corpus, *id))?;
            }
        }
        if !report.extra.is_empty() {
            writeln!(out, "  Extra ({}):", report.extra.len())?;
            for id in &report.extra {
                writeln!(out, "    - {}", path(corpus, *id))?;
            }
        }
        if report.fixed {
            writeln!(out, "  -> FIXED")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "  Files with backlinks blocks: {}", summary.tracked)?;
    writeln!(out, "  Out of date: {}", summary.reports.len())?;
    writeln!(
        out,
        "  Fixed: {}",
        summary.reports.len() - summary.remaining()
    )?;
    if !fix && !summary.reports.is_empty() {
        writeln!(out, "Run with --fix to rewrite out-of-date blocks.")?;
    }
    Ok(())
}
