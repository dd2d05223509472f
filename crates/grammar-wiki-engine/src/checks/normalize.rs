use crate::io::IoError;
use crate::models::{Corpus, DocId};
use crate::parsing::{Link, LinkScope, Span, parse_links, split_sections};
use crate::reconcile::apply_replacements;
use crate::resolve::resolver::qualified_path;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Unique(DocId),
    Ambiguous,
}

/// Element name to the document describing it.
///
/// Names come from the production a file defines (`name ::= ...`) and, with
/// lower precedence, from file stems with spaces turned into underscores. A
/// name claimed twice at the same precedence is ambiguous and never used.
#[derive(Debug, Default)]
pub struct ElementIndex {
    elements: BTreeMap<String, Element>,
}

fn production_regex() -> &'static Regex {
    static PRODUCTION_REGEX: OnceLock<Regex> = OnceLock::new();
    PRODUCTION_REGEX.get_or_init(|| {
        Regex::new(r"(?m)^([a-z0-9_]+)\s*::=").expect("Invalid production regex")
    })
}

fn claim(map: &mut BTreeMap<String, Element>, name: String, id: DocId) {
    map.entry(name)
        .and_modify(|element| {
            if *element != Element::Unique(id) {
                *element = Element::Ambiguous;
            }
        })
        .or_insert(Element::Unique(id));
}

impl ElementIndex {
    pub fn build(corpus: &Corpus) -> Self {
        let mut stems = BTreeMap::new();
        let mut productions = BTreeMap::new();

        for (id, doc) in corpus.iter() {
            claim(&mut stems, doc.name().replace(' ', "_"), id);
            if let Some(caps) = production_regex().captures(doc.content()) {
                claim(&mut productions, caps[1].to_string(), id);
            }
        }

        let mut elements = stems;
        elements.extend(productions);
        log::debug!("Element index: {} names", elements.len());
        Self { elements }
    }

    /// The single document for `name`, if there is exactly one.
    pub fn lookup(&self, name: &str) -> Option<DocId> {
        match self.elements.get(name) {
            Some(Element::Unique(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Result of normalizing one document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOutcome {
    pub text: String,
    pub rewritten: usize,
    /// Links left as they were because no unique element matched.
    pub unmatched: Vec<Link>,
}

/// Rewrite every content link to `[[fully:qualified:path|label]]`.
///
/// Qualified links whose literal path exists are kept as written. Others are
/// looked up by their final segment; the label is the explicit one, or the
/// element name. The backlinks block is left alone.
pub fn normalize_links(corpus: &Corpus, index: &ElementIndex, text: &str) -> NormalizeOutcome {
    let conventions = corpus.conventions();
    let separator = conventions.separator;
    let sections = split_sections(text, conventions);

    let mut replacements: Vec<(Span, String)> = Vec::new();
    let mut unmatched = Vec::new();
    for link in parse_links(text, conventions, LinkScope::Content) {
        if link.is_qualified(separator)
            && qualified_path(corpus, &link.target).is_some_and(|path| corpus.find(&path).is_some())
        {
            continue;
        }

        let element = link.target_name(separator);
        match index.lookup(element) {
            Some(target) => {
                let path = corpus.get(target).anchored_qualified(separator);
                let label = link.label.as_deref().unwrap_or(element);
                let replacement = format!("[[{path}|{label}]]");
                if replacement != link.raw {
                    replacements.push((link.span, replacement));
                }
            }
            None => unmatched.push(link),
        }
    }

    let rewritten = replacements.len();
    let mut normalized = apply_replacements(
        sections.content,
        replacements
            .iter()
            .map(|(span, replacement)| (*span, replacement.as_str()))
            .collect(),
    );
    normalized.push_str(sections.trailer());

    NormalizeOutcome {
        text: normalized,
        rewritten,
        unmatched,
    }
}

/// Per-document results of a corpus-wide normalization.
#[derive(Debug, Default)]
pub struct NormalizeSummary {
    pub elements: usize,
    /// `(document, links rewritten, links left unmatched)` for every document
    /// that had anything to report.
    pub files: Vec<(DocId, usize, Vec<Link>)>,
}

impl NormalizeSummary {
    pub fn files_fixed(&self) -> usize {
        self.files.iter().filter(|(_, rewritten, _)| *rewritten > 0).count()
    }
}

/// Normalize every document and write back the ones that changed.
pub fn normalize_corpus(corpus: &mut Corpus) -> Result<NormalizeSummary, IoError> {
    let index = ElementIndex::build(corpus);
    let mut summary = NormalizeSummary {
        elements: index.len(),
        ..NormalizeSummary::default()
    };

    let mut pending = Vec::new();
    for (id, doc) in corpus.iter() {
        let outcome = normalize_links(corpus, &index, doc.content());
        if outcome.rewritten == 0 && outcome.unmatched.is_empty() {
            continue;
        }
        if outcome.rewritten > 0 {
            pending.push((id, outcome.text));
        }
        summary.files.push((id, outcome.rewritten, outcome.unmatched));
    }

    for (id, text) in pending {
        corpus.rewrite(id, text)?;
    }
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

    #[test]
    fn test_production_name_beats_file_stem() {
        let c = corpus(&[
            ("a/Module item.txt", "module_item ::= x"),
            ("b/module_item.txt", "notes only"),
        ]);
        let index = ElementIndex::build(&c);

        assert_eq!(index.lookup("module_item"), Some(id(&c, "a/Module item.txt")));
        assert_eq!(index.lookup("Module_item"), Some(id(&c, "a/Module item.txt")));
    }

    #[test]
    fn test_shared_stem_is_ambiguous() {
        let c = corpus(&[("a/dup.txt", ""), ("b/dup.txt", "")]);
        assert_eq!(ElementIndex::build(&c).lookup("dup"), None);
    }

    #[test]
    fn test_only_first_production_counts() {
        let c = corpus(&[("a/first.txt", "first ::= second\nsecond ::= x\n")]);
        let index = ElementIndex::build(&c);
        assert_eq!(index.lookup("first"), Some(id(&c, "a/first.txt")));
        assert_eq!(index.lookup("second"), None);
    }

    #[test]
    fn test_normalize_qualifies_links() {
        let c = corpus(&[
            ("1_Source/source_text.txt", "source_text ::= { description }"),
            ("1_Source/description.txt", "description ::= module_item"),
            ("2_Items/module_item.txt", "module_item ::= x"),
            ("top.txt", "top ::= y"),
        ]);
        let index = ElementIndex::build(&c);
        let text = "source_text ::= [[description]] [[old:path:module_item|item]] \
                    [[2_Items:module_item]] [[top]] [[unknown]]\n\
                    ===== Backlinks =====\n[[description]]\n";

        let outcome = normalize_links(&c, &index, text);

        assert_eq!(
            outcome.text,
            "source_text ::= [[1_Source:description|description]] [[2_Items:module_item|item]] \
             [[2_Items:module_item]] [[:top|top]] [[unknown]]\n\
             ===== Backlinks =====\n[[description]]\n"
        );
        assert_eq!(outcome.rewritten, 3);
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].target, "unknown");
    }

    #[test]
    fn test_normalize_is_stable() {
        let c = corpus(&[("a/x.txt", "x ::= y"), ("b/src.txt", "")]);
        let index = ElementIndex::build(&c);

        let once = normalize_links(&c, &index, "[[x]]");
        let twice = normalize_links(&c, &index, &once.text);

        assert_eq!(once.text, "[[a:x|x]]");
        assert_eq!(twice.text, once.text);
        assert_eq!(twice.rewritten, 0);
    }
}
