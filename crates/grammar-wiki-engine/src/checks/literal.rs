use crate::models::{Corpus, DocId};
use crate::parsing::{Link, LinkScope, parse_links};
use crate::resolve::resolver::qualified_path;

/// A link checked by literal path mapping only: `a:b:c` must be `a/b/c.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralCheck {
    pub link: Link,
    /// Path the link maps to, relative to the corpus root.
    pub expected: String,
    pub found: Option<DocId>,
}

impl LiteralCheck {
    pub fn is_broken(&self) -> bool {
        self.found.is_none()
    }
}

/// Check every link in `text`, backlinks block included, without fallbacks.
///
/// Bare names map to the corpus root, exactly as a qualified path with no
/// directories would.
pub fn check_literal_links(corpus: &Corpus, text: &str) -> Vec<LiteralCheck> {
    let conventions = corpus.conventions();
    parse_links(text, conventions, LinkScope::Everything)
        .into_iter()
        .map(|link| match qualified_path(corpus, &link.target) {
            Some(path) => LiteralCheck {
                expected: path.to_string(),
                found: corpus.find(&path),
                link,
            },
            None => LiteralCheck {
                expected: conventions
                    .file_name(&link.target.replace(conventions.separator, "/")),
                found: None,
                link,
            },
        })
        .collect()
}

/// Documents with at least one literally broken link, with just those links.
pub fn find_broken_links(corpus: &Corpus) -> Vec<(DocId, Vec<LiteralCheck>)> {
    corpus
        .iter()
        .filter_map(|(id, doc)| {
            let broken: Vec<_> = check_literal_links(corpus, doc.content())
                .into_iter()
                .filter(LiteralCheck::is_broken)
                .collect();
            (!broken.is_empty()).then_some((id, broken))
        })
        .collect()
}
