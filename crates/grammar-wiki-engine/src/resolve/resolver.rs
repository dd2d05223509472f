use crate::models::{Corpus, DocId};
use crate::resolve::name_index::NameIndex;
use relative_path::RelativePathBuf;

/// Outcome of resolving one link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(DocId),
    /// Several documents share the name; carries all of them in path order.
    Ambiguous(Vec<DocId>),
    Unresolved,
}

impl Resolution {
    pub fn resolved(&self) -> Option<DocId> {
        match self {
            Resolution::Resolved(id) => Some(*id),
            _ => None,
        }
    }
}

/// Resolves link targets against a corpus and its name index.
///
/// Order, first success wins:
/// 1. a qualified target (`a:b:name`) is walked from the corpus root;
/// 2. a bare target is looked up in the linking document's directory;
/// 3. either way, the final name segment falls back to the name index.
///
/// Step 3 also rescues qualified links whose directories are stale, as long
/// as the name is unique in the corpus.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    corpus: &'a Corpus,
    names: &'a NameIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(corpus: &'a Corpus, names: &'a NameIndex) -> Self {
        Self { corpus, names }
    }

    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }

    pub fn resolve(&self, target: &str, source: DocId) -> Resolution {
        let conventions = self.corpus.conventions();
        let separator = conventions.separator;

        let direct = if target.contains(separator) {
            self.qualified_path(target)
        } else {
            let mut path = self.corpus.get(source).dir().to_relative_path_buf();
            path.push(conventions.file_name(target));
            Some(path)
        };

        if let Some(id) = direct.and_then(|path| self.corpus.find(&path)) {
            return Resolution::Resolved(id);
        }

        let name = target.rsplit(separator).next().unwrap_or(target);
        match self.names.lookup(name) {
            [] => Resolution::Unresolved,
            [only] => Resolution::Resolved(*only),
            many => Resolution::Ambiguous(many.to_vec()),
        }
    }

    /// Literal path of a qualified target, relative to the corpus root.
    ///
    /// Empty directory segments are skipped, so a leading root anchor
    /// (`:name`) maps to `name.txt` at the root. An empty final segment
    /// (`a:`) names no file and maps to nothing.
    pub fn qualified_path(&self, target: &str) -> Option<RelativePathBuf> {
        qualified_path(self.corpus, target)
    }
}

pub(crate) fn qualified_path(corpus: &Corpus, target: &str) -> Option<RelativePathBuf> {
    let conventions = corpus.conventions();
    let mut segments: Vec<&str> = target.split(conventions.separator).collect();
    let name = segments.pop().filter(|name| !name.is_empty())?;

    let mut path = RelativePathBuf::new();
    for segment in segments.into_iter().filter(|segment| !segment.is_empty()) {
        path.push(segment);
    }
    path.push(conventions.file_name(name));
    Some(path)
}
