use crate::conventions::Conventions;
use crate::io::{self, IoError};
use crate::models::document::{DocId, Document};
use relative_path::{RelativePath, RelativePathBuf};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All documents of one corpus, loaded once per run.
///
/// Uses a BTreeMap for path lookup; documents are stored sorted by path so a
/// [`DocId`] is stable for the lifetime of the corpus.
#[derive(Debug)]
pub struct Corpus {
    root: PathBuf,
    conventions: Conventions,
    documents: Vec<Document>,
    by_path: BTreeMap<RelativePathBuf, DocId>,
}

impl Corpus {
    /// Walk the corpus root and read every document.
    pub fn load(root: impl Into<PathBuf>, conventions: Conventions) -> Result<Self, IoError> {
        let root = root.into();
        let paths = io::scan_corpus_files(&root, &conventions.extension)?;

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let content = io::read_file(&path, &root)?;
            entries.push((path, content));
        }

        log::info!("Loaded {} documents from {}", entries.len(), root.display());
        Ok(Self::from_documents(root, conventions, entries))
    }

    /// Build a corpus from in-memory `(relative path, content)` pairs.
    pub fn from_documents<P, I>(root: PathBuf, conventions: Conventions, entries: I) -> Self
    where
        P: Into<RelativePathBuf>,
        I: IntoIterator<Item = (P, String)>,
    {
        let mut entries: Vec<(RelativePathBuf, String)> = entries
            .into_iter()
            .map(|(path, content)| (path.into(), content))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.dedup_by(|a, b| a.0 == b.0);

        let mut documents = Vec::with_capacity(entries.len());
        let mut by_path = BTreeMap::new();
        for (index, (path, content)) in entries.into_iter().enumerate() {
            by_path.insert(path.clone(), DocId(index));
            documents.push(Document::new(path, conventions.separator, content));
        }

        Self {
            root,
            conventions,
            documents,
            by_path,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: DocId) -> &Document {
        &self.documents[id.0]
    }

    /// All documents with their ids, in path order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.documents
            .iter()
            .enumerate()
            .map(|(index, doc)| (DocId(index), doc))
    }

    pub fn ids(&self) -> impl Iterator<Item = DocId> + use<> {
        (0..self.documents.len()).map(DocId)
    }

    /// Look up a document by its path relative to the root.
    pub fn find(&self, relative_path: &RelativePath) -> Option<DocId> {
        self.by_path.get(relative_path).copied()
    }

    /// Replace a document's text in memory and on disk.
    pub fn rewrite(&mut self, id: DocId, content: String) -> Result<(), IoError> {
        let doc = &mut self.documents[id.0];
        io::write_file(doc.relative_path(), &self.root, &content)?;
        log::info!("Rewrote {}", doc.relative_path());
        doc.set_content(content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{corpus, create_test_corpus_dir, create_test_file};

    #[test]
    fn test_documents_sorted_by_path() {
        let corpus = corpus(&[("z/last.txt", ""), ("a/first.txt", ""), ("m.txt", "")]);

        let paths: Vec<_> = corpus
            .iter()
            .map(|(_, doc)| doc.relative_path().as_str())
            .collect();
        assert_eq!(paths, vec!["a/first.txt", "m.txt", "z/last.txt"]);
    }

    #[test]
    fn test_find_by_relative_path() {
        let corpus = corpus(&[("a/x.txt", "one"), ("b/x.txt", "two")]);

        let id = corpus.find(RelativePath::new("b/x.txt")).unwrap();
        assert_eq!(corpus.get(id).content(), "two");
        assert!(corpus.find(RelativePath::new("c/x.txt")).is_none());
    }

    #[test]
    fn test_load_reads_documents_from_disk() {
        let corpus_dir = create_test_corpus_dir();
        create_test_file(&corpus_dir, "1_Source_text/source_text.txt", "[[description]]");
        create_test_file(&corpus_dir, "1_Source_text/description.txt", "text");
        create_test_file(&corpus_dir, "fix_all_links.py", "");

        let corpus = Corpus::load(corpus_dir.path(), Conventions::default()).unwrap();

        assert_eq!(corpus.len(), 2);
        let id = corpus
            .find(RelativePath::new("1_Source_text/source_text.txt"))
            .unwrap();
        assert_eq!(corpus.get(id).content(), "[[description]]");
        assert_eq!(corpus.get(id).qualified(), "1_Source_text:source_text");
    }

    #[test]
    fn test_rewrite_updates_memory_and_disk() {
        let corpus_dir = create_test_corpus_dir();
        let file = create_test_file(&corpus_dir, "entry.txt", "before");
        let mut corpus = Corpus::load(corpus_dir.path(), Conventions::default()).unwrap();
        let id = corpus.find(RelativePath::new("entry.txt")).unwrap();

        corpus.rewrite(id, "after".to_string()).unwrap();

        assert_eq!(corpus.get(id).content(), "after");
        assert_eq!(std::fs::read_to_string(file).unwrap(), "after");
    }
}
