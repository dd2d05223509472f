use crate::conventions::Conventions;
use crate::models::Corpus;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary corpus root
pub fn create_test_corpus_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test document (and its parent directories) with content
pub fn create_test_file(corpus_dir: &TempDir, relative: &str, content: &str) -> PathBuf {
    let file_path = corpus_dir.path().join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Build an in-memory corpus rooted at a placeholder path
pub fn corpus(files: &[(&str, &str)]) -> Corpus {
    Corpus::from_documents(
        PathBuf::from("/corpus"),
        Conventions::default(),
        files
            .iter()
            .map(|(path, content)| (path.to_string(), content.to_string())),
    )
}
