use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid corpus directory: {0}")]
    InvalidCorpusDir(String),
    #[error("Path {0} is outside the corpus root")]
    OutsideCorpus(PathBuf),
}

impl IoError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> IoError + '_ {
        move |source| IoError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a corpus document and return its content
pub fn read_file(relative_path: &RelativePath, corpus_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(corpus_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::io(&absolute_path))
}

/// Write content back to a corpus document.
///
/// Documents are rewritten whole; there is no temp-file-and-rename step.
pub fn write_file(
    relative_path: &RelativePath,
    corpus_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(corpus_root);
    log::debug!("Writing {}", absolute_path.display());
    fs::write(&absolute_path, content).map_err(IoError::io(&absolute_path))
}

/// Scan for documents with the given extension under the corpus root.
///
/// Returned paths are relative to the root and sorted.
pub fn scan_corpus_files(
    corpus_root: &Path,
    extension: &str,
) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_corpus_dir(corpus_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(corpus_root, extension, &mut files)?;

    let mut relative = files
        .iter()
        .map(|path| to_corpus_relative(path, corpus_root))
        .collect::<Result<Vec<_>, _>>()?;
    relative.sort();
    log::debug!(
        "Found {} .{extension} files under {}",
        relative.len(),
        corpus_root.display()
    );
    Ok(relative)
}

/// Express a file system path relative to the corpus root.
pub fn to_corpus_relative(path: &Path, corpus_root: &Path) -> Result<RelativePathBuf, IoError> {
    let stripped = path
        .strip_prefix(corpus_root)
        .map_err(|_| IoError::OutsideCorpus(path.to_path_buf()))?;
    RelativePathBuf::from_path(stripped).map_err(|_| IoError::OutsideCorpus(path.to_path_buf()))
}

fn scan_directory_recursive(
    dir: &Path,
    extension: &str,
    files: &mut Vec<PathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::io(dir))?;

    for entry in entries {
        let entry = entry.map_err(IoError::io(dir))?;
        let path = entry.path();
        // Symlinks are not followed
        let file_type = entry.file_type().map_err(IoError::io(&path))?;

        if file_type.is_dir() {
            scan_directory_recursive(&path, extension, files)?;
        } else if let Some(ext) = path.extension()
            && ext == extension
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_corpus_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidCorpusDir(format!(
            "{} does not exist or is not a directory",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_corpus_dir, create_test_file};

    #[test]
    fn test_scan_finds_nested_documents_sorted() {
        let corpus_dir = create_test_corpus_dir();
        create_test_file(&corpus_dir, "b/second.txt", "second");
        create_test_file(&corpus_dir, "a/deeper/first.txt", "first");
        create_test_file(&corpus_dir, "root.txt", "root");

        let files = scan_corpus_files(corpus_dir.path(), "txt").unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.as_str()).collect();
        assert_eq!(paths, vec!["a/deeper/first.txt", "b/second.txt", "root.txt"]);
    }

    #[test]
    fn test_scan_ignores_other_extensions() {
        let corpus_dir = create_test_corpus_dir();
        create_test_file(&corpus_dir, "production.txt", "x ::= y");
        create_test_file(&corpus_dir, "verify_backlinks.py", "print()");
        create_test_file(&corpus_dir, "notes.md", "# notes");

        let files = scan_corpus_files(corpus_dir.path(), "txt").unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].as_str(), "production.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_does_not_follow_symlinked_directories() {
        let corpus_dir = create_test_corpus_dir();
        create_test_file(&corpus_dir, "sub/inner.txt", "");
        let link = corpus_dir.path().join("sub/loop");
        std::os::unix::fs::symlink(corpus_dir.path(), link).unwrap();

        let files = scan_corpus_files(corpus_dir.path(), "txt").unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.as_str()).collect();
        assert_eq!(paths, vec!["sub/inner.txt"]);
    }

    #[test]
    fn test_scan_rejects_missing_root() {
        let result = scan_corpus_files(Path::new("/this/path/does/not/exist"), "txt");
        assert!(matches!(result, Err(IoError::InvalidCorpusDir(_))));
    }

    #[test]
    fn test_validate_corpus_dir_rejects_file() {
        let corpus_dir = create_test_corpus_dir();
        let file = create_test_file(&corpus_dir, "plain.txt", "");
        assert!(validate_corpus_dir(&file).is_err());
        assert!(validate_corpus_dir(corpus_dir.path()).is_ok());
    }

    #[test]
    fn test_read_file_not_found() {
        let corpus_dir = create_test_corpus_dir();
        let result = read_file(RelativePath::new("missing.txt"), corpus_dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let corpus_dir = create_test_corpus_dir();
        create_test_file(&corpus_dir, "dir/entry.txt", "old");
        let relative_path = RelativePath::new("dir/entry.txt");

        write_file(relative_path, corpus_dir.path(), "new [[link]]").unwrap();

        let content = read_file(relative_path, corpus_dir.path()).unwrap();
        assert_eq!(content, "new [[link]]");
    }

    #[test]
    fn test_to_corpus_relative_rejects_outside_path() {
        let corpus_dir = create_test_corpus_dir();
        let result = to_corpus_relative(Path::new("/elsewhere/file.txt"), corpus_dir.path());
        assert!(matches!(result, Err(IoError::OutsideCorpus(_))));
    }
}
