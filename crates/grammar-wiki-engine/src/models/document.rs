use relative_path::{RelativePath, RelativePathBuf};

/// Index of a document inside its [`Corpus`](crate::models::Corpus).
///
/// Ids are dense and follow the corpus ordering (sorted by relative path), so
/// ordered sets of ids iterate in path order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(pub usize);

/// One file of the corpus with its position-derived names and its text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    relative_path: RelativePathBuf,
    dir: RelativePathBuf,
    name: String,
    qualified: String,
    content: String,
}

impl Document {
    /// Create a document from its path relative to the corpus root.
    ///
    /// `separator` joins the directory segments and the short name into the
    /// qualified path (`1_Source_text:1.4_Module_items:module_item`).
    pub fn new(relative_path: RelativePathBuf, separator: char, content: String) -> Self {
        let dir = relative_path
            .parent()
            .map(RelativePath::to_relative_path_buf)
            .unwrap_or_else(RelativePathBuf::new);
        let name = Self::extract_name(&relative_path);
        let qualified = dir
            .components()
            .map(|c| c.as_str())
            .chain(std::iter::once(name.as_str()))
            .collect::<Vec<_>>()
            .join(&separator.to_string());

        Self {
            relative_path,
            dir,
            name,
            qualified,
            content,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// Directory containing the document; empty at the corpus root.
    pub fn dir(&self) -> &RelativePath {
        &self.dir
    }

    /// Short name: the file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory segments plus short name, joined by the separator.
    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    /// Qualified path usable as a link target from any directory.
    ///
    /// A document at the corpus root has no separator in its qualified path,
    /// which would read as a bare name; it gets a leading root anchor instead.
    pub fn anchored_qualified(&self, separator: char) -> String {
        if self.qualified.contains(separator) {
            self.qualified.clone()
        } else {
            format!("{separator}{}", self.qualified)
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// Whether both documents live in the same directory.
    pub fn shares_dir_with(&self, other: &Document) -> bool {
        self.dir == other.dir
    }

    fn extract_name(path: &RelativePath) -> String {
        path.file_stem().unwrap_or("Untitled").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str) -> Document {
        Document::new(RelativePathBuf::from(path), ':', String::new())
    }

    #[test]
    fn test_names_derived_from_nested_path() {
        let d = doc("1_Source_text/1.4_Module_items/module_item.txt");
        assert_eq!(d.name(), "module_item");
        assert_eq!(d.dir().as_str(), "1_Source_text/1.4_Module_items");
        assert_eq!(d.qualified(), "1_Source_text:1.4_Module_items:module_item");
        assert_eq!(
            d.anchored_qualified(':'),
            "1_Source_text:1.4_Module_items:module_item"
        );
    }

    #[test]
    fn test_root_document_gets_anchor() {
        let d = doc("source_text.txt");
        assert_eq!(d.dir().as_str(), "");
        assert_eq!(d.qualified(), "source_text");
        assert_eq!(d.anchored_qualified(':'), ":source_text");
    }

    #[test]
    fn test_dotted_stem_keeps_inner_dots() {
        let d = doc("A.1/A.1.2.txt");
        assert_eq!(d.name(), "A.1.2");
        assert_eq!(d.qualified(), "A.1:A.1.2");
    }

    #[test]
    fn test_shares_dir_with() {
        assert!(doc("a/x.txt").shares_dir_with(&doc("a/y.txt")));
        assert!(!doc("a/x.txt").shares_dir_with(&doc("b/x.txt")));
        assert!(doc("x.txt").shares_dir_with(&doc("y.txt")));
    }
}
