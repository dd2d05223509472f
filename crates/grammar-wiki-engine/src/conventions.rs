use serde::{Deserialize, Serialize};

/// Textual conventions of a corpus: how files are named and how links and
/// backlinks blocks are spelled.
///
/// Every field has a default matching the Zim wiki layout of the grammar
/// corpus, so a config file only needs to name what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// File extension of documents, without the dot.
    pub extension: String,
    /// Separates directory segments in a qualified link target.
    pub separator: char,
    /// Link targets starting with this are child-page navigation links.
    pub child_sigil: char,
    /// Line that opens the machine-owned backlinks block.
    pub backlinks_header: String,
    /// Written as the block body when a document has no inbound links.
    pub empty_sentinel: String,
    /// Lowercase phrases marking a block body as intentionally empty.
    pub sentinel_phrases: Vec<String>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            separator: ':',
            child_sigil: '+',
            backlinks_header: "===== Backlinks =====".to_string(),
            empty_sentinel: "(no backlinks)".to_string(),
            sentinel_phrases: vec!["no backlinks".to_string(), "root production".to_string()],
        }
    }
}

impl Conventions {
    /// Whether a backlinks block body is marked as intentionally empty.
    pub fn is_sentinel(&self, body: &str) -> bool {
        let lowered = body.to_lowercase();
        self.sentinel_phrases
            .iter()
            .any(|phrase| lowered.contains(phrase.as_str()))
    }

    /// File name for a document with the given short name.
    pub fn file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.extension)
    }
}
