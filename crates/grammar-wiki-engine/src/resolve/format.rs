use crate::models::{Corpus, DocId};

/// The one correct spelling of a link from `source` to `target`.
///
/// Same directory: `[[name]]`, or `[[name|label]]` for a label that differs
/// from the name. Other directory: `[[qualified:path|label]]`, labelled with
/// the short name when no distinct label is given. Depends only on the two
/// positions and the label, never on document text.
pub fn canonical_link(
    corpus: &Corpus,
    source: DocId,
    target: DocId,
    label: Option<&str>,
) -> String {
    let source_doc = corpus.get(source);
    let target_doc = corpus.get(target);
    let name = target_doc.name();
    let custom_label = label.filter(|label| *label != name);

    if source_doc.shares_dir_with(target_doc) {
        match custom_label {
            Some(label) => format!("[[{name}|{label}]]"),
            None => format!("[[{name}]]"),
        }
    } else {
        let path = target_doc.anchored_qualified(corpus.conventions().separator);
        format!("[[{path}|{}]]", custom_label.unwrap_or(name))
    }
}
