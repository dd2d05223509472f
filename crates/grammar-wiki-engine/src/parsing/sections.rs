use crate::conventions::Conventions;

/// A document's text split at the backlinks header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<'a> {
    /// Everything before the backlinks header; the only place content links live.
    pub content: &'a str,
    pub backlinks: Option<BacklinksBlock<'a>>,
}

/// The machine-owned trailing block, from its header line to end of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacklinksBlock<'a> {
    /// Byte offset of the header line in the full text.
    pub start: usize,
    /// Header line and body, verbatim.
    pub raw: &'a str,
    /// Text after the header line.
    pub body: &'a str,
    /// Byte offset of `body` in the full text.
    pub body_start: usize,
}

impl<'a> Sections<'a> {
    /// The backlinks block verbatim, or an empty string when there is none.
    pub fn trailer(&self) -> &'a str {
        self.backlinks.map(|block| block.raw).unwrap_or("")
    }
}

/// Split text at the first line consisting of the backlinks header.
pub fn split_sections<'a>(text: &'a str, conventions: &Conventions) -> Sections<'a> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end() == conventions.backlinks_header {
            let body_start = offset + line.len();
            return Sections {
                content: &text[..offset],
                backlinks: Some(BacklinksBlock {
                    start: offset,
                    raw: &text[offset..],
                    body: &text[body_start..],
                    body_start,
                }),
            };
        }
        offset += line.len();
    }

    Sections {
        content: text,
        backlinks: None,
    }
}

/// Rebuild a document with a new backlinks block body.
///
/// Text before the header is kept byte-for-byte. Documents without a block
/// are returned unchanged.
pub fn replace_backlinks_body(text: &str, conventions: &Conventions, body: &str) -> String {
    match split_sections(text, conventions).backlinks {
        Some(block) => format!(
            "{}{}\n{}",
            &text[..block.start],
            conventions.backlinks_header,
            body
        ),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_without_block() {
        let conventions = Conventions::default();
        let sections = split_sections("a ::= [[b]]\n", &conventions);
        assert_eq!(sections.content, "a ::= [[b]]\n");
        assert!(sections.backlinks.is_none());
        assert_eq!(sections.trailer(), "");
    }

    #[test]
    fn test_split_at_header_line() {
        let conventions = Conventions::default();
        let text = "a ::= [[b]]\n\n===== Backlinks =====\n[[c]]\n";
        let sections = split_sections(text, &conventions);

        assert_eq!(sections.content, "a ::= [[b]]\n\n");
        let block = sections.backlinks.unwrap();
        assert_eq!(block.raw, "===== Backlinks =====\n[[c]]\n");
        assert_eq!(block.body, "[[c]]\n");
        assert_eq!(&text[block.body_start..], "[[c]]\n");
        assert_eq!(format!("{}{}", sections.content, sections.trailer()), text);
    }

    #[test]
    fn test_header_with_crlf_and_no_body() {
        let conventions = Conventions::default();
        let sections = split_sections("x\r\n===== Backlinks =====\r\n", &conventions);
        let block = sections.backlinks.unwrap();
        assert_eq!(block.body, "");
        assert_eq!(sections.content, "x\r\n");
    }

    #[test]
    fn test_header_mentioned_inline_is_not_a_block() {
        let conventions = Conventions::default();
        let text = "see the ===== Backlinks ===== section\n";
        assert!(split_sections(text, &conventions).backlinks.is_none());
    }

    #[test]
    fn test_replace_body_preserves_prefix() {
        let conventions = Conventions::default();
        let text = "keep  this\n===== Backlinks =====\n(no backlinks)\n";
        let replaced = replace_backlinks_body(text, &conventions, "[[a]]\n[[b]]\n");
        assert_eq!(replaced, "keep  this\n===== Backlinks =====\n[[a]]\n[[b]]\n");
    }
}
