use crate::conventions::Conventions;
use crate::parsing::sections::split_sections;
use crate::parsing::span::Span;
use regex::Regex;
use std::sync::OnceLock;

/// One `[[target]]` or `[[target|label]]` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Span of the whole link, brackets included.
    pub span: Span,
    /// The link exactly as written.
    pub raw: String,
    /// Qualified (`a:b:name`) or bare (`name`) target expression.
    pub target: String,
    /// Display label after `|`, if any.
    pub label: Option<String>,
}

impl Link {
    /// Final segment of the target: the short name it refers to.
    pub fn target_name(&self, separator: char) -> &str {
        self.target
            .rsplit(separator)
            .next()
            .unwrap_or(&self.target)
    }

    pub fn is_qualified(&self, separator: char) -> bool {
        self.target.contains(separator)
    }
}

/// Which part of a document's text to search for links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Only text before the backlinks header.
    Content,
    /// The whole text, backlinks block included.
    Everything,
}

fn link_regex() -> &'static Regex {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    LINK_REGEX.get_or_init(|| {
        Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").expect("Invalid link regex")
    })
}

/// Find all links in `text`, in order of occurrence.
///
/// Child-page links (`[[+child]]`) are navigation, not references, and are
/// never returned. Spans are byte offsets into `text`.
pub fn parse_links(text: &str, conventions: &Conventions, scope: LinkScope) -> Vec<Link> {
    let searched = match scope {
        LinkScope::Content => split_sections(text, conventions).content,
        LinkScope::Everything => text,
    };

    link_regex()
        .captures_iter(searched)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let target = caps.get(1)?.as_str();
            if target.starts_with(conventions.child_sigil) {
                return None;
            }
            Some(Link {
                span: Span::new(full.start(), full.end()),
                raw: full.as_str().to_string(),
                target: target.to_string(),
                label: caps.get(2).map(|m| m.as_str().to_string()),
            })
        })
        .collect()
}
