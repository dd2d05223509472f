/// A byte range `[start, end)` into a document's text.
///
/// Links store spans rather than only copied text so fixers can splice the
/// canonical form back into the exact source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes; zero for inverted spans.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether two spans share at least one byte.
    #[must_use]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slice the spanned text out of `text`.
    pub fn slice(self, text: &str) -> &str {
        &text[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_and_empty() {
        assert_eq!(Span::new(2, 7).len(), 5);
        assert!(Span::new(4, 4).is_empty());
        assert!(Span::new(5, 3).is_empty());
    }

    #[test]
    fn test_overlaps() {
        assert!(Span::new(0, 5).overlaps(Span::new(4, 8)));
        assert!(!Span::new(0, 5).overlaps(Span::new(5, 8)));
    }

    #[test]
    fn test_slice() {
        let text = "see [[x]] here";
        assert_eq!(Span::new(4, 9).slice(text), "[[x]]");
    }
}
