//! Half-open character spans.

use std::fmt;
use std::ops::Range;

/// Half-open interval `[start, end)` over character positions of a text.
///
/// Positions count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// First character covered.
    pub start: usize,
    /// One past the last character covered.
    pub end: usize,
}

impl Span {
    /// Create a span. `end` is clamped up to `start` so the span is never inverted.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of characters covered.
    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no characters.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely within this span (equal spans contain each other).
    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Shared part of both spans, or `None` when they do not overlap.
    #[must_use]
    pub fn intersection(self, other: Span) -> Option<Span> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Span { start, end })
    }

    /// Parts of this span not covered by `other`: the piece before it and the piece after it.
    ///
    /// Either side is `None` when empty.
    #[must_use]
    pub fn difference(self, other: Span) -> (Option<Span>, Option<Span>) {
        if self.intersection(other).is_none() {
            return (Some(self).filter(|s| !s.is_empty()), None);
        }
        let before = Span::new(self.start, other.start.min(self.end));
        let after = Span::new(other.end.max(self.start), self.end);
        (
            Some(before).filter(|s| !s.is_empty()),
            Some(after).filter(|s| !s.is_empty()),
        )
    }

    /// Byte range of this span within `text`, or `None` if it runs past the end.
    #[must_use]
    pub fn byte_range(self, text: &str) -> Option<Range<usize>> {
        let mut indices = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()));
        let start = indices.nth(self.start)?;
        let end = if self.is_empty() {
            start
        } else {
            indices.nth(self.len() - 1)?
        };
        Some(start..end)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
