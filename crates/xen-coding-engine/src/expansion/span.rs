/// A byte range `[start, end)` into the abbreviation.
///
/// Tokens and modifier fragments store spans rather than copied text, so
/// merging two adjacent fragments is a matter of widening a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Span covering the whole of `s`.
    pub fn of(s: &str) -> Self {
        Self {
            start: 0,
            end: s.len(),
        }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Slices `source` with this span.
    pub fn slice(self, source: &str) -> &str {
        &source[self.start..self.end]
    }

    /// Widens this span to also cover `other`, which must follow it directly.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}
