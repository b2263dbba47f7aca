/// Byte scanner over one fragment of an abbreviation.
///
/// `base` is the fragment's offset in the whole abbreviation, so `pos` can
/// be turned straight into a [`Span`](super::span::Span). All delimiters are
/// ASCII; stepping bytewise never cuts a multi-byte character at a delimiter.
#[derive(Clone)]
pub struct Cursor<'a> {
    s: &'a str,
    base: usize,
    i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Absolute byte position in the abbreviation.
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Everything not yet consumed.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    /// Consumes an `open ... close` group starting at the cursor, honouring
    /// nested pairs, and returns its inner text.
    ///
    /// An unterminated group consumes the rest of the input and yields
    /// `Err` with whatever followed the opener.
    pub fn eat_enclosed(&mut self, open: u8, close: u8) -> Result<&'a str, &'a str> {
        debug_assert_eq!(self.peek(), Some(open));
        let start = self.i + 1;
        let mut depth = 0usize;
        while let Some(b) = self.bump() {
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(&self.s[start..self.i - 1]);
                }
            }
        }
        Err(&self.s[start.min(self.s.len())..])
    }

    /// Consumes a run of ASCII digits.
    pub fn eat_digits(&mut self) -> &'a str {
        let start = self.i;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.i += 1;
        }
        &self.s[start..self.i]
    }
}
