use std::ops::Range;

use super::{
    cursor::Cursor,
    kinds::{Modifiers, Structural},
    span::Span,
};

/// How a token attaches to the token before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// First token of the abbreviation.
    None,
    /// `>`: nest inside the previous element.
    Child,
    /// `+`: continue next to the previous element.
    Sibling,
    /// `^`, `^^`, ...: climb this many levels before continuing.
    ClimbUp(usize),
}

impl Operator {
    /// Reads the operator from a token's leading run of structural characters.
    fn from_prefix(prefix: &str) -> Self {
        let climbs = prefix
            .bytes()
            .filter(|&b| b == Structural::CLIMB)
            .count();
        if climbs > 0 {
            Operator::ClimbUp(climbs)
        } else if prefix.as_bytes().contains(&Structural::SIBLING) {
            Operator::Sibling
        } else if prefix.as_bytes().contains(&Structural::CHILD) {
            Operator::Child
        } else {
            Operator::None
        }
    }
}

/// A modifier fragment, delimiters removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    /// `#name`
    Id(String),
    /// `.name`
    Class(String),
    /// Inner content of `[...]`, still unparsed.
    Attributes(String),
    /// Inner content of `{...}`.
    Text(String),
}

/// One element occurrence in the abbreviation plus the operator leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The fragment text, operator included.
    pub raw: String,
    /// Where the fragment sits in the abbreviation.
    pub span: Span,
    pub operator: Operator,
    /// Element name with operator, modifiers and multiplier removed.
    pub name: String,
    /// Byte range of `name` inside `raw`.
    pub name_range: Range<usize>,
    pub multiplier: usize,
    pub modifiers: Vec<Modifier>,
}

impl Token {
    /// Upper bound on `*N` so a stray keystroke cannot request millions of elements.
    pub const MAX_MULTIPLIER: usize = 1000;

    /// Parses the structural fragment at `span` of `abbreviation`.
    pub fn parse(abbreviation: &str, span: Span) -> Self {
        let raw = span.slice(abbreviation);
        let op_len = raw
            .bytes()
            .take_while(|b| Structural::SET.contains(b))
            .count();
        let body = Span {
            start: span.start + op_len,
            end: span.end,
        };

        let mut token = Token {
            raw: raw.to_string(),
            span,
            operator: Operator::from_prefix(&raw[..op_len]),
            name: String::new(),
            name_range: op_len..op_len,
            multiplier: 1,
            modifiers: vec![],
        };
        let mut multiplier = None;

        for fragment in split(abbreviation, body, Modifiers::SET) {
            let text = fragment.slice(abbreviation);
            let Some(&first) = text.as_bytes().first() else {
                continue;
            };
            let tail = match first {
                Modifiers::ATTRS_OPEN => {
                    let (inner, tail) =
                        enclosed(text, Modifiers::ATTRS_OPEN, Modifiers::ATTRS_CLOSE);
                    token.modifiers.push(Modifier::Attributes(inner.to_string()));
                    tail
                }
                Modifiers::TEXT_OPEN => {
                    let (inner, tail) = enclosed(text, Modifiers::TEXT_OPEN, Modifiers::TEXT_CLOSE);
                    token.modifiers.push(Modifier::Text(inner.to_string()));
                    tail
                }
                Modifiers::ID | Modifiers::CLASS => {
                    let (value, count) = split_multiplier(&text[1..]);
                    multiplier = multiplier.or(count);
                    token.modifiers.push(if first == Modifiers::ID {
                        Modifier::Id(value.to_string())
                    } else {
                        Modifier::Class(value.to_string())
                    });
                    continue;
                }
                _ => {
                    let (value, count) = split_multiplier(text);
                    multiplier = multiplier.or(count);
                    let start = fragment.start - span.start;
                    token.name = value.to_string();
                    token.name_range = start..start + value.len();
                    continue;
                }
            };
            multiplier = multiplier.or(split_multiplier(tail).1);
        }

        token.multiplier = multiplier.unwrap_or(1);
        token
    }

    /// Replaces the element name, rewriting only the name portion of `raw`.
    pub fn rename(&mut self, name: &str) {
        self.raw.replace_range(self.name_range.clone(), name);
        self.name_range = self.name_range.start..self.name_range.start + name.len();
        self.name = name.to_string();
    }
}

/// Splits an abbreviation into its element tokens.
pub fn tokenize(abbreviation: &str) -> Vec<Token> {
    split(abbreviation, Span::of(abbreviation), Structural::SET)
        .into_iter()
        .map(|span| Token::parse(abbreviation, span))
        .collect()
}

/// Cuts `span` of `source` into fragments, each starting at one of `operators`.
///
/// The first character never starts a new fragment. Fragments holding a
/// closer without its opener are glued back onto their predecessor, then
/// lone `^` fragments are folded into the fragment that follows them.
pub fn split(source: &str, span: Span, operators: &[u8]) -> Vec<Span> {
    if span.is_empty() {
        return vec![];
    }

    let mut cur = Cursor::new(span.slice(source), span.start);
    let mut parts = vec![];
    let mut start = cur.pos();
    cur.bump();
    while let Some(b) = cur.peek() {
        if operators.contains(&b) {
            parts.push(Span {
                start,
                end: cur.pos(),
            });
            start = cur.pos();
        }
        cur.bump();
    }
    parts.push(Span {
        start,
        end: cur.pos(),
    });

    merge_unopened(source, &mut parts);
    fold_climbs(source, &mut parts);
    parts
}

fn merge_unopened(source: &str, parts: &mut Vec<Span>) {
    for i in (1..parts.len()).rev() {
        let text = parts[i].slice(source).as_bytes();
        let continues = Modifiers::PAIRS
            .iter()
            .any(|(open, close)| text.contains(close) && !text.contains(open));
        if continues {
            let part = parts.remove(i);
            parts[i - 1] = parts[i - 1].join(part);
        }
    }
}

fn fold_climbs(source: &str, parts: &mut Vec<Span>) {
    for i in (0..parts.len().saturating_sub(1)).rev() {
        if parts[i].slice(source).as_bytes() == [Structural::CLIMB] {
            let next = parts.remove(i + 1);
            parts[i] = parts[i].join(next);
        }
    }
}

/// Splits a `[...]` or `{...}` fragment into its inner content and whatever
/// trails the matching closer. An unterminated fragment runs to the end.
fn enclosed(text: &str, open: u8, close: u8) -> (&str, &str) {
    let mut cur = Cursor::new(text, 0);
    match cur.eat_enclosed(open, close) {
        Ok(inner) => (inner, cur.rest()),
        Err(inner) => (inner, ""),
    }
}

/// Separates a trailing `*N` multiplier (or a bare `*` decorator) from a value.
fn split_multiplier(text: &str) -> (&str, Option<usize>) {
    let Some(star) = text.find(char::from(Modifiers::MULTIPLY)) else {
        return (text, None);
    };
    let mut cur = Cursor::new(&text[star + 1..], 0);
    let digits = cur.eat_digits();
    let count = (!digits.is_empty()).then(|| {
        digits
            .parse::<usize>()
            .unwrap_or(usize::MAX)
            .min(Token::MAX_MULTIPLIER)
    });
    (&text[..star], count)
}
