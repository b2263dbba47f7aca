use super::kinds::{Modifiers, Structural};

/// Characters that may legally precede a space (attribute/text openers).
const SPACE_OPENERS: [char; 4] = ['[', '{', '"', '.'];
/// Characters that may legally follow a space (attribute/text closers).
const SPACE_CLOSERS: [char; 3] = [']', '}', '"'];
/// Characters that mean the text is already markup, not shorthand.
const RESERVED: [char; 3] = ['<', '|', '@'];

/// Why an abbreviation was turned away before parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("abbreviation is empty")]
    Empty,
    #[error("abbreviation starts with escape prefix {0:?}")]
    EscapePrefix(String),
    #[error("space outside of an attribute or text modifier")]
    StraySpace,
    #[error("unbalanced curly braces")]
    UnbalancedBraces,
    #[error("reserved character {0:?}")]
    ReservedCharacter(char),
    #[error("abbreviation cannot end with {0:?}")]
    TrailingCharacter(char),
    #[error("unbalanced square brackets")]
    UnbalancedBrackets,
}

/// Grammar checks applied before any tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Prefixes that mark the text as "leave it alone" (compared case-insensitively).
    pub escape_prefixes: Vec<String>,
    /// Leading keywords that lift the trailing-character restriction.
    pub verbatim_keywords: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            escape_prefixes: vec!["asp:".to_string()],
            verbatim_keywords: vec!["place".to_string()],
        }
    }
}

impl ValidationRules {
    pub fn is_valid(&self, text: &str) -> bool {
        self.check(text).is_ok()
    }

    /// Runs every rule in order and reports the first one that fails.
    pub fn check(&self, text: &str) -> Result<(), Rejection> {
        if text.is_empty() {
            return Err(Rejection::Empty);
        }
        if let Some(prefix) = self
            .escape_prefixes
            .iter()
            .find(|p| starts_with_ignore_case(text, p))
        {
            return Err(Rejection::EscapePrefix(prefix.clone()));
        }

        if let (Some(first), Some(last)) = (text.find(' '), text.rfind(' ')) {
            let before_opener = text.find(SPACE_OPENERS).is_none_or(|open| first < open);
            let after_closer = text.rfind(SPACE_CLOSERS).is_none_or(|close| last > close);
            if before_opener || after_closer {
                return Err(Rejection::StraySpace);
            }
        }

        if !balanced(text, Modifiers::TEXT_OPEN, Modifiers::TEXT_CLOSE) {
            return Err(Rejection::UnbalancedBraces);
        }

        if let Some(c) = text.chars().find(|c| RESERVED.contains(c)) {
            return Err(Rejection::ReservedCharacter(c));
        }

        let verbatim = self
            .verbatim_keywords
            .iter()
            .any(|k| starts_with_ignore_case(text, k));
        if !verbatim && let Some(last) = text.chars().last() {
            let allowed = last.is_alphanumeric()
                || last.is_whitespace()
                || last == char::from(Modifiers::ATTRS_CLOSE)
                || last == char::from(Modifiers::TEXT_CLOSE)
                || last == char::from(Structural::SIBLING);
            if !allowed {
                return Err(Rejection::TrailingCharacter(last));
            }
        }

        if !balanced(text, Modifiers::ATTRS_OPEN, Modifiers::ATTRS_CLOSE) {
            return Err(Rejection::UnbalancedBrackets);
        }

        Ok(())
    }
}

/// Validates with the default rules (`asp:` escape prefix, `place` verbatim keyword).
pub fn is_valid(text: &str) -> bool {
    ValidationRules::default().is_valid(text)
}

fn balanced(text: &str, open: u8, close: u8) -> bool {
    let opens = text.bytes().filter(|&b| b == open).count();
    let closes = text.bytes().filter(|&b| b == close).count();
    opens == closes
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && text
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
