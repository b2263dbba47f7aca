//! # Delimiter Kinds
//!
//! Types that own the abbreviation's syntax characters. The tokenizer and
//! validator read these constants rather than hardcoding `>` or `[`.

/// Operators joining one element token to the next.
pub struct Structural;

impl Structural {
    pub const CHILD: u8 = b'>';
    pub const SIBLING: u8 = b'+';
    pub const CLIMB: u8 = b'^';

    /// Split points for the first tokenizer pass.
    pub const SET: &'static [u8] = &[Self::CHILD, Self::SIBLING, Self::CLIMB];
}

/// Modifiers decorating a single element token.
pub struct Modifiers;

impl Modifiers {
    pub const ID: u8 = b'#';
    pub const CLASS: u8 = b'.';
    pub const ATTRS_OPEN: u8 = b'[';
    pub const ATTRS_CLOSE: u8 = b']';
    pub const TEXT_OPEN: u8 = b'{';
    pub const TEXT_CLOSE: u8 = b'}';
    pub const MULTIPLY: u8 = b'*';

    /// Split points for the second tokenizer pass.
    pub const SET: &'static [u8] = &[Self::ID, Self::CLASS, Self::ATTRS_OPEN, Self::TEXT_OPEN];

    /// Closing delimiters whose presence without the matching opener marks a
    /// fragment as the continuation of the previous one.
    pub const PAIRS: &'static [(u8, u8)] = &[
        (Self::ATTRS_OPEN, Self::ATTRS_CLOSE),
        (Self::TEXT_OPEN, Self::TEXT_CLOSE),
    ];
}
