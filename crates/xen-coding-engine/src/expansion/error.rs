use super::validate::Rejection;

/// Why an abbreviation produced no markup. Every variant means the caller
/// should leave its input untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    #[error("not an expandable abbreviation: {0}")]
    InvalidAbbreviation(#[from] Rejection),
    #[error("abbreviation expands to nothing")]
    EmptyExpansion,
    #[error("abbreviation would produce {elements} elements, more than {limit}")]
    TooManyElements { elements: usize, limit: usize },
}
