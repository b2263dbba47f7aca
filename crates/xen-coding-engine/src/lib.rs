pub mod expansion;

// Re-export key types for easier usage
pub use expansion::{
    ElementNode, ExpandError, Expander, ExpanderOptions, Rejection, RenderOptions,
    ShortcutTable, ValidationRules, build_tree, expand, expand_with, is_valid, merge_shortcuts,
};
