//! # Abbreviation Expansion
//!
//! Turns shorthand such as `grid>stack>btn*3{item $}` into XAML markup.
//!
//! ## Pipeline
//!
//! ```text
//! text → validate → tokenize → resolve aliases → TreeBuilder → render → markup
//! ```
//!
//! 1. **Validation** (`validate`): cheap grammar checks that turn away
//!    anything that is obviously not shorthand (partially typed text, markup,
//!    escape prefixes) before any work is done
//! 2. **Tokenizing** (`tokens`): a first split on `>`, `+` and `^` yields one
//!    token per element; a second split on `#`, `.`, `[` and `{` yields its
//!    modifiers. Brackets and braces keep their operators to themselves
//! 3. **Alias resolution** (`shortcuts`): `btn` becomes `Button`
//! 4. **Tree construction** (`builder`): operators become nesting depths,
//!    multipliers become clones numbered through `$` runs (`element`)
//! 5. **Rendering** (`render`): indented markup, entities decoded
//!
//! ## Modules
//!
//! - **`kinds`**: delimiter constants (`Structural`, `Modifiers`)
//! - **`span`** / **`cursor`**: byte ranges and scanning over the abbreviation
//! - **`element`**: `ElementNode` and the `ElementFactory` that builds and clones it
//! - **`builder`**: `TreeBuilder`, the operator-driven tree construction
//! - **`error`**: `ExpandError`
//!
//! ## Key Invariants
//!
//! - Expansion is pure: the same text and table always give the same markup
//! - Failures are values ([`ExpandError`]), never panics
//! - An element carries inline text or children, never both

pub mod builder;
pub mod cursor;
pub mod element;
pub mod error;
pub mod kinds;
pub mod render;
pub mod shortcuts;
pub mod span;
pub mod tokens;
pub mod validate;

use std::sync::Arc;

pub use builder::TreeBuilder;
pub use element::{ElementFactory, ElementNode};
pub use error::ExpandError;
pub use render::{RenderOptions, render};
pub use shortcuts::{ShortcutTable, merge_shortcuts};
pub use tokens::{Modifier, Operator, Token, tokenize};
pub use validate::{Rejection, ValidationRules, is_valid};

/// Everything about an expansion that is not the alias table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpanderOptions {
    pub rules: ValidationRules,
    pub render: RenderOptions,
}

/// A configured expander sharing one alias table between calls.
#[derive(Debug, Clone, Default)]
pub struct Expander {
    shortcuts: Arc<ShortcutTable>,
    options: ExpanderOptions,
}

impl Expander {
    pub fn new(shortcuts: impl Into<Arc<ShortcutTable>>, options: ExpanderOptions) -> Self {
        Self {
            shortcuts: shortcuts.into(),
            options,
        }
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn build_tree(&self, abbreviation: &str) -> Result<ElementNode, ExpandError> {
        build_tree(abbreviation, &self.shortcuts, &self.options.rules)
    }

    pub fn expand(&self, abbreviation: &str) -> Result<String, ExpandError> {
        expand_with(abbreviation, &self.shortcuts, &self.options)
    }
}

/// Expands `abbreviation` with default validation and rendering.
pub fn expand(abbreviation: &str, shortcuts: &ShortcutTable) -> Result<String, ExpandError> {
    expand_with(abbreviation, shortcuts, &ExpanderOptions::default())
}

pub fn expand_with(
    abbreviation: &str,
    shortcuts: &ShortcutTable,
    options: &ExpanderOptions,
) -> Result<String, ExpandError> {
    let tree = build_tree(abbreviation, shortcuts, &options.rules)?;
    let markup = render(&tree, &options.render);
    if markup.is_empty() {
        return Err(ExpandError::EmptyExpansion);
    }
    Ok(markup)
}

/// Validates and builds the element tree without rendering it.
pub fn build_tree(
    abbreviation: &str,
    shortcuts: &ShortcutTable,
    rules: &ValidationRules,
) -> Result<ElementNode, ExpandError> {
    rules.check(abbreviation).inspect_err(|rejection| {
        log::debug!("not expanding {abbreviation:?}: {rejection}");
    })?;

    let tokens = tokenize(abbreviation);
    log::trace!("tokens for {abbreviation:?}: {tokens:?}");

    let mut builder = TreeBuilder::new();
    for token in tokens {
        builder.push(&shortcuts.resolve(token));
    }
    let tree = builder.finish()?;

    if tree.children().is_empty() {
        return Err(ExpandError::EmptyExpansion);
    }
    Ok(tree)
}
