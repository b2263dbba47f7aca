use super::{
    element::{ElementFactory, ElementNode},
    error::ExpandError,
    tokens::{Operator, Token},
};

/// An element waiting to be stamped out `multiplier` times, with the
/// templates nested beneath it.
#[derive(Debug, Clone)]
struct Template {
    element: ElementNode,
    multiplier: usize,
    children: Vec<Template>,
}

impl Template {
    fn root() -> Self {
        Self {
            element: ElementNode::root(),
            multiplier: 1,
            children: vec![],
        }
    }

    /// Elements this template stamps out, its nested clones included.
    fn element_count(&self) -> usize {
        let per_clone = self
            .children
            .iter()
            .fold(1usize, |sum, child| sum.saturating_add(child.element_count()));
        per_clone.saturating_mul(self.multiplier)
    }

    /// Appends this template's clones to `parent`.
    ///
    /// `counter` is the index of the nearest multiplied ancestor clone; a
    /// singleton inherits it so its `$` runs follow that ancestor.
    fn instantiate(&self, counter: Option<usize>, parent: &mut ElementNode) {
        for i in 0..self.multiplier {
            let inherited = if self.multiplier > 1 {
                Some(i)
            } else {
                counter
            };
            let mut clone = ElementFactory::clone_instance(&self.element, inherited.unwrap_or(i));
            for child in &self.children {
                child.instantiate(inherited, &mut clone);
            }
            parent.push_child(clone);
        }
    }
}

/// Turns a resolved token stream into an element tree.
///
/// Tokens are pushed left to right. Each token's operator gives its nesting
/// depth relative to the token before it; the builder keeps the path of open
/// templates from the root down to the latest one, closing templates as the
/// depth drops. `finish` then expands multipliers bottom-up, so every clone
/// of a multiplied element owns its own copy of the nested subtree.
pub struct TreeBuilder {
    /// Cap on the elements one abbreviation may produce.
    limit: usize,
    /// `open[0]` is the synthetic root.
    open: Vec<Template>,
    /// Depth of the previous token, `None` before the first push.
    depth: Option<usize>,
}

impl TreeBuilder {
    /// Element limit used by [`TreeBuilder::new`]. Nested multipliers multiply, so
    /// `*1000` three levels deep would otherwise ask for a billion elements.
    pub const MAX_ELEMENTS: usize = 10_000;

    pub fn new() -> Self {
        Self::with_limit(Self::MAX_ELEMENTS)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            open: vec![Template::root()],
            depth: None,
        }
    }

    pub fn push(&mut self, token: &Token) {
        let depth = self.next_depth(token.operator);
        self.depth = Some(depth);

        let Some(element) = ElementFactory::from_token(token) else {
            log::debug!("skipping token {:?}: no element name", token.raw);
            return;
        };

        self.close_to(depth + 1);
        self.open.push(Template {
            element,
            multiplier: token.multiplier,
            children: vec![],
        });
    }

    /// Expands the collected templates, refusing before any cloning when
    /// the result would exceed the element limit.
    pub fn finish(mut self) -> Result<ElementNode, ExpandError> {
        self.close_to(1);
        let mut root = ElementNode::root();
        let Some(top) = self.open.pop() else {
            return Ok(root);
        };

        let elements = top
            .children
            .iter()
            .fold(0usize, |sum, t| sum.saturating_add(t.element_count()));
        if elements > self.limit {
            log::debug!("refusing to build {elements} elements (limit {})", self.limit);
            return Err(ExpandError::TooManyElements {
                elements,
                limit: self.limit,
            });
        }

        for template in &top.children {
            template.instantiate(None, &mut root);
        }
        Ok(root)
    }

    fn next_depth(&self, operator: Operator) -> usize {
        match (self.depth, operator) {
            (None, _) => 0,
            (Some(prev), Operator::Child | Operator::None) => prev + 1,
            (Some(prev), Operator::Sibling) => prev,
            (Some(prev), Operator::ClimbUp(levels)) => prev.saturating_sub(levels),
        }
    }

    /// Closes open templates until `len` remain, attaching each to its parent.
    /// A skipped token leaves the path shorter than its depth; its children
    /// then attach to the nearest open ancestor.
    fn close_to(&mut self, len: usize) {
        while self.open.len() > len.max(1) {
            if let Some(done) = self.open.pop()
                && let Some(parent) = self.open.last_mut()
            {
                parent.children.push(done);
            }
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
