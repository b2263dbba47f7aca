use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::tokens::{Modifier, Token};

/// Tag names that always carry `Property` and `Value` attributes.
const PLACEHOLDER_TAGS: [&str; 2] = ["setter", "trigger"];
const PLACEHOLDER_ATTRIBUTES: [&str; 2] = ["Property", "Value"];

const NAME_ATTRIBUTE: &str = "x:Name";
const STYLE_ATTRIBUTE: &str = "Style";

fn counter_runs() -> &'static Regex {
    static COUNTER: OnceLock<Regex> = OnceLock::new();
    COUNTER.get_or_init(|| Regex::new(r"\$+").expect("Invalid counter regex"))
}

/// One output element.
///
/// Children are owned by their parent. `text` and `children` are never both
/// populated: pushing a child drops any inline text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementNode {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<ElementNode>,
    text: Option<String>,
}

impl ElementNode {
    /// The synthetic, never-rendered root holding the top-level elements.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, keeping the original position when it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn children(&self) -> &[ElementNode] {
        &self.children
    }

    pub fn push_child(&mut self, child: ElementNode) {
        if let Some(text) = self.text.take() {
            log::debug!("<{}> gets children, dropping its text {text:?}", self.tag);
        }
        self.children.push(child);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Sets inline text. Ignored once the element has children.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if self.children.is_empty() {
            self.text = Some(text.into());
        }
    }

    /// True when the element renders as `<Tag />`.
    pub fn is_empty_element(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }
}

/// Builds and copies [`ElementNode`]s.
pub struct ElementFactory;

impl ElementFactory {
    /// A bare element, or `None` for an empty name.
    pub fn create(name: &str) -> Option<ElementNode> {
        if name.is_empty() {
            return None;
        }
        Some(ElementNode {
            tag: name.to_string(),
            ..ElementNode::default()
        })
    }

    /// An element with the token's modifiers applied left to right.
    pub fn from_token(token: &Token) -> Option<ElementNode> {
        let mut element = Self::create(&token.name)?;
        for modifier in &token.modifiers {
            match modifier {
                Modifier::Class(class) => {
                    element.set_attribute(STYLE_ATTRIBUTE, format!("{{DynamicResource {class}}}"))
                }
                Modifier::Id(id) => element.set_attribute(NAME_ATTRIBUTE, id.as_str()),
                Modifier::Attributes(list) => {
                    for (name, value) in parse_attribute_list(list) {
                        element.set_attribute(name, value);
                    }
                }
                Modifier::Text(text) => element.set_text(text.as_str()),
            }
        }

        if PLACEHOLDER_TAGS.contains(&element.tag.to_lowercase().as_str()) {
            for name in PLACEHOLDER_ATTRIBUTES {
                if element.attribute(name).is_none() {
                    element.set_attribute(name, "");
                }
            }
        }
        Some(element)
    }

    /// Copies tag, attributes and text (not children), numbering every `$` run
    /// with `index + 1`.
    pub fn clone_instance(element: &ElementNode, index: usize) -> ElementNode {
        ElementNode {
            tag: substitute_counter(&element.tag, index).into_owned(),
            attributes: element
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), substitute_counter(v, index).into_owned()))
                .collect(),
            children: vec![],
            text: element
                .text
                .as_deref()
                .map(|t| substitute_counter(t, index).into_owned()),
        }
    }
}

/// Replaces each run of `$` with `index + 1`, zero-padded to the run length.
pub fn substitute_counter(value: &str, index: usize) -> Cow<'_, str> {
    counter_runs().replace_all(value, |caps: &Captures| {
        let width = caps[0].len();
        format!("{:0width$}", index + 1)
    })
}

/// Parses `key=value key2='quoted value' flag` into ordered pairs.
///
/// Splits on spaces, then glues a piece back onto its predecessor when it is
/// the tail of a quoted or braced value, so `Tag='a b'` and
/// `Text={Binding Name}` stay whole.
pub fn parse_attribute_list(list: &str) -> Vec<(String, String)> {
    let mut parts: Vec<String> = list.trim().split(' ').map(str::to_string).collect();
    for i in (1..parts.len()).rev() {
        if continues_value(&parts[i]) {
            let part = parts.remove(i);
            parts[i - 1].push(' ');
            parts[i - 1].push_str(&part);
        }
    }

    parts
        .iter()
        .filter(|p| !p.is_empty())
        .filter_map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn continues_value(part: &str) -> bool {
    let singles = part.matches('\'').count();
    let doubles = part.matches('"').count();
    let opens = part.matches('{').count();
    let closes = part.matches('}').count();

    ((singles > 1 || doubles > 1) && !part.contains('='))
        || (doubles == 1 && part.ends_with('"'))
        || (singles == 1 && part.ends_with('\''))
        || closes > opens
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last))
            if bytes.len() >= 2 && first == last && (first == b'\'' || first == b'"') =>
        {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}
