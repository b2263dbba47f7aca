use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;

use super::element::ElementNode;

fn line_breaks() -> &'static Regex {
    static LINE_BREAKS: OnceLock<Regex> = OnceLock::new();
    LINE_BREAKS.get_or_init(|| Regex::new(r"[\r\n]+").expect("Invalid line break regex"))
}

/// Layout knobs for serialized markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Repeated once per nesting level.
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }
}

/// Serializes the children of the synthetic `root` as markup text.
///
/// Values are entity-encoded while writing and the finished text is decoded
/// again, so markup characters typed into the abbreviation come back raw.
/// Leading and trailing line breaks are trimmed and runs of line breaks
/// collapse into a single `\n`.
pub fn render(root: &ElementNode, options: &RenderOptions) -> String {
    let mut out = String::new();
    for child in root.children() {
        write_element(&mut out, child, 0, options);
    }

    let decoded = html_escape::decode_html_entities(&out);
    let trimmed = decoded.trim_matches(['\r', '\n']);
    line_breaks().replace_all(trimmed, "\n").into_owned()
}

fn write_element(out: &mut String, node: &ElementNode, depth: usize, options: &RenderOptions) {
    let pad = options.indent.repeat(depth);
    let _ = write!(out, "{pad}<{}", node.tag());
    for (name, value) in node.attributes() {
        let _ = write!(
            out,
            " {name}=\"{}\"",
            html_escape::encode_double_quoted_attribute(value)
        );
    }

    if node.is_empty_element() {
        out.push_str(" />\n");
    } else if let Some(text) = node.text() {
        let _ = writeln!(
            out,
            ">{}</{}>",
            html_escape::encode_text(text),
            node.tag()
        );
    } else {
        out.push_str(">\n");
        for child in node.children() {
            write_element(out, child, depth + 1, options);
        }
        let _ = writeln!(out, "{pad}</{}>", node.tag());
    }
}
