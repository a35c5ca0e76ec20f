use ego_tree::NodeRef as TreeNodeRef;
use scraper::{node::Element as ScraperElement, Html, Node};
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};

type NodeRef<'a> = TreeNodeRef<'a, Node>;

/// Elements html5ever synthesizes around fragment content.
const IMPLIED_WRAPPERS: [&str; 3] = ["html", "head", "body"];

/// How raw markup is handed to the HTML5 parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// `Document` for input that opens with a doctype or `<html>`, `Fragment` otherwise.
    /// A leading byte order mark, comments and processing instructions are skipped.
    #[default]
    Auto,
    /// Full document parse; implied `html`, `head` and `body` elements are created.
    Document,
    /// Body fragment parse; the top-level nodes are exactly what the markup contains.
    Fragment,
}

impl ParseMode {
    /// Resolves `Auto` against the input; other modes are returned unchanged.
    pub fn resolve(self, html: &str) -> ParseMode {
        match self {
            ParseMode::Auto => {
                let head = skip_prolog(html);
                if starts_with_ignore_case(head, "<!doctype") || starts_with_ignore_case(head, "<html")
                {
                    ParseMode::Document
                } else {
                    ParseMode::Fragment
                }
            }
            mode => mode,
        }
    }
}

/// Skips the BOM, whitespace, comments and `<?...>` instructions preceding the first tag.
fn skip_prolog(html: &str) -> &str {
    let mut rest = html.trim_start_matches('\u{feff}');
    loop {
        rest = rest.trim_start();
        let end = if rest.starts_with("<!--") {
            rest.find("-->").map(|i| i + 3)
        } else if rest.starts_with("<?") {
            rest.find('>').map(|i| i + 1)
        } else {
            return rest;
        };
        match end {
            Some(end) => rest = &rest[end..],
            None => return "",
        }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Read-only node tree handed to the transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedNode {
    Document(Vec<ParsedNode>),
    Element(ParsedElement),
    Text(String),
    Comment(String),
    /// Doctypes, processing instructions.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedElement {
    pub name: String,
    /// Attribute pairs in the order the parser produced them.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<ParsedNode>,
}

impl ParsedElement {
    pub fn new(name: impl Into<String>) -> Self {
        ParsedElement {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, node: ParsedNode) -> Self {
        self.children.push(node);
        self
    }
}

impl From<ParsedElement> for ParsedNode {
    fn from(element: ParsedElement) -> Self {
        ParsedNode::Element(element)
    }
}

impl ParsedNode {
    pub fn is_element(&self) -> bool {
        matches!(self, ParsedNode::Element(_))
    }
}

/// Parses `html` into a `ParsedNode::Document`.
///
/// html5ever recovers from every malformed input, so parsing only fails when
/// `strict` is set and the parser reported at least one error.
pub fn parse(html: &str, mode: ParseMode, strict: bool) -> ConvertResult<ParsedNode> {
    let mode = mode.resolve(html);
    let parsed = match mode {
        ParseMode::Fragment => Html::parse_fragment(html),
        _ => Html::parse_document(html),
    };

    if !parsed.errors.is_empty() {
        debug!(
            ?mode,
            count = parsed.errors.len(),
            errors = ?parsed.errors,
            "html parser recovered from errors"
        );
        if strict {
            return Err(ConvertError::Parse(parsed.errors.join("; ")));
        }
    }

    let root = parsed.tree.root();
    let children = match mode {
        ParseMode::Fragment => root.children().flat_map(unwrap_implied).collect(),
        _ => root.children().map(convert_node).collect(),
    };
    Ok(ParsedNode::Document(children))
}

/// Replaces the wrapper elements of a fragment parse with their contents.
fn unwrap_implied(node: NodeRef<'_>) -> Vec<ParsedNode> {
    match node.value() {
        Node::Element(el) if IMPLIED_WRAPPERS.contains(&el.name()) => {
            node.children().flat_map(unwrap_implied).collect()
        }
        _ => vec![convert_node(node)],
    }
}

fn convert_node(node: NodeRef<'_>) -> ParsedNode {
    match node.value() {
        Node::Document | Node::Fragment => {
            ParsedNode::Document(node.children().map(convert_node).collect())
        }
        Node::Element(el) => ParsedNode::Element(convert_element(node, el)),
        Node::Text(text) => ParsedNode::Text(String::from(&**text)),
        Node::Comment(comment) => ParsedNode::Comment(String::from(&**comment)),
        _ => ParsedNode::Other,
    }
}

fn convert_element(node: NodeRef<'_>, el: &ScraperElement) -> ParsedElement {
    ParsedElement {
        name: el.name().to_string(),
        attrs: el
            .attrs()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
        children: node.children().map(convert_node).collect(),
    }
}
