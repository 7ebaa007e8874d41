//! An owned, mutable SVG element tree.
//!
//! Markup is parsed with `roxmltree` (which validates well-formedness and
//! resolves entities) and copied into plain [`Element`]/[`Node`] values that
//! can be edited and written back out. Namespace declarations are carried as
//! ordinary `xmlns`/`xmlns:*` attributes on the element that introduced them,
//! and qualified names keep their original prefix.
//!
//! Content outside the root element (XML declaration, DOCTYPE, top-level
//! comments) is not retained.

use roxmltree::{Document, ParsingOptions};

use crate::error::TransformError;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A node inside an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, value: Option<String> },
}

/// A single attribute, name kept in its qualified (`prefix:local`) form.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An SVG element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attr`].
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Parses markup and returns its root element.
    pub fn parse(markup: &str) -> Result<Self, TransformError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(markup, options)?;
        Ok(convert_element(doc.root_element(), None))
    }

    /// Returns the name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Returns the namespace prefix of this element's name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Sets an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(pos).value)
    }

    /// Removes the first descendant element with the given local name,
    /// searching depth-first in document order. Returns true if one was removed.
    pub fn remove_first_descendant(&mut self, local_name: &str) -> bool {
        let found = self.children.iter().position(
            |child| matches!(child, Node::Element(e) if e.local_name() == local_name),
        );
        // A matching child that precedes a subtree containing a match wins,
        // so scan children in order and recurse before moving on.
        for (i, child) in self.children.iter_mut().enumerate() {
            if Some(i) == found {
                break;
            }
            if let Node::Element(e) = child {
                if e.remove_first_descendant(local_name) {
                    return true;
                }
            }
        }
        match found {
            Some(i) => {
                self.children.remove(i);
                true
            }
            None => false,
        }
    }

    /// Visits every descendant element (not `self`) in document order.
    pub fn for_each_descendant_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        for child in &mut self.children {
            if let Node::Element(e) = child {
                f(e);
                e.for_each_descendant_mut(f);
            }
        }
    }

    /// Serializes this element and its subtree to markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

// ============================================================================
// Conversion from roxmltree
// ============================================================================

fn convert_element(
    node: roxmltree::Node<'_, '_>,
    parent: Option<roxmltree::Node<'_, '_>>,
) -> Element {
    let tag = node.tag_name();
    let name = qualify(node, tag.namespace(), tag.name());

    let mut attributes = Vec::new();

    // Namespace declarations introduced by this element
    for ns in node.namespaces() {
        if ns.uri() == XML_NS {
            continue;
        }
        let inherited = parent.is_some_and(|p| {
            p.namespaces()
                .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
        });
        if inherited {
            continue;
        }
        let attr_name = match ns.name() {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        attributes.push(Attribute {
            name: attr_name,
            value: ns.uri().to_string(),
        });
    }

    for attr in node.attributes() {
        attributes.push(Attribute {
            name: qualify(node, attr.namespace(), attr.name()),
            value: attr.value().to_string(),
        });
    }

    let mut children = Vec::new();
    for child in node.children() {
        match child.node_type() {
            roxmltree::NodeType::Element => {
                children.push(Node::Element(convert_element(child, Some(node))));
            }
            roxmltree::NodeType::Text => {
                if let Some(text) = child.text() {
                    children.push(Node::Text(text.to_string()));
                }
            }
            roxmltree::NodeType::Comment => {
                if let Some(text) = child.text() {
                    children.push(Node::Comment(text.to_string()));
                }
            }
            roxmltree::NodeType::PI => {
                if let Some(pi) = child.pi() {
                    children.push(Node::ProcessingInstruction {
                        target: pi.target.to_string(),
                        value: pi.value.map(str::to_string),
                    });
                }
            }
            roxmltree::NodeType::Root => {}
        }
    }

    Element {
        name,
        attributes,
        children,
    }
}

fn qualify(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let Some(uri) = namespace else {
        return local.to_string();
    };
    if uri == XML_NS {
        return format!("xml:{local}");
    }
    match node.lookup_prefix(uri) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

// ============================================================================
// Serialization
// ============================================================================

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr.value));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(e, out),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Node::ProcessingInstruction { target, value } => {
                out.push_str("<?");
                out.push_str(target);
                if let Some(value) = value {
                    out.push(' ');
                    out.push_str(value);
                }
                out.push_str("?>");
            }
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
