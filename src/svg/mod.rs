mod parser;
mod writer;

pub use parser::parse;

use quick_xml::events::attributes::AttrError;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

/// Unprefixed attribute restricting an element to one language variant.
pub const SYSTEM_LANGUAGE: &str = "systemLanguage";

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("malformed XML at byte {position}: {source}")]
    Syntax {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("unbound namespace prefix: {0}")]
    UnboundPrefix(String),

    #[error("unexpected closing tag: {0}")]
    UnexpectedEnd(String),

    #[error("element not closed before end of document: {0}")]
    Unclosed(String),

    #[error("junk after document element")]
    MultipleRoots,

    #[error("text outside the document element")]
    TextOutsideRoot,

    #[error("no element found")]
    Empty,
}

/// A node in the owned document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data.
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Raw qualified key as written in the source, e.g. `xlink:href`.
    pub name: String,
    pub namespace: Option<String>,
    pub value: String,
}

impl Attribute {
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Raw qualified name as written in the source, e.g. `svg:text`.
    pub name: String,
    /// Namespace URI resolved at parse time.
    pub namespace: Option<String>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// True when this element is `{namespace}local`.
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name() == local
    }

    /// Look up an attribute by namespace URI and local name.
    /// Unprefixed attributes have no namespace.
    pub fn attr(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == namespace && a.local_name() == local)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, namespace: Option<&str>, local: &str) -> bool {
        self.attr(namespace, local).is_some()
    }

    /// Overwrite an existing attribute's value. Returns false if it is absent.
    pub fn set_attr(&mut self, namespace: Option<&str>, local: &str, value: &str) -> bool {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.namespace.as_deref() == namespace && a.local_name() == local)
        {
            Some(attr) => {
                attr.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove_attr(&mut self, namespace: Option<&str>, local: &str) -> Option<String> {
        let idx = self
            .attributes
            .iter()
            .position(|a| a.namespace.as_deref() == namespace && a.local_name() == local)?;
        Some(self.attributes.remove(idx).value)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// All descendant elements in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Element> = self.child_elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Concatenated text and CDATA of the whole subtree, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn to_xml(&self) -> String {
        writer::to_xml(self)
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let before = self.stack.len();
        self.stack.extend(next.child_elements());
        self.stack[before..].reverse();
        Some(next)
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(t) | Node::CData(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
            Node::Comment(_) => {}
        }
    }
}

fn local_part(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}
