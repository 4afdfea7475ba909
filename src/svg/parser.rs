use std::collections::HashMap;
use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

use super::{Attribute, Element, Node, SvgError, XML_NS, XMLNS_NS};

static ENTITY_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!ENTITY\s+([^\s%"'<>]+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#)
        .expect("entity declaration regex is valid")
});

/// Parse an XML document into an owned tree rooted at its document element.
///
/// Internal entities declared in the DOCTYPE are expanded in text and
/// attribute values. Declaration, DOCTYPE and processing instructions are
/// otherwise dropped, as is anything outside the root element other than
/// whitespace.
pub fn parse(xml: &str) -> Result<Element, SvgError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    let mut entities = Entities::default();
    let mut scopes = Scopes::default();
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                return Err(SvgError::Syntax {
                    position: reader.buffer_position() as u64,
                    source,
                });
            }
        };

        match event {
            Event::DocType(doctype) => {
                entities.declare_from(&String::from_utf8_lossy(&doctype.into_inner()));
            }
            Event::Start(start) => {
                let element = open_element(&start, &entities, &mut scopes)?;
                open.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&start, &entities, &mut scopes)?;
                scopes.pop();
                attach(element, &mut open, &mut root)?;
            }
            Event::End(end) => {
                let element = open.pop().ok_or_else(|| {
                    SvgError::UnexpectedEnd(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                })?;
                scopes.pop();
                attach(element, &mut open, &mut root)?;
            }
            Event::Text(text) => {
                let content = text.unescape_with(|name| entities.resolve(name))?;
                push_text(&mut open, Node::Text(content.into_owned()))?;
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                push_text(&mut open, Node::CData(content))?;
            }
            Event::Comment(comment) => {
                if let Some(parent) = open.last_mut() {
                    let content = String::from_utf8_lossy(&comment.into_inner()).into_owned();
                    parent.children.push(Node::Comment(content));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(SvgError::Unclosed(unclosed.name));
    }
    root.ok_or(SvgError::Empty)
}

fn open_element(
    start: &BytesStart<'_>,
    entities: &Entities,
    scopes: &mut Scopes,
) -> Result<Element, SvgError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut raw = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value_with(|name| entities.resolve(name))?
            .into_owned();
        raw.push((key, value));
    }

    let mut scope = Vec::new();
    for (key, value) in &raw {
        if key == "xmlns" {
            scope.push((String::new(), value.clone()));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.push((prefix.to_string(), value.clone()));
        }
    }
    scopes.push(scope);

    let namespace = match name.split_once(':') {
        Some((prefix, _)) => Some(scopes.resolve_prefix(prefix)?),
        None => scopes.default_namespace(),
    };

    let mut attributes = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        let namespace = if key == "xmlns" || key.starts_with("xmlns:") {
            Some(XMLNS_NS.to_string())
        } else {
            match key.split_once(':') {
                Some((prefix, _)) => Some(scopes.resolve_prefix(prefix)?),
                None => None,
            }
        };
        attributes.push(Attribute {
            name: key,
            namespace,
            value,
        });
    }

    Ok(Element {
        name,
        namespace,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    element: Element,
    open: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), SvgError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(SvgError::MultipleRoots);
    }
    *root = Some(element);
    Ok(())
}

fn push_text(open: &mut [Element], node: Node) -> Result<(), SvgError> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None => match node {
            Node::Text(t) if t.trim().is_empty() => Ok(()),
            _ => Err(SvgError::TextOutsideRoot),
        },
    }
}

/// General entities: the five predefined ones plus internal declarations
/// from the DOCTYPE subset. External and parameter entities are ignored.
struct Entities {
    values: HashMap<String, String>,
}

impl Default for Entities {
    fn default() -> Self {
        let values = [("lt", "<"), ("gt", ">"), ("amp", "&"), ("apos", "'"), ("quot", "\"")]
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { values }
    }
}

impl Entities {
    fn resolve(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Record `<!ENTITY name "value">` declarations. The first declaration
    /// of a name wins; references inside a value are expanded against the
    /// entities known so far.
    fn declare_from(&mut self, doctype: &str) {
        for caps in ENTITY_DECL_RE.captures_iter(doctype) {
            let name = &caps[1];
            if self.values.contains_key(name) {
                continue;
            }
            let raw = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            let value = unescape_with(raw, |n| self.resolve(n))
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.values.insert(name.to_string(), value);
        }
    }
}

/// Stack of `xmlns` declarations, one frame per open element.
#[derive(Default)]
struct Scopes {
    frames: Vec<Vec<(String, String)>>,
}

impl Scopes {
    fn push(&mut self, frame: Vec<(String, String)>) {
        self.frames.push(frame);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    fn lookup(&self, prefix: &str) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    fn resolve_prefix(&self, prefix: &str) -> Result<String, SvgError> {
        if prefix == "xml" {
            return Ok(XML_NS.to_string());
        }
        match self.lookup(prefix) {
            Some(uri) if !uri.is_empty() => Ok(uri.to_string()),
            _ => Err(SvgError::UnboundPrefix(prefix.to_string())),
        }
    }

    fn default_namespace(&self) -> Option<String> {
        self.lookup("")
            .filter(|uri| !uri.is_empty())
            .map(str::to_string)
    }
}
