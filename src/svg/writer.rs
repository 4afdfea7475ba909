use quick_xml::escape::{escape, partial_escape};

use super::{Element, Node};

pub(super) fn to_xml(root: &Element) -> String {
    let mut out = String::new();
    write_element(root, &mut out);
    out
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape(attr.value.as_str()));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(e, out),
            Node::Text(t) => out.push_str(&partial_escape(t.as_str())),
            Node::CData(t) => {
                out.push_str("<![CDATA[");
                out.push_str(t);
                out.push_str("]]>");
            }
            Node::Comment(t) => {
                out.push_str("<!--");
                out.push_str(t);
                out.push_str("-->");
            }
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use crate::svg::parse;

    #[test]
    fn round_trip_keeps_prefixes_and_declarations() {
        let src = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><a xlink:href="/wiki/X"><text>X</text></a></svg>"#;
        let root = parse(src).unwrap();
        assert_eq!(
            root.to_xml(),
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><a xlink:href="/wiki/X"><text>X</text></a></svg>"#
        );
    }

    #[test]
    fn empty_elements_self_close() {
        let root = parse(r#"<svg><rect width="1"></rect></svg>"#).unwrap();
        assert_eq!(root.to_xml(), r#"<svg><rect width="1" /></svg>"#);
    }

    #[test]
    fn escapes_markup_in_text_and_attributes() {
        let root = parse(r#"<t a="&quot;q&quot; &amp;">1 &lt; 2 &amp; 3</t>"#).unwrap();
        let xml = root.to_xml();
        assert!(xml.contains(r#"a="&quot;q&quot; &amp;""#), "got: {xml}");
        assert!(xml.contains("1 &lt; 2 &amp; 3"), "got: {xml}");
    }

    #[test]
    fn writes_comments_and_cdata() {
        let root = parse("<s><!-- c --><![CDATA[x<y]]></s>").unwrap();
        assert_eq!(root.to_xml(), "<s><!-- c --><![CDATA[x<y]]></s>");
    }

    #[test]
    fn reparses_its_own_output() {
        let src = "<svg xml:lang=\"en\">\n  <g systemLanguage=\"fr\"><text>caf\u{e9}</text></g>\n</svg>";
        let root = parse(src).unwrap();
        assert_eq!(parse(&root.to_xml()).unwrap(), root);
    }
}
