//! Owned element tree built from a `quick-xml` event stream.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{XmlError, XmlResult};

/// One XML element with its attributes, concatenated text content and child elements.
///
/// Namespace prefixes are kept as part of the element name; health record fragments are
/// unqualified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a document (or fragment with a single root) into an element tree.
    ///
    /// Leading declarations, comments and processing instructions are skipped. Whitespace
    /// around text content is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the input is not well formed or has no root element.
    pub fn parse(xml: &str) -> XmlResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let element = element_from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlError::Malformed("unexpected end tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|err| XmlError::Malformed(err.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    let bytes = c.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|err| XmlError::Utf8(err.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(err) => return Err(XmlError::Malformed(err.to_string())),
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::Malformed(format!(
                "element '{}' is not closed",
                open.name
            )));
        }

        root.ok_or(XmlError::Empty)
    }

    /// Build an element programmatically.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper that sets the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder-style helper that appends an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder-style helper that appends a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content of this element (not including descendants).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All direct children, in document order.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }
}

fn element_from_start(event: &BytesStart<'_>) -> XmlResult<XmlElement> {
    let name = std::str::from_utf8(event.name().as_ref())
        .map_err(|err| XmlError::Utf8(err.to_string()))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in event.attributes() {
        let attr = attr.map_err(|err| XmlError::Malformed(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| XmlError::Utf8(err.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Malformed(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> XmlResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(XmlError::Malformed(format!(
            "second root element '{}'",
            element.name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_text() {
        let xml = r#"<?xml version="1.0"?>
            <allergic-episode>
                <when><date><y>2024</y><m>3</m><d>9</d></date></when>
                <name><text>Peanut &amp; tree nut</text></name>
            </allergic-episode>"#;

        let root = XmlElement::parse(xml).expect("parse xml");
        assert_eq!(root.name(), "allergic-episode");
        let date = root
            .child("when")
            .and_then(|w| w.child("date"))
            .expect("date present");
        assert_eq!(date.child("y").map(XmlElement::text), Some("2024"));
        let name = root.child("name").and_then(|n| n.child("text"));
        assert_eq!(name.map(XmlElement::text), Some("Peanut & tree nut"));
        assert!(root.child("reaction").is_none());
    }

    #[test]
    fn reads_attributes_from_empty_elements() {
        let root = XmlElement::parse(r#"<value><display units="kg" units-code="kg"/></value>"#)
            .expect("parse xml");
        let display = root.child("display").expect("display");
        assert_eq!(display.attribute("units"), Some("kg"));
        assert_eq!(display.attribute("units-code"), Some("kg"));
        assert_eq!(display.attribute("missing"), None);
        assert_eq!(display.text(), "");
    }

    #[test]
    fn collects_repeated_children_in_order() {
        let root = XmlElement::parse("<a><s>1</s><x/><s>2</s><s>3</s></a>").expect("parse xml");
        let values: Vec<&str> = root.children_named("s").map(XmlElement::text).collect();
        assert_eq!(values, vec!["1", "2", "3"]);
        assert_eq!(root.children().len(), 4);
    }

    #[test]
    fn keeps_cdata_content() {
        let root = XmlElement::parse("<d><![CDATA[<b>bold</b>]]></d>").expect("parse xml");
        assert_eq!(root.text(), "<b>bold</b>");
    }

    #[test]
    fn rejects_empty_document() {
        let err = XmlElement::parse("   ").expect_err("no root");
        assert!(matches!(err, XmlError::Empty));
    }

    #[test]
    fn rejects_unclosed_and_mismatched_documents() {
        assert!(XmlElement::parse("<a><b></b>").is_err());
        assert!(XmlElement::parse("<a></b>").is_err());
    }

    #[test]
    fn rejects_multiple_roots() {
        let err = XmlElement::parse("<a/><b/>").expect_err("two roots");
        assert!(matches!(err, XmlError::Malformed(msg) if msg.contains("second root")));
    }

    #[test]
    fn builder_helpers_compose() {
        let element = XmlElement::new("phone")
            .with_attribute("kind", "home")
            .with_child(XmlElement::new("number").with_text("555-0100"));
        assert_eq!(element.attribute("kind"), Some("home"));
        assert_eq!(element.child("number").map(XmlElement::text), Some("555-0100"));
    }
}
