//! Streaming XML writer over `quick-xml`.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::{XmlError, XmlResult};

/// Streaming writer positioned to accept new elements.
///
/// The writer tracks open elements so that [`XmlWriter::end_element`] needs no name and an
/// unbalanced document is caught when the output is taken.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
    open: Vec<String>,
}

impl XmlWriter {
    /// Create a writer producing compact output.
    pub fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
            open: Vec::new(),
        }
    }

    /// Create a writer that indents nested elements by `indent` spaces.
    pub fn with_indent(indent: usize) -> Self {
        let inner = if indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        };
        Self {
            inner,
            open: Vec::new(),
        }
    }

    pub fn start_element(&mut self, name: &str) -> XmlResult<()> {
        self.write(Event::Start(BytesStart::new(name)))?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// Start an element carrying attributes, written in the given order.
    pub fn start_element_with_attributes(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> XmlResult<()> {
        let mut start = BytesStart::new(name);
        for (key, value) in attributes {
            start.push_attribute((*key, *value));
        }
        self.write(Event::Start(start))?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// Write text content into the currently open element. Markup characters are escaped.
    pub fn text(&mut self, text: &str) -> XmlResult<()> {
        self.write(Event::Text(BytesText::new(text)))
    }

    /// Close the most recently opened element.
    pub fn end_element(&mut self) -> XmlResult<()> {
        let name = self.open.pop().ok_or(XmlError::UnbalancedEnd)?;
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Write `<name>text</name>`.
    pub fn element_with_text(&mut self, name: &str, text: &str) -> XmlResult<()> {
        self.start_element(name)?;
        self.text(text)?;
        self.end_element()
    }

    /// Number of elements currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Finish writing and return the document text.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Write`] if elements are still open.
    pub fn into_string(self) -> XmlResult<String> {
        if let Some(name) = self.open.last() {
            return Err(XmlError::Write(format!("element '{name}' is still open")));
        }
        String::from_utf8(self.inner.into_inner()).map_err(|err| XmlError::Utf8(err.to_string()))
    }

    fn write(&mut self, event: Event<'_>) -> XmlResult<()> {
        self.inner
            .write_event(event)
            .map_err(|err| XmlError::Write(err.to_string()))
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}
