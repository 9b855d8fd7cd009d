//! Codable values: display text with zero or more vocabulary codes.

use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::CodedValue;
use crate::node::{
    parse_all, require, required_text, validate_each, write_all, write_text, XmlNode,
};
use crate::{validation, ThingResult};

/// Free text optionally backed by codes from controlled vocabularies.
///
/// ```xml
/// <name>
///   <text>Peanut</text>
///   <code><value>91935009</value><type>snomed</type></code>
/// </name>
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodableValue {
    text: Option<String>,
    codes: Vec<CodedValue>,
}

impl CodableValue {
    const NODE: &'static str = "CodableValue";

    /// Create a codable value with display text and no codes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingError::InvalidArgument`] if `text` is blank.
    pub fn new(text: &str) -> ThingResult<Self> {
        Ok(Self {
            text: Some(validation::text("text", text)?),
            codes: Vec::new(),
        })
    }

    /// Create a codable value with display text and a single code.
    pub fn with_code(text: &str, code: CodedValue) -> ThingResult<Self> {
        let mut value = Self::new(text)?;
        value.codes.push(code);
        Ok(value)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: &str) -> ThingResult<()> {
        self.text = Some(validation::text("text", text)?);
        Ok(())
    }

    pub fn codes(&self) -> &[CodedValue] {
        &self.codes
    }

    pub fn add_code(&mut self, code: CodedValue) {
        self.codes.push(code);
    }

    pub fn clear_codes(&mut self) {
        self.codes.clear();
    }
}

impl XmlNode for CodableValue {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            text: Some(required_text(node, "text")?),
            codes: parse_all(node, "code")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.text, Self::NODE, "text")?;
        validate_each(&self.codes)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let text = require(&self.text, Self::NODE, "text")?;

        writer.start_element(name)?;
        write_text(writer, "text", text)?;
        write_all(writer, "code", &self.codes)?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for CodableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.text, self.codes.first()) {
            (Some(text), _) => f.write_str(text),
            (None, Some(code)) => write!(f, "{code}"),
            (None, None) => Ok(()),
        }
    }
}
