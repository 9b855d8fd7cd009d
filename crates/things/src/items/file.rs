use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::CodableValue;
use crate::node::{
    locate, parse_optional, require, required_text, required_value, validate_each,
    write_optional, write_text, write_value, ThingType, XmlNode,
};
use crate::{validation, ThingResult};

/// Metadata for an attached document. The content itself travels separately.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct File {
    name: Option<String>,
    size: u64,
    content_type: Option<CodableValue>,
}

impl File {
    pub fn new(name: &str, size: u64) -> ThingResult<Self> {
        Ok(Self {
            name: Some(validation::text("name", name)?),
            size,
            content_type: None,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: &str) -> ThingResult<()> {
        self.name = Some(validation::text("name", name)?);
        Ok(())
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    /// MIME type, e.g. `application/pdf`.
    pub fn content_type(&self) -> Option<&CodableValue> {
        self.content_type.as_ref()
    }

    pub fn set_content_type(&mut self, content_type: Option<CodableValue>) {
        self.content_type = content_type;
    }
}

impl XmlNode for File {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            name: Some(required_text(node, "name")?),
            size: required_value(node, "size")?,
            content_type: parse_optional(node, "content-type")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.name, Self::TYPE_NAME, "name")?;
        validate_each(&self.content_type)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let file_name = require(&self.name, Self::TYPE_NAME, "name")?;

        writer.start_element(name)?;
        write_text(writer, "name", file_name)?;
        write_value(writer, "size", self.size)?;
        write_optional(writer, "content-type", self.content_type.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for File {
    const ELEMENT: &'static str = "file";
    const TYPE_NAME: &'static str = "File";
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name.as_deref().unwrap_or_default(), self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThingError;

    #[test]
    fn round_trips_with_content_type() {
        let mut file = File::new("discharge-summary.pdf", 48_213).expect("file");
        file.set_content_type(Some(CodableValue::new("application/pdf").expect("mime")));
        let xml = file.to_xml().expect("write");
        assert!(xml.starts_with("<file><name>discharge-summary.pdf</name><size>48213</size>"));
        assert_eq!(File::from_xml(&xml).expect("parse"), file);
        assert_eq!(file.to_string(), "discharge-summary.pdf (48213 bytes)");
    }

    #[test]
    fn negative_size_fails_to_parse() {
        let err = File::from_xml("<file><name>a.txt</name><size>-1</size></file>").expect_err("negative");
        assert!(matches!(err, ThingError::InvalidValue { element, .. } if element == "size"));
    }

    #[test]
    fn name_is_mandatory() {
        assert!(File::new("  ", 0).is_err());
        assert!(File::default().to_xml().expect_err("no name").is_serialization());
    }
}
