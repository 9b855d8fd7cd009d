//! Coded values: a code drawn from a controlled vocabulary.
//!
//! A coded value is the tuple (value, family, vocabulary name, version). On the wire the
//! vocabulary name is carried in the `type` element:
//!
//! ```xml
//! <code>
//!   <value>J45</value>
//!   <family>wc</family>
//!   <type>icd10</type>
//!   <version>2019</version>
//! </code>
//! ```

use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::node::{
    optional_text, require, required_text, write_optional_text, write_text, XmlNode,
};
use crate::{validation, ThingResult};

/// Identifies a vocabulary by name, optionally narrowed by family and version.
///
/// This is the shorthand the vocabulary lookup service hands out; it can be turned into a
/// [`CodedValue`] with [`CodedValue::from_vocabulary_key`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocabularyKey {
    name: String,
    family: Option<String>,
    version: Option<String>,
}

impl VocabularyKey {
    pub fn new(name: &str) -> ThingResult<Self> {
        Ok(Self {
            name: validation::text("name", name)?,
            family: None,
            version: None,
        })
    }

    pub fn with_family(mut self, family: &str) -> ThingResult<Self> {
        self.family = Some(validation::text("family", family)?);
        Ok(self)
    }

    pub fn with_version(mut self, version: &str) -> ThingResult<Self> {
        self.version = Some(validation::text("version", version)?);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// A single code from a controlled vocabulary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodedValue {
    value: Option<String>,
    family: Option<String>,
    vocabulary_name: Option<String>,
    version: Option<String>,
}

impl CodedValue {
    const NODE: &'static str = "CodedValue";

    /// Create a coded value from its code and vocabulary name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ThingError::InvalidArgument`] if either argument is blank.
    pub fn new(value: &str, vocabulary_name: &str) -> ThingResult<Self> {
        Ok(Self {
            value: Some(validation::text("value", value)?),
            family: None,
            vocabulary_name: Some(validation::text("vocabulary_name", vocabulary_name)?),
            version: None,
        })
    }

    /// Create a coded value with every component of the tuple.
    pub fn with_family_and_version(
        value: &str,
        vocabulary_name: &str,
        family: &str,
        version: &str,
    ) -> ThingResult<Self> {
        let mut coded = Self::new(value, vocabulary_name)?;
        coded.set_family(Some(family))?;
        coded.set_version(Some(version))?;
        Ok(coded)
    }

    /// Create a coded value for `value` in the vocabulary identified by `key`.
    pub fn from_vocabulary_key(value: &str, key: &VocabularyKey) -> ThingResult<Self> {
        Ok(Self {
            value: Some(validation::text("value", value)?),
            family: key.family.clone(),
            vocabulary_name: Some(key.name.clone()),
            version: key.version.clone(),
        })
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: &str) -> ThingResult<()> {
        self.value = Some(validation::text("value", value)?);
        Ok(())
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn set_family(&mut self, family: Option<&str>) -> ThingResult<()> {
        self.family = validation::optional_text("family", family)?;
        Ok(())
    }

    pub fn vocabulary_name(&self) -> Option<&str> {
        self.vocabulary_name.as_deref()
    }

    pub fn set_vocabulary_name(&mut self, vocabulary_name: &str) -> ThingResult<()> {
        self.vocabulary_name = Some(validation::text("vocabulary_name", vocabulary_name)?);
        Ok(())
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn set_version(&mut self, version: Option<&str>) -> ThingResult<()> {
        self.version = validation::optional_text("version", version)?;
        Ok(())
    }
}

impl XmlNode for CodedValue {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            value: Some(required_text(node, "value")?),
            family: optional_text(node, "family"),
            vocabulary_name: Some(required_text(node, "type")?),
            version: optional_text(node, "version"),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.value, Self::NODE, "value")?;
        require(&self.vocabulary_name, Self::NODE, "vocabulary_name")?;
        Ok(())
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let value = require(&self.value, Self::NODE, "value")?;
        let vocabulary_name = require(&self.vocabulary_name, Self::NODE, "vocabulary_name")?;

        writer.start_element(name)?;
        write_text(writer, "value", value)?;
        write_optional_text(writer, "family", self.family.as_deref())?;
        write_text(writer, "type", vocabulary_name)?;
        write_optional_text(writer, "version", self.version.as_deref())?;
        writer.end_element()?;
        Ok(())
    }
}

/// `[family:]vocabulary:value[:version]`, skipping unset segments.
impl fmt::Display for CodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = [
            self.family.as_deref(),
            self.vocabulary_name.as_deref(),
            self.value.as_deref(),
            self.version.as_deref(),
        ];
        let mut first = true;
        for segment in segments.into_iter().flatten() {
            if !first {
                f.write_str(":")?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}
