//! People: names and person records (providers, care team members).

use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{CodableValue, ContactInfo};
use crate::node::{
    optional_text, parse_optional, parse_required, require, required_text, validate_each,
    write_optional, write_optional_text, write_text, XmlNode,
};
use crate::{validation, ThingResult};

/// A person's name, with the full form mandatory and the parts optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Name {
    full: Option<String>,
    title: Option<CodableValue>,
    first: Option<String>,
    middle: Option<String>,
    last: Option<String>,
    suffix: Option<CodableValue>,
}

impl Name {
    const NODE: &'static str = "Name";

    pub fn new(full: &str) -> ThingResult<Self> {
        Ok(Self {
            full: Some(validation::text("full", full)?),
            ..Self::default()
        })
    }

    /// Build a name from first and last parts; the full name is "first last".
    pub fn from_parts(first: &str, last: &str) -> ThingResult<Self> {
        let first = validation::text("first", first)?;
        let last = validation::text("last", last)?;
        Ok(Self {
            full: Some(format!("{first} {last}")),
            first: Some(first),
            last: Some(last),
            ..Self::default()
        })
    }

    pub fn full(&self) -> Option<&str> {
        self.full.as_deref()
    }

    pub fn set_full(&mut self, full: &str) -> ThingResult<()> {
        self.full = Some(validation::text("full", full)?);
        Ok(())
    }

    pub fn title(&self) -> Option<&CodableValue> {
        self.title.as_ref()
    }

    pub fn set_title(&mut self, title: Option<CodableValue>) {
        self.title = title;
    }

    pub fn first(&self) -> Option<&str> {
        self.first.as_deref()
    }

    pub fn set_first(&mut self, first: Option<&str>) -> ThingResult<()> {
        self.first = validation::optional_text("first", first)?;
        Ok(())
    }

    pub fn middle(&self) -> Option<&str> {
        self.middle.as_deref()
    }

    pub fn set_middle(&mut self, middle: Option<&str>) -> ThingResult<()> {
        self.middle = validation::optional_text("middle", middle)?;
        Ok(())
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn set_last(&mut self, last: Option<&str>) -> ThingResult<()> {
        self.last = validation::optional_text("last", last)?;
        Ok(())
    }

    pub fn suffix(&self) -> Option<&CodableValue> {
        self.suffix.as_ref()
    }

    pub fn set_suffix(&mut self, suffix: Option<CodableValue>) {
        self.suffix = suffix;
    }
}

impl XmlNode for Name {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            full: Some(required_text(node, "full")?),
            title: parse_optional(node, "title")?,
            first: optional_text(node, "first"),
            middle: optional_text(node, "middle"),
            last: optional_text(node, "last"),
            suffix: parse_optional(node, "suffix")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.full, Self::NODE, "full")?;
        validate_each(&self.title)?;
        validate_each(&self.suffix)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let full = require(&self.full, Self::NODE, "full")?;

        writer.start_element(name)?;
        write_text(writer, "full", full)?;
        write_optional(writer, "title", self.title.as_ref())?;
        write_optional_text(writer, "first", self.first.as_deref())?;
        write_optional_text(writer, "middle", self.middle.as_deref())?;
        write_optional_text(writer, "last", self.last.as_deref())?;
        write_optional(writer, "suffix", self.suffix.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full.as_deref().unwrap_or_default())
    }
}

/// A person involved in the record: a provider, emergency contact or care team member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersonItem {
    name: Option<Name>,
    organization: Option<String>,
    professional_training: Option<String>,
    id: Option<String>,
    contact: Option<ContactInfo>,
    person_type: Option<CodableValue>,
}

impl PersonItem {
    const NODE: &'static str = "PersonItem";

    pub fn new(name: Name) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn set_name(&mut self, name: Name) {
        self.name = Some(name);
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn set_organization(&mut self, organization: Option<&str>) -> ThingResult<()> {
        self.organization = validation::optional_text("organization", organization)?;
        Ok(())
    }

    pub fn professional_training(&self) -> Option<&str> {
        self.professional_training.as_deref()
    }

    pub fn set_professional_training(&mut self, training: Option<&str>) -> ThingResult<()> {
        self.professional_training = validation::optional_text("professional_training", training)?;
        Ok(())
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<&str>) -> ThingResult<()> {
        self.id = validation::optional_text("id", id)?;
        Ok(())
    }

    pub fn contact(&self) -> Option<&ContactInfo> {
        self.contact.as_ref()
    }

    pub fn set_contact(&mut self, contact: Option<ContactInfo>) {
        self.contact = contact;
    }

    pub fn person_type(&self) -> Option<&CodableValue> {
        self.person_type.as_ref()
    }

    pub fn set_person_type(&mut self, person_type: Option<CodableValue>) {
        self.person_type = person_type;
    }
}

impl XmlNode for PersonItem {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            name: Some(parse_required(node, "name")?),
            organization: optional_text(node, "organization"),
            professional_training: optional_text(node, "professional-training"),
            id: optional_text(node, "id"),
            contact: parse_optional(node, "contact")?,
            person_type: parse_optional(node, "type")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.name, Self::NODE, "name")?.validate()?;
        validate_each(&self.contact)?;
        validate_each(&self.person_type)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let person_name = require(&self.name, Self::NODE, "name")?;

        writer.start_element(name)?;
        person_name.write_xml("name", writer)?;
        write_optional_text(writer, "organization", self.organization.as_deref())?;
        write_optional_text(
            writer,
            "professional-training",
            self.professional_training.as_deref(),
        )?;
        write_optional_text(writer, "id", self.id.as_deref())?;
        write_optional(writer, "contact", self.contact.as_ref())?;
        write_optional(writer, "type", self.person_type.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

/// "Name" or "Name (Organization)".
impl fmt::Display for PersonItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_ref().map(ToString::to_string).unwrap_or_default();
        match &self.organization {
            Some(organization) => write!(f, "{name} ({organization})"),
            None => f.write_str(&name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Phone;

    fn write<T: XmlNode>(value: &T, name: &str) -> ThingResult<String> {
        let mut writer = XmlWriter::new();
        value.write_xml(name, &mut writer)?;
        Ok(writer.into_string()?)
    }

    #[test]
    fn name_from_parts_builds_full_name() {
        let name = Name::from_parts("Ada", "Lovelace").expect("name");
        assert_eq!(name.full(), Some("Ada Lovelace"));
        assert_eq!(
            write(&name, "name").expect("write"),
            "<name><full>Ada Lovelace</full><first>Ada</first><last>Lovelace</last></name>"
        );
    }

    #[test]
    fn person_round_trips_with_contact() {
        let mut person = PersonItem::new(Name::new("Dr. Gregory House").expect("name"));
        person.set_organization(Some("Princeton-Plainsboro")).expect("org");
        person.set_professional_training(Some("MD")).expect("training");
        let mut contact = ContactInfo::new();
        contact.add_phone(Phone::new("555-0199").expect("phone"));
        person.set_contact(Some(contact));
        person.set_person_type(Some(CodableValue::new("Provider").expect("type")));

        let xml = write(&person, "person").expect("write");
        let parsed = PersonItem::parse_xml(&XmlElement::parse(&xml).expect("xml")).expect("parse");
        assert_eq!(parsed, person);
        assert_eq!(parsed.to_string(), "Dr. Gregory House (Princeton-Plainsboro)");
    }

    #[test]
    fn person_requires_name() {
        let err = write(&PersonItem::default(), "person").expect_err("no name");
        assert!(err.is_serialization());
        assert!(Name::new(" ").is_err());
    }

    #[test]
    fn unnamed_name_fails_before_person_is_opened() {
        let person = PersonItem::new(Name::default());
        let mut writer = XmlWriter::new();
        let err = person.write_xml("person", &mut writer).expect_err("no full name");
        assert!(matches!(err, crate::ThingError::Serialization { node: "Name", .. }));
        assert_eq!(writer.depth(), 0);
        assert_eq!(writer.into_string().expect("finish"), "");
    }
}
