use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::ContactInfo;
use crate::node::{locate, parse_required, ThingType, XmlNode};
use crate::ThingResult;

/// The person's own contact details.
///
/// The root element and the inner contact block share the name `contact`:
/// `<contact><contact><phone>..</phone></contact></contact>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    contact: ContactInfo,
}

impl Contact {
    pub fn new(contact: ContactInfo) -> Self {
        Self { contact }
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactInfo {
        &mut self.contact
    }

    pub fn set_contact(&mut self, contact: ContactInfo) {
        self.contact = contact;
    }
}

impl XmlNode for Contact {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        // The inner block shares the root name; descend only into a nested wrapper.
        let node = match node.child(Self::ELEMENT) {
            Some(inner) if inner.child(Self::ELEMENT).is_some() => inner,
            Some(_) => node,
            None => locate(node, Self::ELEMENT)?,
        };
        Ok(Self {
            contact: parse_required(node, "contact")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        self.contact.validate()
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        self.contact.write_xml("contact", writer)?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for Contact {
    const ELEMENT: &'static str = "contact";
    const TYPE_NAME: &'static str = "Contact";
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{Email, Phone};

    fn sample() -> Contact {
        let mut info = ContactInfo::new();
        info.add_phone(Phone::new("555-0100").expect("phone"));
        info.add_email(Email::new("pat@example.com").expect("email"));
        Contact::new(info)
    }

    #[test]
    fn round_trips_through_nested_contact_element() {
        let contact = sample();
        let xml = contact.to_xml().expect("write");
        assert!(xml.starts_with("<contact><contact>"));
        assert_eq!(Contact::from_xml(&xml).expect("parse"), contact);
    }

    #[test]
    fn parses_from_data_wrapper() {
        let xml = format!("<data-xml>{}</data-xml>", sample().to_xml().expect("write"));
        assert_eq!(Contact::from_xml(&xml).expect("parse"), sample());
    }

    #[test]
    fn summary_prefers_email() {
        assert_eq!(sample().to_string(), "pat@example.com");
    }

    #[test]
    fn empty_contact_is_writable() {
        let xml = Contact::default().to_xml().expect("write");
        assert_eq!(xml, "<contact><contact></contact></contact>");
    }
}
