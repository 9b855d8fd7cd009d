//! Postal addresses, telephone numbers and email addresses.

use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::node::{
    optional_bool, optional_text, parse_all, require, required_text, validate_each, write_all,
    write_optional_text, write_optional_value, write_text, XmlNode,
};
use crate::{validation, ThingError, ThingResult};

/// A postal address.
///
/// At least one street line plus city, postcode and country are mandatory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Address {
    description: Option<String>,
    is_primary: Option<bool>,
    streets: Vec<String>,
    city: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
    county: Option<String>,
}

impl Address {
    const NODE: &'static str = "Address";

    pub fn new(street: &str, city: &str, postcode: &str, country: &str) -> ThingResult<Self> {
        let mut address = Self::default();
        address.add_street(street)?;
        address.set_city(city)?;
        address.set_postcode(postcode)?;
        address.set_country(country)?;
        Ok(address)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<&str>) -> ThingResult<()> {
        self.description = validation::optional_text("description", description)?;
        Ok(())
    }

    pub fn is_primary(&self) -> Option<bool> {
        self.is_primary
    }

    pub fn set_is_primary(&mut self, is_primary: Option<bool>) {
        self.is_primary = is_primary;
    }

    pub fn streets(&self) -> &[String] {
        &self.streets
    }

    pub fn add_street(&mut self, street: &str) -> ThingResult<()> {
        self.streets.push(validation::text("street", street)?);
        Ok(())
    }

    pub fn clear_streets(&mut self) {
        self.streets.clear();
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn set_city(&mut self, city: &str) -> ThingResult<()> {
        self.city = Some(validation::text("city", city)?);
        Ok(())
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn set_state(&mut self, state: Option<&str>) -> ThingResult<()> {
        self.state = validation::optional_text("state", state)?;
        Ok(())
    }

    pub fn postcode(&self) -> Option<&str> {
        self.postcode.as_deref()
    }

    pub fn set_postcode(&mut self, postcode: &str) -> ThingResult<()> {
        self.postcode = Some(validation::text("postcode", postcode)?);
        Ok(())
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn set_country(&mut self, country: &str) -> ThingResult<()> {
        self.country = Some(validation::text("country", country)?);
        Ok(())
    }

    pub fn county(&self) -> Option<&str> {
        self.county.as_deref()
    }

    pub fn set_county(&mut self, county: Option<&str>) -> ThingResult<()> {
        self.county = validation::optional_text("county", county)?;
        Ok(())
    }
}

impl XmlNode for Address {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let streets: Vec<String> = node
            .children_named("street")
            .map(|street| street.text().to_string())
            .collect();
        if streets.is_empty() {
            return Err(ThingError::MissingElement {
                parent: node.name().to_string(),
                element: "street".into(),
            });
        }

        Ok(Self {
            description: optional_text(node, "description"),
            is_primary: optional_bool(node, "is-primary")?,
            streets,
            city: Some(required_text(node, "city")?),
            state: optional_text(node, "state"),
            postcode: Some(required_text(node, "postcode")?),
            country: Some(required_text(node, "country")?),
            county: optional_text(node, "county"),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        if self.streets.is_empty() {
            return Err(ThingError::serialization(
                Self::NODE,
                "at least one street must be set",
            ));
        }
        require(&self.city, Self::NODE, "city")?;
        require(&self.postcode, Self::NODE, "postcode")?;
        require(&self.country, Self::NODE, "country")?;
        Ok(())
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let city = require(&self.city, Self::NODE, "city")?;
        let postcode = require(&self.postcode, Self::NODE, "postcode")?;
        let country = require(&self.country, Self::NODE, "country")?;

        writer.start_element(name)?;
        write_optional_text(writer, "description", self.description.as_deref())?;
        write_optional_value(writer, "is-primary", self.is_primary)?;
        for street in &self.streets {
            write_text(writer, "street", street)?;
        }
        write_text(writer, "city", city)?;
        write_optional_text(writer, "state", self.state.as_deref())?;
        write_text(writer, "postcode", postcode)?;
        write_text(writer, "country", country)?;
        write_optional_text(writer, "county", self.county.as_deref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.streets.clone();
        if let Some(city) = &self.city {
            parts.push(city.clone());
        }
        match (&self.state, &self.postcode) {
            (Some(state), Some(postcode)) => parts.push(format!("{state} {postcode}")),
            (Some(state), None) => parts.push(state.clone()),
            (None, Some(postcode)) => parts.push(postcode.clone()),
            (None, None) => {}
        }
        if let Some(country) = &self.country {
            parts.push(country.clone());
        }
        f.write_str(&parts.join(", "))
    }
}

/// A telephone number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Phone {
    description: Option<String>,
    is_primary: Option<bool>,
    number: Option<String>,
}

impl Phone {
    const NODE: &'static str = "Phone";

    pub fn new(number: &str) -> ThingResult<Self> {
        Ok(Self {
            number: Some(validation::text("number", number)?),
            ..Self::default()
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<&str>) -> ThingResult<()> {
        self.description = validation::optional_text("description", description)?;
        Ok(())
    }

    pub fn is_primary(&self) -> Option<bool> {
        self.is_primary
    }

    pub fn set_is_primary(&mut self, is_primary: Option<bool>) {
        self.is_primary = is_primary;
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn set_number(&mut self, number: &str) -> ThingResult<()> {
        self.number = Some(validation::text("number", number)?);
        Ok(())
    }
}

impl XmlNode for Phone {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            description: optional_text(node, "description"),
            is_primary: optional_bool(node, "is-primary")?,
            number: Some(required_text(node, "number")?),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.number, Self::NODE, "number").map(|_| ())
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        let number = require(&self.number, Self::NODE, "number")?;

        writer.start_element(name)?;
        write_optional_text(writer, "description", self.description.as_deref())?;
        write_optional_value(writer, "is-primary", self.is_primary)?;
        write_text(writer, "number", number)?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.number, &self.description) {
            (Some(number), Some(description)) => write!(f, "{number} ({description})"),
            (Some(number), None) => f.write_str(number),
            (None, _) => Ok(()),
        }
    }
}

/// An email address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Email {
    description: Option<String>,
    is_primary: Option<bool>,
    address: Option<String>,
}

impl Email {
    const NODE: &'static str = "Email";

    pub fn new(address: &str) -> ThingResult<Self> {
        Ok(Self {
            address: Some(validation::text("address", address)?),
            ..Self::default()
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<&str>) -> ThingResult<()> {
        self.description = validation::optional_text("description", description)?;
        Ok(())
    }

    pub fn is_primary(&self) -> Option<bool> {
        self.is_primary
    }

    pub fn set_is_primary(&mut self, is_primary: Option<bool>) {
        self.is_primary = is_primary;
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn set_address(&mut self, address: &str) -> ThingResult<()> {
        self.address = Some(validation::text("address", address)?);
        Ok(())
    }
}

impl XmlNode for Email {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            description: optional_text(node, "description"),
            is_primary: optional_bool(node, "is-primary")?,
            address: Some(required_text(node, "address")?),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.address, Self::NODE, "address").map(|_| ())
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        let address = require(&self.address, Self::NODE, "address")?;

        writer.start_element(name)?;
        write_optional_text(writer, "description", self.description.as_deref())?;
        write_optional_value(writer, "is-primary", self.is_primary)?;
        write_text(writer, "address", address)?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.address.as_deref().unwrap_or_default())
    }
}

/// Addresses, phone numbers and email addresses for one person or organisation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactInfo {
    addresses: Vec<Address>,
    phones: Vec<Phone>,
    emails: Vec<Email>,
}

impl ContactInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn add_address(&mut self, address: Address) {
        self.addresses.push(address);
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn add_phone(&mut self, phone: Phone) {
        self.phones.push(phone);
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn add_email(&mut self, email: Email) {
        self.emails.push(email);
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.phones.is_empty() && self.emails.is_empty()
    }

    /// The email flagged primary, or the first one.
    pub fn primary_email(&self) -> Option<&Email> {
        self.emails
            .iter()
            .find(|e| e.is_primary == Some(true))
            .or_else(|| self.emails.first())
    }

    /// The phone flagged primary, or the first one.
    pub fn primary_phone(&self) -> Option<&Phone> {
        self.phones
            .iter()
            .find(|p| p.is_primary == Some(true))
            .or_else(|| self.phones.first())
    }

    /// The address flagged primary, or the first one.
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_primary == Some(true))
            .or_else(|| self.addresses.first())
    }
}

impl XmlNode for ContactInfo {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            addresses: parse_all(node, "address")?,
            phones: parse_all(node, "phone")?,
            emails: parse_all(node, "email")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        validate_each(&self.addresses)?;
        validate_each(&self.phones)?;
        validate_each(&self.emails)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        write_all(writer, "address", &self.addresses)?;
        write_all(writer, "phone", &self.phones)?;
        write_all(writer, "email", &self.emails)?;
        writer.end_element()?;
        Ok(())
    }
}

/// Primary email, then primary phone, then primary address.
impl fmt::Display for ContactInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(email) = self.primary_email() {
            write!(f, "{email}")
        } else if let Some(phone) = self.primary_phone() {
            write!(f, "{phone}")
        } else if let Some(address) = self.primary_address() {
            write!(f, "{address}")
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_contact() -> ContactInfo {
        let mut address =
            Address::new("1 Main Street", "Springfield", "12345", "USA").expect("address");
        address.add_street("Apartment 4").expect("street");
        address.set_state(Some("IL")).expect("state");
        address.set_is_primary(Some(true));

        let mut phone = Phone::new("555-0100").expect("phone");
        phone.set_description(Some("home")).expect("description");

        let mut work = Email::new("work@example.com").expect("email");
        work.set_is_primary(Some(false));
        let mut home = Email::new("home@example.com").expect("email");
        home.set_is_primary(Some(true));

        let mut contact = ContactInfo::new();
        contact.add_address(address);
        contact.add_phone(phone);
        contact.add_email(work);
        contact.add_email(home);
        contact
    }

    fn write<T: XmlNode>(value: &T, name: &str) -> ThingResult<String> {
        let mut writer = XmlWriter::new();
        value.write_xml(name, &mut writer)?;
        Ok(writer.into_string()?)
    }

    #[test]
    fn contact_round_trips() {
        let contact = sample_contact();
        let xml = write(&contact, "contact").expect("write");
        let parsed = ContactInfo::parse_xml(&XmlElement::parse(&xml).expect("xml")).expect("parse");
        assert_eq!(parsed, contact);
        assert_eq!(parsed.addresses()[0].streets().len(), 2);
    }

    #[test]
    fn address_children_follow_schema_order() {
        let address = Address::new("1 Main Street", "Springfield", "12345", "USA").expect("address");
        let xml = write(&address, "address").expect("write");
        assert_eq!(
            xml,
            "<address><street>1 Main Street</street><city>Springfield</city><postcode>12345</postcode><country>USA</country></address>"
        );
    }

    #[test]
    fn address_requires_a_street() {
        let mut address = Address::new("x", "Springfield", "12345", "USA").expect("address");
        address.clear_streets();
        let err = write(&address, "address").expect_err("no street");
        assert!(err.is_serialization());

        let node = XmlElement::parse(
            "<address><city>a</city><postcode>b</postcode><country>c</country></address>",
        )
        .expect("xml");
        assert!(matches!(
            Address::parse_xml(&node),
            Err(ThingError::MissingElement { .. })
        ));
    }

    #[test]
    fn summaries_prefer_primary_entries() {
        let contact = sample_contact();
        assert_eq!(contact.to_string(), "home@example.com");
        assert_eq!(
            contact.primary_address().map(ToString::to_string).as_deref(),
            Some("1 Main Street, Apartment 4, Springfield, IL 12345, USA")
        );
        assert_eq!(contact.primary_phone().map(ToString::to_string).as_deref(), Some("555-0100 (home)"));
    }

    #[test]
    fn mandatory_fields_are_checked_on_write() {
        assert!(write(&Phone::default(), "phone").expect_err("no number").is_serialization());
        assert!(write(&Email::default(), "email").expect_err("no address").is_serialization());
        let mut address = Address::default();
        address.add_street("1 Main Street").expect("street");
        let err = write(&address, "address").expect_err("no city");
        assert!(matches!(err, ThingError::Serialization { reason, .. } if reason.contains("city")));
    }

    #[test]
    fn incomplete_entry_leaves_writer_untouched() {
        let mut contact = sample_contact();
        contact.add_phone(Phone::default());

        let mut writer = XmlWriter::new();
        writer.start_element("person").expect("outer");
        let err = contact.write_xml("contact", &mut writer).expect_err("no number");
        assert!(matches!(err, ThingError::Serialization { node: "Phone", .. }));
        assert_eq!(writer.depth(), 1);
        writer.end_element().expect("outer end");
        assert_eq!(writer.into_string().expect("finish"), "<person></person>");
    }

    #[test]
    fn is_primary_accepts_numeric_booleans() {
        let node = XmlElement::parse("<phone><is-primary>1</is-primary><number>1</number></phone>")
            .expect("xml");
        let phone = Phone::parse_xml(&node).expect("parse");
        assert_eq!(phone.is_primary(), Some(true));
    }

    #[test]
    fn empty_contact_info_writes_empty_element() {
        let contact = ContactInfo::new();
        assert!(contact.is_empty());
        assert_eq!(write(&contact, "contact").expect("write"), "<contact></contact>");
        assert_eq!(contact.to_string(), "");
    }
}
