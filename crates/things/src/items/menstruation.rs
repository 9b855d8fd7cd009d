use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{CodableValue, HealthServiceDateTime};
use crate::node::{
    locate, optional_bool, parse_optional, parse_required, validate_each, write_optional,
    write_optional_value, ThingType, XmlNode,
};
use crate::ThingResult;

/// A single day of menstrual flow.
///
/// Every field but `when` is optional and `when` defaults to the current time, so a default
/// value is always writable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Menstruation {
    when: HealthServiceDateTime,
    is_new_cycle: Option<bool>,
    amount: Option<CodableValue>,
}

impl Menstruation {
    pub fn new(when: HealthServiceDateTime) -> Self {
        Self {
            when,
            ..Self::default()
        }
    }

    pub fn when(&self) -> &HealthServiceDateTime {
        &self.when
    }

    pub fn set_when(&mut self, when: HealthServiceDateTime) {
        self.when = when;
    }

    /// Whether this day starts a new cycle.
    pub fn is_new_cycle(&self) -> Option<bool> {
        self.is_new_cycle
    }

    pub fn set_is_new_cycle(&mut self, is_new_cycle: Option<bool>) {
        self.is_new_cycle = is_new_cycle;
    }

    /// Amount of discharge, e.g. "light" or "heavy".
    pub fn amount(&self) -> Option<&CodableValue> {
        self.amount.as_ref()
    }

    pub fn set_amount(&mut self, amount: Option<CodableValue>) {
        self.amount = amount;
    }
}

impl XmlNode for Menstruation {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            when: parse_required(node, "when")?,
            is_new_cycle: optional_bool(node, "is-new-cycle")?,
            amount: parse_optional(node, "amount")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        self.when.validate()?;
        validate_each(&self.amount)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        self.when.write_xml("when", writer)?;
        write_optional_value(writer, "is-new-cycle", self.is_new_cycle)?;
        write_optional(writer, "amount", self.amount.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for Menstruation {
    const ELEMENT: &'static str = "menstruation";
    const TYPE_NAME: &'static str = "Menstruation";
}

impl fmt::Display for Menstruation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.amount, self.is_new_cycle) {
            (Some(amount), Some(true)) => write!(f, "{amount} (new cycle)"),
            (Some(amount), _) => write!(f, "{amount}"),
            (None, Some(true)) => f.write_str("New cycle"),
            (None, _) => write!(f, "{}", self.when),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::HealthServiceDate;

    #[test]
    fn default_writes_only_when() {
        let menstruation = Menstruation::default();
        assert_eq!(menstruation.is_new_cycle(), None);
        assert!(menstruation.amount().is_none());

        let xml = menstruation.to_xml().expect("default is writable");
        let root = XmlElement::parse(&xml).expect("xml");
        let names: Vec<&str> = root.children().iter().map(XmlElement::name).collect();
        assert_eq!(names, ["when"]);
    }

    #[test]
    fn round_trips_with_optional_fields() {
        let mut menstruation = Menstruation::new(HealthServiceDateTime::new(
            HealthServiceDate::new(2023, 11, 2).expect("date"),
        ));
        menstruation.set_is_new_cycle(Some(true));
        menstruation.set_amount(Some(CodableValue::new("light").expect("amount")));

        let xml = menstruation.to_xml().expect("write");
        assert_eq!(Menstruation::from_xml(&xml).expect("parse"), menstruation);
        assert_eq!(menstruation.to_string(), "light (new cycle)");
    }

    #[test]
    fn rejects_bad_boolean() {
        let xml = "<menstruation><when><date><y>2023</y><m>1</m><d>1</d></date></when>\
                   <is-new-cycle>maybe</is-new-cycle></menstruation>";
        assert!(matches!(
            Menstruation::from_xml(xml),
            Err(crate::ThingError::InvalidValue { .. })
        ));
    }
}
