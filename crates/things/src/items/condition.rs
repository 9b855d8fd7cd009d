use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{ApproximateDateTime, CodableValue};
use crate::node::{
    locate, optional_text, parse_optional, parse_required, require, validate_each,
    write_optional, write_optional_text, ThingType, XmlNode,
};
use crate::{validation, ThingResult};

/// A medical condition or problem, current or resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Condition {
    name: Option<CodableValue>,
    onset_date: Option<ApproximateDateTime>,
    status: Option<CodableValue>,
    stop_date: Option<ApproximateDateTime>,
    stop_reason: Option<String>,
}

impl Condition {
    pub fn new(name: CodableValue) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&CodableValue> {
        self.name.as_ref()
    }

    pub fn set_name(&mut self, name: CodableValue) {
        self.name = Some(name);
    }

    pub fn onset_date(&self) -> Option<&ApproximateDateTime> {
        self.onset_date.as_ref()
    }

    pub fn set_onset_date(&mut self, onset_date: Option<ApproximateDateTime>) {
        self.onset_date = onset_date;
    }

    pub fn status(&self) -> Option<&CodableValue> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: Option<CodableValue>) {
        self.status = status;
    }

    pub fn stop_date(&self) -> Option<&ApproximateDateTime> {
        self.stop_date.as_ref()
    }

    pub fn set_stop_date(&mut self, stop_date: Option<ApproximateDateTime>) {
        self.stop_date = stop_date;
    }

    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }

    pub fn set_stop_reason(&mut self, stop_reason: Option<&str>) -> ThingResult<()> {
        self.stop_reason = validation::optional_text("stop-reason", stop_reason)?;
        Ok(())
    }
}

impl XmlNode for Condition {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            name: Some(parse_required(node, "name")?),
            onset_date: parse_optional(node, "onset-date")?,
            status: parse_optional(node, "status")?,
            stop_date: parse_optional(node, "stop-date")?,
            stop_reason: optional_text(node, "stop-reason"),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.name, Self::TYPE_NAME, "name")?.validate()?;
        validate_each(&self.onset_date)?;
        validate_each(&self.status)?;
        validate_each(&self.stop_date)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let condition = require(&self.name, Self::TYPE_NAME, "name")?;

        writer.start_element(name)?;
        condition.write_xml("name", writer)?;
        write_optional(writer, "onset-date", self.onset_date.as_ref())?;
        write_optional(writer, "status", self.status.as_ref())?;
        write_optional(writer, "stop-date", self.stop_date.as_ref())?;
        write_optional_text(writer, "stop-reason", self.stop_reason.as_deref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for Condition {
    const ELEMENT: &'static str = "condition";
    const TYPE_NAME: &'static str = "Condition";
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_ref().map(ToString::to_string).unwrap_or_default();
        match &self.status {
            Some(status) => write!(f, "{name} ({status})"),
            None => f.write_str(&name),
        }
    }
}
