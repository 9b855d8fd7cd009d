//! Body measurements and vital signs.

use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{HealthServiceDateTime, Length, WeightValue};
use crate::node::{
    locate, optional_bool, optional_value, parse_required, require, required_value,
    write_optional_value, write_value, ThingType, XmlNode,
};
use crate::ThingResult;

/// A height measurement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Height {
    when: HealthServiceDateTime,
    value: Option<Length>,
}

impl Height {
    pub fn new(when: HealthServiceDateTime, value: Length) -> Self {
        Self {
            when,
            value: Some(value),
        }
    }

    pub fn when(&self) -> &HealthServiceDateTime {
        &self.when
    }

    pub fn set_when(&mut self, when: HealthServiceDateTime) {
        self.when = when;
    }

    pub fn value(&self) -> Option<&Length> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Length) {
        self.value = Some(value);
    }
}

impl XmlNode for Height {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            when: parse_required(node, "when")?,
            value: Some(parse_required(node, "value")?),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        self.when.validate()?;
        require(&self.value, Self::TYPE_NAME, "value")?.validate()
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let value = require(&self.value, Self::TYPE_NAME, "value")?;

        writer.start_element(name)?;
        self.when.write_xml("when", writer)?;
        value.write_xml("value", writer)?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for Height {
    const ELEMENT: &'static str = "height";
    const TYPE_NAME: &'static str = "Height";
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

/// A body weight measurement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Weight {
    when: HealthServiceDateTime,
    value: Option<WeightValue>,
}

impl Weight {
    pub fn new(when: HealthServiceDateTime, value: WeightValue) -> Self {
        Self {
            when,
            value: Some(value),
        }
    }

    pub fn when(&self) -> &HealthServiceDateTime {
        &self.when
    }

    pub fn set_when(&mut self, when: HealthServiceDateTime) {
        self.when = when;
    }

    pub fn value(&self) -> Option<&WeightValue> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: WeightValue) {
        self.value = Some(value);
    }
}

impl XmlNode for Weight {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            when: parse_required(node, "when")?,
            value: Some(parse_required(node, "value")?),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        self.when.validate()?;
        require(&self.value, Self::TYPE_NAME, "value")?.validate()
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let value = require(&self.value, Self::TYPE_NAME, "value")?;

        writer.start_element(name)?;
        self.when.write_xml("when", writer)?;
        value.write_xml("value", writer)?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for Weight {
    const ELEMENT: &'static str = "weight";
    const TYPE_NAME: &'static str = "Weight";
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

/// A blood pressure reading in mmHg, with optional pulse in beats per minute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BloodPressure {
    when: HealthServiceDateTime,
    systolic: Option<u32>,
    diastolic: Option<u32>,
    pulse: Option<u32>,
    irregular_heartbeat: Option<bool>,
}

impl BloodPressure {
    pub fn new(when: HealthServiceDateTime, systolic: u32, diastolic: u32) -> Self {
        Self {
            when,
            systolic: Some(systolic),
            diastolic: Some(diastolic),
            ..Self::default()
        }
    }

    pub fn when(&self) -> &HealthServiceDateTime {
        &self.when
    }

    pub fn set_when(&mut self, when: HealthServiceDateTime) {
        self.when = when;
    }

    pub fn systolic(&self) -> Option<u32> {
        self.systolic
    }

    pub fn set_systolic(&mut self, systolic: u32) {
        self.systolic = Some(systolic);
    }

    pub fn diastolic(&self) -> Option<u32> {
        self.diastolic
    }

    pub fn set_diastolic(&mut self, diastolic: u32) {
        self.diastolic = Some(diastolic);
    }

    pub fn pulse(&self) -> Option<u32> {
        self.pulse
    }

    pub fn set_pulse(&mut self, pulse: Option<u32>) {
        self.pulse = pulse;
    }

    pub fn irregular_heartbeat(&self) -> Option<bool> {
        self.irregular_heartbeat
    }

    pub fn set_irregular_heartbeat(&mut self, irregular: Option<bool>) {
        self.irregular_heartbeat = irregular;
    }
}

impl XmlNode for BloodPressure {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            when: parse_required(node, "when")?,
            systolic: Some(required_value(node, "systolic")?),
            diastolic: Some(required_value(node, "diastolic")?),
            pulse: optional_value(node, "pulse")?,
            irregular_heartbeat: optional_bool(node, "irregular-heartbeat")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        self.when.validate()?;
        require(&self.systolic, Self::TYPE_NAME, "systolic")?;
        require(&self.diastolic, Self::TYPE_NAME, "diastolic")?;
        Ok(())
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let systolic = *require(&self.systolic, Self::TYPE_NAME, "systolic")?;
        let diastolic = *require(&self.diastolic, Self::TYPE_NAME, "diastolic")?;

        writer.start_element(name)?;
        self.when.write_xml("when", writer)?;
        write_value(writer, "systolic", systolic)?;
        write_value(writer, "diastolic", diastolic)?;
        write_optional_value(writer, "pulse", self.pulse)?;
        write_optional_value(writer, "irregular-heartbeat", self.irregular_heartbeat)?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for BloodPressure {
    const ELEMENT: &'static str = "blood-pressure";
    const TYPE_NAME: &'static str = "Blood Pressure";
}

/// "120/80 mmHg", with the pulse appended when recorded.
impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(systolic), Some(diastolic)) = (self.systolic, self.diastolic) else {
            return Ok(());
        };
        write!(f, "{systolic}/{diastolic} mmHg")?;
        if let Some(pulse) = self.pulse {
            write!(f, ", pulse {pulse}")?;
        }
        Ok(())
    }
}
