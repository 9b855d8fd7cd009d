use std::fmt;
use std::str::FromStr;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{BloodGlucoseMeasurement, CodableValue, HealthServiceDateTime};
use crate::node::{
    locate, optional_bool, optional_value, parse_optional, parse_required, require,
    validate_each, write_optional, write_optional_value, ThingType, XmlNode,
};
use crate::{ThingError, ThingResult};

/// How a reading compares with the person's normal range, written as its ordinal 1-5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Normalcy {
    WellBelowNormal = 1,
    BelowNormal = 2,
    Normal = 3,
    AboveNormal = 4,
    WellAboveNormal = 5,
}

impl Normalcy {
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Normalcy {
    type Error = ThingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::WellBelowNormal),
            2 => Ok(Self::BelowNormal),
            3 => Ok(Self::Normal),
            4 => Ok(Self::AboveNormal),
            5 => Ok(Self::WellAboveNormal),
            other => Err(ThingError::invalid_argument(
                "normalcy",
                format!("value must be between 1 and 5, got {other}"),
            )),
        }
    }
}

impl FromStr for Normalcy {
    type Err = ThingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ordinal: u8 = s
            .parse()
            .map_err(|_| ThingError::invalid_argument("normalcy", "expected an integer 1-5"))?;
        Self::try_from(ordinal)
    }
}

impl fmt::Display for Normalcy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WellBelowNormal => "well below normal",
            Self::BelowNormal => "below normal",
            Self::Normal => "normal",
            Self::AboveNormal => "above normal",
            Self::WellAboveNormal => "well above normal",
        })
    }
}

/// A blood glucose reading from a meter or lab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BloodGlucose {
    when: HealthServiceDateTime,
    value: Option<BloodGlucoseMeasurement>,
    glucose_measurement_type: Option<CodableValue>,
    outside_operating_temp: Option<bool>,
    is_control_test: Option<bool>,
    normalcy: Option<Normalcy>,
    measurement_context: Option<CodableValue>,
}

impl BloodGlucose {
    /// `measurement_type` is the sample kind, e.g. "whole blood" or "plasma".
    pub fn new(
        when: HealthServiceDateTime,
        value: BloodGlucoseMeasurement,
        measurement_type: CodableValue,
    ) -> Self {
        Self {
            when,
            value: Some(value),
            glucose_measurement_type: Some(measurement_type),
            ..Self::default()
        }
    }

    pub fn when(&self) -> &HealthServiceDateTime {
        &self.when
    }

    pub fn set_when(&mut self, when: HealthServiceDateTime) {
        self.when = when;
    }

    pub fn value(&self) -> Option<&BloodGlucoseMeasurement> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: BloodGlucoseMeasurement) {
        self.value = Some(value);
    }

    pub fn glucose_measurement_type(&self) -> Option<&CodableValue> {
        self.glucose_measurement_type.as_ref()
    }

    pub fn set_glucose_measurement_type(&mut self, measurement_type: CodableValue) {
        self.glucose_measurement_type = Some(measurement_type);
    }

    pub fn outside_operating_temp(&self) -> Option<bool> {
        self.outside_operating_temp
    }

    pub fn set_outside_operating_temp(&mut self, outside: Option<bool>) {
        self.outside_operating_temp = outside;
    }

    pub fn is_control_test(&self) -> Option<bool> {
        self.is_control_test
    }

    pub fn set_is_control_test(&mut self, is_control_test: Option<bool>) {
        self.is_control_test = is_control_test;
    }

    pub fn normalcy(&self) -> Option<Normalcy> {
        self.normalcy
    }

    pub fn set_normalcy(&mut self, normalcy: Option<Normalcy>) {
        self.normalcy = normalcy;
    }

    /// When the reading was taken relative to meals or exercise.
    pub fn measurement_context(&self) -> Option<&CodableValue> {
        self.measurement_context.as_ref()
    }

    pub fn set_measurement_context(&mut self, context: Option<CodableValue>) {
        self.measurement_context = context;
    }
}

impl XmlNode for BloodGlucose {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            when: parse_required(node, "when")?,
            value: Some(parse_required(node, "value")?),
            glucose_measurement_type: Some(parse_required(node, "glucose-measurement-type")?),
            outside_operating_temp: optional_bool(node, "outside-operating-temp")?,
            is_control_test: optional_bool(node, "is-control-test")?,
            normalcy: optional_value(node, "normalcy")?,
            measurement_context: parse_optional(node, "measurement-context")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        self.when.validate()?;
        require(&self.value, Self::TYPE_NAME, "value")?.validate()?;
        require(
            &self.glucose_measurement_type,
            Self::TYPE_NAME,
            "glucose-measurement-type",
        )?
        .validate()?;
        validate_each(&self.measurement_context)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let value = require(&self.value, Self::TYPE_NAME, "value")?;
        let measurement_type = require(
            &self.glucose_measurement_type,
            Self::TYPE_NAME,
            "glucose-measurement-type",
        )?;

        writer.start_element(name)?;
        self.when.write_xml("when", writer)?;
        value.write_xml("value", writer)?;
        measurement_type.write_xml("glucose-measurement-type", writer)?;
        write_optional_value(writer, "outside-operating-temp", self.outside_operating_temp)?;
        write_optional_value(writer, "is-control-test", self.is_control_test)?;
        write_optional_value(writer, "normalcy", self.normalcy.map(Normalcy::ordinal))?;
        write_optional(writer, "measurement-context", self.measurement_context.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for BloodGlucose {
    const ELEMENT: &'static str = "blood-glucose";
    const TYPE_NAME: &'static str = "Blood Glucose";
}

/// "5.5 mmol/L (whole blood)".
impl fmt::Display for BloodGlucose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = &self.value else {
            return Ok(());
        };
        match &self.glucose_measurement_type {
            Some(kind) => write!(f, "{value} ({kind})"),
            None => write!(f, "{value}"),
        }
    }
}
