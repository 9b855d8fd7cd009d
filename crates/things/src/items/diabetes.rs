//! Diabetes profile and its target glucose zones.

use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{BloodGlucoseMeasurement, HealthServiceDateTime};
use crate::node::{
    locate, optional_text, optional_value, parse_all, parse_required, require, validate_each,
    write_all, write_optional_text, write_optional_value, write_value, ThingType, XmlNode,
};
use crate::{validation, ThingError, ThingResult};

/// One edge of a glucose zone: either an absolute reading or a fraction of the person's
/// normal value.
#[derive(Clone, Debug, PartialEq)]
pub enum GlucoseZoneBoundary {
    Absolute(BloodGlucoseMeasurement),
    Relative(f64),
}

impl GlucoseZoneBoundary {
    const NODE: &'static str = "GlucoseZoneBoundary";

    pub fn absolute(value: BloodGlucoseMeasurement) -> Self {
        Self::Absolute(value)
    }

    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] unless `fraction` lies in `[0, 1]`.
    pub fn relative(fraction: f64) -> ThingResult<Self> {
        Ok(Self::Relative(validation::fraction("relative-value", fraction)?))
    }

    pub fn absolute_value(&self) -> Option<&BloodGlucoseMeasurement> {
        match self {
            Self::Absolute(value) => Some(value),
            Self::Relative(_) => None,
        }
    }

    pub fn relative_value(&self) -> Option<f64> {
        match self {
            Self::Relative(fraction) => Some(*fraction),
            Self::Absolute(_) => None,
        }
    }
}

impl XmlNode for GlucoseZoneBoundary {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        if let Some(absolute) = node.child("absolute-value") {
            return Ok(Self::Absolute(BloodGlucoseMeasurement::parse_xml(absolute)?));
        }
        match optional_value(node, "relative-value")? {
            Some(fraction) => Ok(Self::Relative(fraction)),
            None => Err(ThingError::MissingElement {
                parent: node.name().to_string(),
                element: "absolute-value|relative-value".into(),
            }),
        }
    }

    fn validate(&self) -> ThingResult<()> {
        match self {
            Self::Relative(fraction) if !(0.0..=1.0).contains(fraction) => {
                Err(ThingError::serialization(
                    Self::NODE,
                    format!("relative-value must be between 0 and 1, got {fraction}"),
                ))
            }
            Self::Absolute(value) => value.validate(),
            Self::Relative(_) => Ok(()),
        }
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        match self {
            Self::Absolute(value) => value.write_xml("absolute-value", writer)?,
            Self::Relative(fraction) => write_value(writer, "relative-value", fraction)?,
        }
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for GlucoseZoneBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(value) => write!(f, "{value}"),
            Self::Relative(fraction) => write!(f, "{}%", percent(*fraction)),
        }
    }
}

/// Fraction as a percentage, rounded to two decimal places.
fn percent(fraction: f64) -> f64 {
    (fraction * 10_000.0).round() / 100.0
}

/// A named glucose range the person aims to stay within.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetGlucoseZone {
    lower_boundary: Option<GlucoseZoneBoundary>,
    upper_boundary: Option<GlucoseZoneBoundary>,
    name: Option<String>,
}

impl TargetGlucoseZone {
    const NODE: &'static str = "TargetGlucoseZone";

    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] if both boundaries are absolute and `lower`
    /// exceeds `upper`.
    pub fn new(lower: GlucoseZoneBoundary, upper: GlucoseZoneBoundary) -> ThingResult<Self> {
        check_order(Some(&lower), Some(&upper))?;
        Ok(Self {
            lower_boundary: Some(lower),
            upper_boundary: Some(upper),
            name: None,
        })
    }

    pub fn lower_boundary(&self) -> Option<&GlucoseZoneBoundary> {
        self.lower_boundary.as_ref()
    }

    pub fn set_lower_boundary(&mut self, lower: GlucoseZoneBoundary) -> ThingResult<()> {
        check_order(Some(&lower), self.upper_boundary.as_ref())?;
        self.lower_boundary = Some(lower);
        Ok(())
    }

    pub fn upper_boundary(&self) -> Option<&GlucoseZoneBoundary> {
        self.upper_boundary.as_ref()
    }

    pub fn set_upper_boundary(&mut self, upper: GlucoseZoneBoundary) -> ThingResult<()> {
        check_order(self.lower_boundary.as_ref(), Some(&upper))?;
        self.upper_boundary = Some(upper);
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<&str>) -> ThingResult<()> {
        self.name = validation::optional_text("name", name)?;
        Ok(())
    }
}

/// Absolute boundaries must not be inverted; relative ones are not comparable.
fn check_order(
    lower: Option<&GlucoseZoneBoundary>,
    upper: Option<&GlucoseZoneBoundary>,
) -> ThingResult<()> {
    let low = lower.and_then(GlucoseZoneBoundary::absolute_value);
    let high = upper.and_then(GlucoseZoneBoundary::absolute_value);
    match (low, high) {
        (Some(low), Some(high)) if low.value() > high.value() => Err(ThingError::invalid_argument(
            "lower-boundary",
            format!(
                "lower-boundary ({}) must not exceed upper-boundary ({})",
                low.value(),
                high.value()
            ),
        )),
        _ => Ok(()),
    }
}

impl XmlNode for TargetGlucoseZone {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            lower_boundary: Some(parse_required(node, "lower-boundary")?),
            upper_boundary: Some(parse_required(node, "upper-boundary")?),
            name: optional_text(node, "name"),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.lower_boundary, Self::NODE, "lower-boundary")?.validate()?;
        require(&self.upper_boundary, Self::NODE, "upper-boundary")?.validate()
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let lower = require(&self.lower_boundary, Self::NODE, "lower-boundary")?;
        let upper = require(&self.upper_boundary, Self::NODE, "upper-boundary")?;

        writer.start_element(name)?;
        lower.write_xml("lower-boundary", writer)?;
        upper.write_xml("upper-boundary", writer)?;
        write_optional_text(writer, "name", self.name.as_deref())?;
        writer.end_element()?;
        Ok(())
    }
}

/// "Fasting: 4 mmol/L - 7 mmol/L".
impl fmt::Display for TargetGlucoseZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}: ")?;
        }
        match (&self.lower_boundary, &self.upper_boundary) {
            (Some(lower), Some(upper)) => write!(f, "{lower} - {upper}"),
            (Some(lower), None) => write!(f, "from {lower}"),
            (None, Some(upper)) => write!(f, "up to {upper}"),
            (None, None) => Ok(()),
        }
    }
}

/// A person's diabetes treatment targets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiabetesProfile {
    when: HealthServiceDateTime,
    max_hba1c: Option<f64>,
    target_glucose_zones: Vec<TargetGlucoseZone>,
}

impl DiabetesProfile {
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

    /// Maximum HbA1C as a fraction of total haemoglobin.
    pub fn max_hba1c(&self) -> Option<f64> {
        self.max_hba1c
    }

    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] unless the value lies in `[0, 1]`.
    pub fn set_max_hba1c(&mut self, max_hba1c: Option<f64>) -> ThingResult<()> {
        self.max_hba1c = max_hba1c
            .map(|value| validation::fraction("max-HbA1C", value))
            .transpose()?;
        Ok(())
    }

    pub fn target_glucose_zones(&self) -> &[TargetGlucoseZone] {
        &self.target_glucose_zones
    }

    pub fn add_target_glucose_zone(&mut self, zone: TargetGlucoseZone) {
        self.target_glucose_zones.push(zone);
    }

    pub fn clear_target_glucose_zones(&mut self) {
        self.target_glucose_zones.clear();
    }
}

impl XmlNode for DiabetesProfile {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            when: parse_required(node, "when")?,
            max_hba1c: optional_value(node, "max-HbA1C")?,
            target_glucose_zones: parse_all(node, "target-glucose-zone")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        if let Some(value) = self.max_hba1c {
            if !(0.0..=1.0).contains(&value) {
                return Err(ThingError::serialization(
                    Self::TYPE_NAME,
                    format!("max-HbA1C must be between 0 and 1, got {value}"),
                ));
            }
        }
        self.when.validate()?;
        validate_each(&self.target_glucose_zones)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        self.when.write_xml("when", writer)?;
        write_optional_value(writer, "max-HbA1C", self.max_hba1c)?;
        write_all(writer, "target-glucose-zone", &self.target_glucose_zones)?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for DiabetesProfile {
    const ELEMENT: &'static str = "diabetes-profile";
    const TYPE_NAME: &'static str = "Diabetes Profile";
}

impl fmt::Display for DiabetesProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zones = self.target_glucose_zones.len();
        match self.max_hba1c {
            Some(max) => write!(f, "Max HbA1C {}%, {zones} target zone(s)", percent(max)),
            None => write!(f, "{zones} target zone(s)"),
        }
    }
}
