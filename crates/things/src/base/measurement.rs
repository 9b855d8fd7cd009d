//! Measurements in a fixed base unit, with an optional display value in the unit the user
//! entered.
//!
//! ```xml
//! <value>
//!   <kg>70.5</kg>
//!   <display units="lb" units-code="lb">155.4</display>
//! </value>
//! ```

use std::fmt;
use std::marker::PhantomData;

use hr_xml::{XmlElement, XmlWriter};

use crate::node::{
    parse_optional, parse_value, required_value, validate_each, write_optional, write_value,
    XmlNode,
};
use crate::{validation, ThingError, ThingResult};

/// A value as the user entered it, with its units carried as attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayValue {
    value: f64,
    units: String,
    units_code: Option<String>,
}

impl DisplayValue {
    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] if `value` is not finite or `units` is blank.
    pub fn new(value: f64, units: &str) -> ThingResult<Self> {
        if !value.is_finite() {
            return Err(ThingError::invalid_argument(
                "value",
                "value must be a finite number",
            ));
        }
        Ok(Self {
            value,
            units: validation::text("units", units)?,
            units_code: None,
        })
    }

    pub fn with_units_code(mut self, units_code: &str) -> ThingResult<Self> {
        self.units_code = Some(validation::text("units_code", units_code)?);
        Ok(self)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn units_code(&self) -> Option<&str> {
        self.units_code.as_deref()
    }
}

impl XmlNode for DisplayValue {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let units = node
            .attribute("units")
            .ok_or_else(|| ThingError::MissingElement {
                parent: node.name().to_string(),
                element: "@units".into(),
            })?;
        Ok(Self {
            value: parse_value(node)?,
            units: units.to_string(),
            units_code: node.attribute("units-code").map(str::to_string),
        })
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        let mut attributes = vec![("units", self.units.as_str())];
        if let Some(code) = &self.units_code {
            attributes.push(("units-code", code.as_str()));
        }
        writer.start_element_with_attributes(name, &attributes)?;
        writer.text(&self.value.to_string())?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.units)
    }
}

/// The base unit of a [`Measurement`] and the element it is written under.
pub trait MeasurementUnit {
    /// Child element carrying the value in base units.
    const ELEMENT: &'static str;
    /// Unit symbol used in summaries.
    const SYMBOL: &'static str;
}

macro_rules! measurement_unit {
    ($(#[$doc:meta])* $unit:ident, $element:literal, $symbol:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $unit;

        impl MeasurementUnit for $unit {
            const ELEMENT: &'static str = $element;
            const SYMBOL: &'static str = $symbol;
        }
    };
}

measurement_unit!(
    /// Metres.
    Meters, "m", "m"
);
measurement_unit!(
    /// Kilograms.
    Kilograms, "kg", "kg"
);
measurement_unit!(
    /// Litres.
    Liters, "liters", "L"
);
measurement_unit!(
    /// Litres per second.
    LitersPerSecond, "liters-per-second", "L/s"
);
measurement_unit!(
    /// Millimoles per litre.
    MillimolesPerLiter, "mmolPerL", "mmol/L"
);
measurement_unit!(
    /// Kilocalories.
    Calories, "calories", "kcal"
);

/// A non-negative quantity in the base unit `U`.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement<U> {
    value: f64,
    display: Option<DisplayValue>,
    unit: PhantomData<U>,
}

pub type Length = Measurement<Meters>;
pub type WeightValue = Measurement<Kilograms>;
pub type VolumeValue = Measurement<Liters>;
pub type FlowValue = Measurement<LitersPerSecond>;
pub type BloodGlucoseMeasurement = Measurement<MillimolesPerLiter>;
pub type FoodEnergyValue = Measurement<Calories>;

impl<U: MeasurementUnit> Measurement<U> {
    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] if `value` is negative or not finite.
    pub fn new(value: f64) -> ThingResult<Self> {
        Ok(Self {
            value: validation::non_negative("value", value)?,
            display: None,
            unit: PhantomData,
        })
    }

    pub fn with_display(value: f64, display: DisplayValue) -> ThingResult<Self> {
        let mut measurement = Self::new(value)?;
        measurement.display = Some(display);
        Ok(measurement)
    }

    /// Value in base units.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) -> ThingResult<()> {
        self.value = validation::non_negative("value", value)?;
        Ok(())
    }

    pub fn display(&self) -> Option<&DisplayValue> {
        self.display.as_ref()
    }

    pub fn set_display(&mut self, display: Option<DisplayValue>) {
        self.display = display;
    }
}

impl<U: MeasurementUnit> XmlNode for Measurement<U> {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            value: required_value(node, U::ELEMENT)?,
            display: parse_optional(node, "display")?,
            unit: PhantomData,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        validate_each(&self.display)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        write_value(writer, U::ELEMENT, self.value)?;
        write_optional(writer, "display", self.display.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

/// The display value when present, otherwise the base value and unit symbol.
impl<U: MeasurementUnit> fmt::Display for Measurement<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display {
            Some(display) => write!(f, "{display}"),
            None => write!(f, "{} {}", self.value, U::SYMBOL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write<T: XmlNode>(value: &T) -> String {
        let mut writer = XmlWriter::new();
        value.write_xml("value", &mut writer).expect("write");
        writer.into_string().expect("finish")
    }

    #[test]
    fn weight_writes_base_unit_then_display() {
        let display = DisplayValue::new(155.4, "lb")
            .and_then(|d| d.with_units_code("lb"))
            .expect("display");
        let weight = WeightValue::with_display(70.5, display).expect("weight");
        assert_eq!(
            write(&weight),
            r#"<value><kg>70.5</kg><display units="lb" units-code="lb">155.4</display></value>"#
        );
        assert_eq!(weight.to_string(), "155.4 lb");
    }

    #[test]
    fn each_unit_uses_its_own_element() {
        assert!(write(&Length::new(1.8).expect("length")).contains("<m>1.8</m>"));
        assert!(write(&VolumeValue::new(3.2).expect("volume")).contains("<liters>3.2</liters>"));
        assert!(write(&FlowValue::new(7.0).expect("flow"))
            .contains("<liters-per-second>7</liters-per-second>"));
        assert!(write(&BloodGlucoseMeasurement::new(5.5).expect("glucose"))
            .contains("<mmolPerL>5.5</mmolPerL>"));
        assert!(write(&FoodEnergyValue::new(250.0).expect("energy"))
            .contains("<calories>250</calories>"));
    }

    #[test]
    fn negative_values_are_rejected_at_the_setter() {
        assert!(Length::new(-0.1).is_err());
        let mut volume = VolumeValue::new(1.0).expect("volume");
        let err = volume.set_value(-2.0).expect_err("negative");
        assert!(matches!(err, ThingError::InvalidArgument { field: "value", .. }));
        assert_eq!(volume.value(), 1.0);
    }

    #[test]
    fn round_trips_through_xml() {
        let flow = FlowValue::with_display(
            6.25,
            DisplayValue::new(375.0, "L/min").expect("display"),
        )
        .expect("flow");
        let parsed = FlowValue::parse_xml(&XmlElement::parse(&write(&flow)).expect("xml"))
            .expect("parse");
        assert_eq!(parsed, flow);
    }

    #[test]
    fn summary_falls_back_to_unit_symbol() {
        assert_eq!(BloodGlucoseMeasurement::new(6.1).expect("glucose").to_string(), "6.1 mmol/L");
    }

    #[test]
    fn display_requires_units_attribute() {
        let node = XmlElement::parse("<display>12</display>").expect("xml");
        let err = DisplayValue::parse_xml(&node).expect_err("no units");
        assert!(matches!(err, ThingError::MissingElement { element, .. } if element == "@units"));
    }

    #[test]
    fn parse_rejects_non_numeric_value() {
        let node = XmlElement::parse("<value><m>tall</m></value>").expect("xml");
        assert!(matches!(
            Length::parse_xml(&node),
            Err(ThingError::InvalidValue { .. })
        ));
    }
}
