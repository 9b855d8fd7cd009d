use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{ApproximateDateTime, CodableValue, FlowValue, VolumeValue};
use crate::node::{
    locate, parse_optional, parse_required, validate_each, write_optional, ThingType, XmlNode,
};
use crate::ThingResult;

/// A spirometry reading: peak expiratory flow and forced expiratory volumes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeakFlow {
    when: ApproximateDateTime,
    pef: Option<FlowValue>,
    fev1: Option<VolumeValue>,
    fev6: Option<VolumeValue>,
    measurement_flags: Option<CodableValue>,
}

impl PeakFlow {
    pub fn new(when: ApproximateDateTime) -> Self {
        Self {
            when,
            ..Self::default()
        }
    }

    pub fn when(&self) -> &ApproximateDateTime {
        &self.when
    }

    pub fn set_when(&mut self, when: ApproximateDateTime) {
        self.when = when;
    }

    /// Peak expiratory flow.
    pub fn pef(&self) -> Option<&FlowValue> {
        self.pef.as_ref()
    }

    pub fn set_pef(&mut self, pef: Option<FlowValue>) {
        self.pef = pef;
    }

    /// Forced expiratory volume in one second.
    pub fn fev1(&self) -> Option<&VolumeValue> {
        self.fev1.as_ref()
    }

    pub fn set_fev1(&mut self, fev1: Option<VolumeValue>) {
        self.fev1 = fev1;
    }

    /// Forced expiratory volume in six seconds.
    pub fn fev6(&self) -> Option<&VolumeValue> {
        self.fev6.as_ref()
    }

    pub fn set_fev6(&mut self, fev6: Option<VolumeValue>) {
        self.fev6 = fev6;
    }

    pub fn measurement_flags(&self) -> Option<&CodableValue> {
        self.measurement_flags.as_ref()
    }

    pub fn set_measurement_flags(&mut self, flags: Option<CodableValue>) {
        self.measurement_flags = flags;
    }
}

impl XmlNode for PeakFlow {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            when: parse_required(node, "when")?,
            pef: parse_optional(node, "pef")?,
            fev1: parse_optional(node, "fev1")?,
            fev6: parse_optional(node, "fev6")?,
            measurement_flags: parse_optional(node, "measurement-flags")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        self.when.validate()?;
        validate_each(&self.pef)?;
        validate_each(&self.fev1)?;
        validate_each(&self.fev6)?;
        validate_each(&self.measurement_flags)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        self.when.write_xml("when", writer)?;
        write_optional(writer, "pef", self.pef.as_ref())?;
        write_optional(writer, "fev1", self.fev1.as_ref())?;
        write_optional(writer, "fev6", self.fev6.as_ref())?;
        write_optional(writer, "measurement-flags", self.measurement_flags.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for PeakFlow {
    const ELEMENT: &'static str = "peak-flow";
    const TYPE_NAME: &'static str = "Peak Flow";
}

/// Lists whichever of PEF, FEV1 and FEV6 are present, e.g. "PEF 6.5 L/s, FEV1 3.2 L".
impl fmt::Display for PeakFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(pef) = &self.pef {
            parts.push(format!("PEF {pef}"));
        }
        if let Some(fev1) = &self.fev1 {
            parts.push(format!("FEV1 {fev1}"));
        }
        if let Some(fev6) = &self.fev6 {
            parts.push(format!("FEV6 {fev6}"));
        }
        if parts.is_empty() {
            return write!(f, "{}", self.when);
        }
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ApproximateDate;

    fn reading() -> PeakFlow {
        let mut peak_flow = PeakFlow::new(ApproximateDateTime::structured(
            ApproximateDate::from_ymd(2024, 2, 29).expect("date"),
        ));
        peak_flow.set_pef(Some(FlowValue::new(6.5).expect("pef")));
        peak_flow.set_fev1(Some(VolumeValue::new(3.2).expect("fev1")));
        peak_flow
    }

    #[test]
    fn round_trips_and_omits_absent_volumes() {
        let peak_flow = reading();
        let xml = peak_flow.to_xml().expect("write");
        assert!(xml.contains("<pef><liters-per-second>6.5</liters-per-second></pef>"));
        assert!(!xml.contains("fev6"));
        assert_eq!(PeakFlow::from_xml(&xml).expect("parse"), peak_flow);
    }

    #[test]
    fn summary_lists_present_readings() {
        assert_eq!(reading().to_string(), "PEF 6.5 L/s, FEV1 3.2 L");
    }

    #[test]
    fn descriptive_when_is_supported() {
        let peak_flow = PeakFlow::new(ApproximateDateTime::descriptive("after lunch").expect("text"));
        let xml = peak_flow.to_xml().expect("write");
        assert!(xml.contains("<when><descriptive>after lunch</descriptive></when>"));
        assert_eq!(peak_flow.to_string(), "after lunch");
    }

    #[test]
    fn default_when_is_structured_now() {
        assert!(PeakFlow::default().when().is_structured());
    }
}
