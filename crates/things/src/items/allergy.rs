//! Allergies and individual allergic episodes.

use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{ApproximateDateTime, CodableValue, HealthServiceDateTime, PersonItem};
use crate::node::{
    locate, optional_bool, parse_optional, parse_required, require, validate_each,
    write_optional, write_optional_value, ThingType, XmlNode,
};
use crate::ThingResult;

/// A single occurrence of an allergic reaction.
///
/// `when` defaults to the current time; `name` (the allergen) must be set before writing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllergicEpisode {
    when: HealthServiceDateTime,
    name: Option<CodableValue>,
    reaction: Option<CodableValue>,
    treatment: Option<CodableValue>,
}

impl AllergicEpisode {
    pub fn new(when: HealthServiceDateTime, name: CodableValue) -> Self {
        Self {
            when,
            name: Some(name),
            reaction: None,
            treatment: None,
        }
    }

    pub fn when(&self) -> &HealthServiceDateTime {
        &self.when
    }

    pub fn set_when(&mut self, when: HealthServiceDateTime) {
        self.when = when;
    }

    pub fn name(&self) -> Option<&CodableValue> {
        self.name.as_ref()
    }

    pub fn set_name(&mut self, name: CodableValue) {
        self.name = Some(name);
    }

    pub fn reaction(&self) -> Option<&CodableValue> {
        self.reaction.as_ref()
    }

    pub fn set_reaction(&mut self, reaction: Option<CodableValue>) {
        self.reaction = reaction;
    }

    pub fn treatment(&self) -> Option<&CodableValue> {
        self.treatment.as_ref()
    }

    pub fn set_treatment(&mut self, treatment: Option<CodableValue>) {
        self.treatment = treatment;
    }
}

impl XmlNode for AllergicEpisode {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            when: parse_required(node, "when")?,
            name: Some(parse_required(node, "name")?),
            reaction: parse_optional(node, "reaction")?,
            treatment: parse_optional(node, "treatment")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.name, Self::TYPE_NAME, "name")?.validate()?;
        self.when.validate()?;
        validate_each(&self.reaction)?;
        validate_each(&self.treatment)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let allergen = require(&self.name, Self::TYPE_NAME, "name")?;

        writer.start_element(name)?;
        self.when.write_xml("when", writer)?;
        allergen.write_xml("name", writer)?;
        write_optional(writer, "reaction", self.reaction.as_ref())?;
        write_optional(writer, "treatment", self.treatment.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for AllergicEpisode {
    const ELEMENT: &'static str = "allergic-episode";
    const TYPE_NAME: &'static str = "Allergic Episode";
}

/// "Peanut" or "Peanut: Hives" when a reaction is recorded.
impl fmt::Display for AllergicEpisode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_ref().map(ToString::to_string).unwrap_or_default();
        match &self.reaction {
            Some(reaction) => write!(f, "{name}: {reaction}"),
            None => f.write_str(&name),
        }
    }
}

/// An allergy or intolerance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Allergy {
    name: Option<CodableValue>,
    reaction: Option<CodableValue>,
    first_observed: Option<ApproximateDateTime>,
    allergen_type: Option<CodableValue>,
    allergen_code: Option<CodableValue>,
    treatment_provider: Option<PersonItem>,
    treatment: Option<CodableValue>,
    is_negated: Option<bool>,
}

impl Allergy {
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

    pub fn reaction(&self) -> Option<&CodableValue> {
        self.reaction.as_ref()
    }

    pub fn set_reaction(&mut self, reaction: Option<CodableValue>) {
        self.reaction = reaction;
    }

    pub fn first_observed(&self) -> Option<&ApproximateDateTime> {
        self.first_observed.as_ref()
    }

    pub fn set_first_observed(&mut self, first_observed: Option<ApproximateDateTime>) {
        self.first_observed = first_observed;
    }

    pub fn allergen_type(&self) -> Option<&CodableValue> {
        self.allergen_type.as_ref()
    }

    pub fn set_allergen_type(&mut self, allergen_type: Option<CodableValue>) {
        self.allergen_type = allergen_type;
    }

    pub fn allergen_code(&self) -> Option<&CodableValue> {
        self.allergen_code.as_ref()
    }

    pub fn set_allergen_code(&mut self, allergen_code: Option<CodableValue>) {
        self.allergen_code = allergen_code;
    }

    pub fn treatment_provider(&self) -> Option<&PersonItem> {
        self.treatment_provider.as_ref()
    }

    pub fn set_treatment_provider(&mut self, provider: Option<PersonItem>) {
        self.treatment_provider = provider;
    }

    pub fn treatment(&self) -> Option<&CodableValue> {
        self.treatment.as_ref()
    }

    pub fn set_treatment(&mut self, treatment: Option<CodableValue>) {
        self.treatment = treatment;
    }

    /// `Some(true)` records that the person is known *not* to have this allergy.
    pub fn is_negated(&self) -> Option<bool> {
        self.is_negated
    }

    pub fn set_is_negated(&mut self, is_negated: Option<bool>) {
        self.is_negated = is_negated;
    }
}

impl XmlNode for Allergy {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            name: Some(parse_required(node, "name")?),
            reaction: parse_optional(node, "reaction")?,
            first_observed: parse_optional(node, "first-observed")?,
            allergen_type: parse_optional(node, "allergen-type")?,
            allergen_code: parse_optional(node, "allergen-code")?,
            treatment_provider: parse_optional(node, "treatment-provider")?,
            treatment: parse_optional(node, "treatment")?,
            is_negated: optional_bool(node, "is-negated")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.name, Self::TYPE_NAME, "name")?.validate()?;
        validate_each(&self.reaction)?;
        validate_each(&self.first_observed)?;
        validate_each(&self.allergen_type)?;
        validate_each(&self.allergen_code)?;
        validate_each(&self.treatment_provider)?;
        validate_each(&self.treatment)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let allergen = require(&self.name, Self::TYPE_NAME, "name")?;

        writer.start_element(name)?;
        allergen.write_xml("name", writer)?;
        write_optional(writer, "reaction", self.reaction.as_ref())?;
        write_optional(writer, "first-observed", self.first_observed.as_ref())?;
        write_optional(writer, "allergen-type", self.allergen_type.as_ref())?;
        write_optional(writer, "allergen-code", self.allergen_code.as_ref())?;
        write_optional(writer, "treatment-provider", self.treatment_provider.as_ref())?;
        write_optional(writer, "treatment", self.treatment.as_ref())?;
        write_optional_value(writer, "is-negated", self.is_negated)?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for Allergy {
    const ELEMENT: &'static str = "allergy";
    const TYPE_NAME: &'static str = "Allergy";
}

impl fmt::Display for Allergy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_ref().map(ToString::to_string).unwrap_or_default();
        match (self.is_negated, &self.reaction) {
            (Some(true), _) => write!(f, "No allergy: {name}"),
            (_, Some(reaction)) => write!(f, "{name} ({reaction})"),
            _ => f.write_str(&name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{ApproximateDate, HealthServiceDate, Name};
    use crate::ThingError;

    fn peanut_episode() -> AllergicEpisode {
        AllergicEpisode::new(
            HealthServiceDateTime::new(HealthServiceDate::new(2024, 5, 17).expect("date")),
            CodableValue::new("Peanut").expect("name"),
        )
    }

    #[test]
    fn allergic_episode_writes_only_present_children() {
        let episode = peanut_episode();
        let xml = episode.to_xml().expect("write");
        let root = XmlElement::parse(&xml).expect("xml");

        assert_eq!(root.name(), "allergic-episode");
        assert!(root.child("when").is_some());
        assert!(root.child("name").is_some());
        assert!(root.child("reaction").is_none());
        assert!(root.child("treatment").is_none());

        let parsed = AllergicEpisode::from_xml(&xml).expect("parse");
        assert_eq!(parsed.name().and_then(CodableValue::text), Some("Peanut"));
        assert_eq!(parsed, episode);
    }

    #[test]
    fn allergic_episode_summary_includes_reaction() {
        let mut episode = peanut_episode();
        assert_eq!(episode.to_string(), "Peanut");
        episode.set_reaction(Some(CodableValue::new("Hives").expect("reaction")));
        assert_eq!(episode.to_string(), "Peanut: Hives");
    }

    #[test]
    fn allergic_episode_requires_name() {
        let err = AllergicEpisode::default().to_xml().expect_err("no name");
        assert!(
            matches!(err, ThingError::Serialization { node, reason } if node == "Allergic Episode" && reason.contains("name"))
        );
    }

    #[test]
    fn allergic_episode_parse_requires_when() {
        let err = AllergicEpisode::from_xml(
            "<allergic-episode><name><text>Peanut</text></name></allergic-episode>",
        )
        .expect_err("missing when");
        assert!(matches!(err, ThingError::MissingElement { parent, element } if parent == "allergic-episode" && element == "when"));
    }

    #[test]
    fn allergic_episode_parses_from_containing_node() {
        let xml = format!("<data-xml>{}</data-xml>", peanut_episode().to_xml().expect("write"));
        let parsed = AllergicEpisode::from_xml(&xml).expect("parse");
        assert_eq!(parsed, peanut_episode());

        let err = AllergicEpisode::from_xml("<allergy/>").expect_err("wrong root");
        assert!(matches!(err, ThingError::UnexpectedNode { .. }));
    }

    #[test]
    fn allergy_round_trips_fully_populated() {
        let mut allergy = Allergy::new(CodableValue::new("Penicillin").expect("name"));
        allergy.set_reaction(Some(CodableValue::new("Rash").expect("reaction")));
        allergy.set_first_observed(Some(ApproximateDateTime::structured(
            ApproximateDate::new(1999).expect("year"),
        )));
        allergy.set_allergen_type(Some(CodableValue::new("medication").expect("type")));
        allergy.set_allergen_code(Some(CodableValue::new("PCN").expect("code")));
        allergy.set_treatment_provider(Some(PersonItem::new(Name::new("Dr. Who").expect("name"))));
        allergy.set_treatment(Some(CodableValue::new("Antihistamine").expect("treatment")));
        allergy.set_is_negated(Some(false));

        let xml = allergy.to_xml().expect("write");
        assert!(xml.ends_with("<is-negated>false</is-negated></allergy>"));
        assert_eq!(Allergy::from_xml(&xml).expect("parse"), allergy);
        assert_eq!(allergy.to_string(), "Penicillin (Rash)");
    }

    #[test]
    fn allergy_requires_name() {
        let err = Allergy::default().to_xml().expect_err("no name");
        assert!(
            matches!(err, ThingError::Serialization { node, ref reason } if node == "Allergy" && reason.contains("name"))
        );
    }

    #[test]
    fn incomplete_provider_fails_before_allergy_is_opened() {
        let mut allergy = Allergy::new(CodableValue::new("Penicillin").expect("name"));
        allergy.set_treatment_provider(Some(PersonItem::new(Name::default())));

        let mut writer = XmlWriter::new();
        let err = allergy.write_xml("allergy", &mut writer).expect_err("provider without name");
        assert!(matches!(err, ThingError::Serialization { node: "Name", .. }));
        assert_eq!(writer.depth(), 0);
        assert_eq!(writer.into_string().expect("finish"), "");
    }

    #[test]
    fn negated_allergy_summary() {
        let mut allergy = Allergy::new(CodableValue::new("Latex").expect("name"));
        allergy.set_is_negated(Some(true));
        assert_eq!(allergy.to_string(), "No allergy: Latex");
    }
}
