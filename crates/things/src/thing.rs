//! Dispatch of a whole XML document to the thing type its root element names.

use std::fmt;

use hr_xml::XmlElement;

use crate::items::{
    AllergicEpisode, Allergy, BloodGlucose, BloodPressure, CarePlan, Condition, Contact,
    DiabetesProfile, File, Height, MealDefinition, Menstruation, PeakFlow, Weight,
};
use crate::node::{ThingType, XmlNode};
use crate::{ThingError, ThingResult};

/// Any supported thing.
#[derive(Clone, Debug, PartialEq)]
pub enum Thing {
    AllergicEpisode(AllergicEpisode),
    Allergy(Allergy),
    BloodGlucose(BloodGlucose),
    BloodPressure(BloodPressure),
    CarePlan(CarePlan),
    Condition(Condition),
    Contact(Contact),
    DiabetesProfile(DiabetesProfile),
    File(File),
    Height(Height),
    MealDefinition(MealDefinition),
    Menstruation(Menstruation),
    PeakFlow(PeakFlow),
    Weight(Weight),
}

/// Root element and type name of every supported thing type.
pub const SUPPORTED: &[(&str, &str)] = &[
    (AllergicEpisode::ELEMENT, AllergicEpisode::TYPE_NAME),
    (Allergy::ELEMENT, Allergy::TYPE_NAME),
    (BloodGlucose::ELEMENT, BloodGlucose::TYPE_NAME),
    (BloodPressure::ELEMENT, BloodPressure::TYPE_NAME),
    (CarePlan::ELEMENT, CarePlan::TYPE_NAME),
    (Condition::ELEMENT, Condition::TYPE_NAME),
    (Contact::ELEMENT, Contact::TYPE_NAME),
    (DiabetesProfile::ELEMENT, DiabetesProfile::TYPE_NAME),
    (File::ELEMENT, File::TYPE_NAME),
    (Height::ELEMENT, Height::TYPE_NAME),
    (MealDefinition::ELEMENT, MealDefinition::TYPE_NAME),
    (Menstruation::ELEMENT, Menstruation::TYPE_NAME),
    (PeakFlow::ELEMENT, PeakFlow::TYPE_NAME),
    (Weight::ELEMENT, Weight::TYPE_NAME),
];

/// Apply `$body` to the inner value of every variant.
macro_rules! each_thing {
    ($thing:expr, $inner:ident => $body:expr) => {
        match $thing {
            Thing::AllergicEpisode($inner) => $body,
            Thing::Allergy($inner) => $body,
            Thing::BloodGlucose($inner) => $body,
            Thing::BloodPressure($inner) => $body,
            Thing::CarePlan($inner) => $body,
            Thing::Condition($inner) => $body,
            Thing::Contact($inner) => $body,
            Thing::DiabetesProfile($inner) => $body,
            Thing::File($inner) => $body,
            Thing::Height($inner) => $body,
            Thing::MealDefinition($inner) => $body,
            Thing::Menstruation($inner) => $body,
            Thing::PeakFlow($inner) => $body,
            Thing::Weight($inner) => $body,
        }
    };
}

impl Thing {
    /// Parse a document and dispatch on its root element name.
    ///
    /// # Errors
    ///
    /// Returns [`ThingError::UnknownThing`] if no thing type uses the root element, or the
    /// parse error of the selected type.
    pub fn from_xml(xml: &str) -> ThingResult<Self> {
        let root = XmlElement::parse(xml)?;
        Self::from_element(&root)
    }

    /// Dispatch `root`, or the single thing inside a wrapper element such as `data-xml`.
    pub fn from_element(root: &XmlElement) -> ThingResult<Self> {
        if let Some(thing) = Self::dispatch(root) {
            return thing;
        }
        if let [inner] = root.children() {
            if let Some(thing) = Self::dispatch(inner) {
                return thing;
            }
        }
        tracing::warn!(element = root.name(), "no thing type for root element");
        Err(ThingError::UnknownThing(root.name().to_string()))
    }

    /// `None` when no thing type uses the element's name.
    fn dispatch(node: &XmlElement) -> Option<ThingResult<Self>> {
        let element = node.name();
        let thing = match element {
            AllergicEpisode::ELEMENT => AllergicEpisode::parse_xml(node).map(Self::AllergicEpisode),
            Allergy::ELEMENT => Allergy::parse_xml(node).map(Self::Allergy),
            BloodGlucose::ELEMENT => BloodGlucose::parse_xml(node).map(Self::BloodGlucose),
            BloodPressure::ELEMENT => BloodPressure::parse_xml(node).map(Self::BloodPressure),
            CarePlan::ELEMENT => CarePlan::parse_xml(node).map(Self::CarePlan),
            Condition::ELEMENT => Condition::parse_xml(node).map(Self::Condition),
            Contact::ELEMENT => Contact::parse_xml(node).map(Self::Contact),
            DiabetesProfile::ELEMENT => DiabetesProfile::parse_xml(node).map(Self::DiabetesProfile),
            File::ELEMENT => File::parse_xml(node).map(Self::File),
            Height::ELEMENT => Height::parse_xml(node).map(Self::Height),
            MealDefinition::ELEMENT => MealDefinition::parse_xml(node).map(Self::MealDefinition),
            Menstruation::ELEMENT => Menstruation::parse_xml(node).map(Self::Menstruation),
            PeakFlow::ELEMENT => PeakFlow::parse_xml(node).map(Self::PeakFlow),
            Weight::ELEMENT => Weight::parse_xml(node).map(Self::Weight),
            _ => return None,
        };
        tracing::debug!(element, ok = thing.is_ok(), "dispatched thing");
        Some(thing)
    }

    /// Write the thing as a compact XML fragment.
    pub fn to_xml(&self) -> ThingResult<String> {
        self.to_xml_with_indent(0)
    }

    pub fn to_xml_with_indent(&self, indent: usize) -> ThingResult<String> {
        each_thing!(self, inner => inner.to_xml_with_indent(indent))
    }

    /// Root element name of the wrapped type.
    pub fn element(&self) -> &'static str {
        self.info().0
    }

    /// Human readable name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.info().1
    }

    fn info(&self) -> (&'static str, &'static str) {
        fn of<T: ThingType>(_: &T) -> (&'static str, &'static str) {
            (T::ELEMENT, T::TYPE_NAME)
        }
        each_thing!(self, inner => of(inner))
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_thing!(self, inner => fmt::Display::fmt(inner, f))
    }
}

macro_rules! impl_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Thing {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    AllergicEpisode,
    Allergy,
    BloodGlucose,
    BloodPressure,
    CarePlan,
    Condition,
    Contact,
    DiabetesProfile,
    File,
    Height,
    MealDefinition,
    Menstruation,
    PeakFlow,
    Weight,
);
