//! # Health record things
//!
//! Strongly-typed health record items ("things") and the leaf value types they are built from.
//!
//! Every type in this crate follows the same contract:
//! - typed fields mirroring a fixed XML schema fragment,
//! - validating setters that reject bad values at assignment time,
//! - [`XmlNode::parse_xml`] to read the fragment (values are taken as the service sent them),
//! - [`XmlNode::write_xml`] to write it back (mandatory fields are checked first),
//! - a `Display` implementation giving a short human-readable summary.
//!
//! Thing types additionally implement [`ThingType`], and [`Thing`] dispatches a whole document
//! to the right type based on its root element.
//!
//! **No transport concerns**: fetching or pushing records, authentication and type registries
//! belong to the service client, not here.

pub mod base;
pub mod items;
pub mod node;
pub mod thing;
mod validation;

pub use base::{
    Address, ApproximateDate, ApproximateDateTime, BloodGlucoseMeasurement, CodableValue,
    CodedValue, ContactInfo, DisplayValue, Email, FlowValue, FoodEnergyValue, HealthServiceDate,
    HealthServiceDateTime, HealthServiceTime, Length, Measurement, MeasurementUnit, Name,
    PersonItem, Phone, VocabularyKey, VolumeValue, WeightValue,
};
pub use items::{
    AllergicEpisode, Allergy, BloodGlucose, BloodPressure, CarePlan, CarePlanTask,
    CarePlanTaskRecurrence, Condition, Contact, DiabetesProfile, DietaryItem, File,
    GlucoseZoneBoundary, Height, MealDefinition, Menstruation, Normalcy, PeakFlow,
    TargetGlucoseZone, TaskRecurrence, Weight,
};
pub use node::{ThingType, XmlNode};
pub use thing::Thing;

pub use hr_xml::{XmlElement, XmlError, XmlWriter};

/// Errors returned by record nodes.
///
/// The variants separate "bad input to me" (`InvalidArgument`), "the XML I was given does
/// not have the expected shape" (`MissingElement`, `UnexpectedNode`, `InvalidValue`) and
/// "I am not yet complete enough to be written" (`Serialization`).
#[derive(Debug, thiserror::Error)]
pub enum ThingError {
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("missing required element '{element}' in '{parent}'")]
    MissingElement { parent: String, element: String },

    #[error("unexpected node: expected '{expected}', found '{found}'")]
    UnexpectedNode { expected: String, found: String },

    #[error("invalid value '{value}' in element '{element}': {reason}")]
    InvalidValue {
        element: String,
        value: String,
        reason: String,
    },

    #[error("serialization validation failed for {node}: {reason}")]
    Serialization { node: &'static str, reason: String },

    #[error("no thing type has root element '{0}'")]
    UnknownThing(String),

    #[error("XML error: {0}")]
    Xml(#[from] hr_xml::XmlError),
}

impl ThingError {
    pub(crate) fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn serialization(node: &'static str, reason: impl Into<String>) -> Self {
        Self::Serialization {
            node,
            reason: reason.into(),
        }
    }

    /// Returns `true` for write-time validation failures.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

/// Type alias for Results that can fail with a [`ThingError`].
pub type ThingResult<T> = Result<T, ThingError>;
