//! Thing types: the top-level health record items.
//!
//! Each type is bound to a fixed root element (see [`crate::ThingType::ELEMENT`]) and accepts
//! either that element or a node directly containing it when parsed.

pub mod allergy;
pub mod blood_glucose;
pub mod care_plan;
pub mod condition;
pub mod contact;
pub mod diabetes;
pub mod file;
pub mod meal;
pub mod menstruation;
pub mod peak_flow;
pub mod vitals;

pub use allergy::{AllergicEpisode, Allergy};
pub use blood_glucose::{BloodGlucose, Normalcy};
pub use care_plan::{CarePlan, CarePlanTask, CarePlanTaskRecurrence, TaskRecurrence};
pub use condition::Condition;
pub use contact::Contact;
pub use diabetes::{DiabetesProfile, GlucoseZoneBoundary, TargetGlucoseZone};
pub use file::File;
pub use meal::{DietaryItem, MealDefinition};
pub use menstruation::Menstruation;
pub use peak_flow::PeakFlow;
pub use vitals::{BloodPressure, Height, Weight};
