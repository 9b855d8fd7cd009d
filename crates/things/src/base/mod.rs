//! Leaf value types nested inside thing types.
//!
//! These follow the same parse/write contract as the things themselves but have no fixed
//! element name: the enclosing node decides which element they are written under.

pub mod approximate;
pub mod codable_value;
pub mod coded_value;
pub mod contact;
pub mod date_time;
pub mod measurement;
pub mod person;

pub use approximate::{ApproximateDate, ApproximateDateTime};
pub use codable_value::CodableValue;
pub use coded_value::{CodedValue, VocabularyKey};
pub use contact::{Address, ContactInfo, Email, Phone};
pub use date_time::{HealthServiceDate, HealthServiceDateTime, HealthServiceTime};
pub use measurement::{
    BloodGlucoseMeasurement, DisplayValue, FlowValue, FoodEnergyValue, Length, Measurement,
    MeasurementUnit, VolumeValue, WeightValue,
};
pub use person::{Name, PersonItem};
