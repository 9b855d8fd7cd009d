//! Setter argument validation.
//!
//! Each helper names the offending field in the returned [`ThingError::InvalidArgument`].

use std::fmt::Display;

use hr_types::{Fraction, NonEmptyText, NonNegative};

use crate::{ThingError, ThingResult};

/// Reject empty or whitespace-only text. The accepted value is trimmed.
pub(crate) fn text(field: &'static str, value: impl AsRef<str>) -> ThingResult<String> {
    NonEmptyText::new(value)
        .map(NonEmptyText::into_string)
        .map_err(|err| ThingError::invalid_argument(field, err.to_string()))
}

/// `None` clears an optional text field; `Some` must still be non-blank.
pub(crate) fn optional_text(field: &'static str, value: Option<&str>) -> ThingResult<Option<String>> {
    value.map(|v| text(field, v)).transpose()
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> ThingResult<f64> {
    NonNegative::new(value)
        .map(NonNegative::get)
        .map_err(|err| ThingError::invalid_argument(field, err.to_string()))
}

pub(crate) fn fraction(field: &'static str, value: f64) -> ThingResult<f64> {
    Fraction::new(value)
        .map(Fraction::get)
        .map_err(|err| ThingError::invalid_argument(field, err.to_string()))
}

/// Inclusive range check for integer fields.
pub(crate) fn range<T>(field: &'static str, value: T, min: T, max: T) -> ThingResult<T>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(ThingError::invalid_argument(
            field,
            format!("value must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(value)
}
