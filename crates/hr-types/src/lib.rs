//! Validated primitive types shared by every health record node.
//!
//! Setters on record nodes route their arguments through these types so that an invalid
//! value is rejected at assignment time rather than when the node is serialised.

/// Errors that can occur when creating validated primitive types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input number was below zero
    #[error("value must not be negative, got {0}")]
    Negative(f64),

    /// The input number was outside an inclusive range
    #[error("value must be between {min} and {max}, got {value}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    /// The input number was NaN or infinite
    #[error("value must be a finite number")]
    NotFinite,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TypeError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A finite number that is zero or greater.
///
/// Used for physical measurements (lengths, weights, volumes, flows) and counts such as
/// file sizes and servings.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct NonNegative(f64);

impl NonNegative {
    pub fn new(value: f64) -> Result<Self, TypeError> {
        if !value.is_finite() {
            return Err(TypeError::NotFinite);
        }
        if value < 0.0 {
            return Err(TypeError::Negative(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// A number in the inclusive range `0.0..=1.0`.
///
/// Relative glucose zone boundaries and HbA1c limits are stored this way.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Fraction(f64);

impl Fraction {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 1.0;

    pub fn new(value: f64) -> Result<Self, TypeError> {
        if !value.is_finite() {
            return Err(TypeError::NotFinite);
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(TypeError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Peanut \n").expect("valid text");
        assert_eq!(text.as_str(), "Peanut");
        assert_eq!(text.into_string(), "Peanut");
    }

    #[test]
    fn non_empty_text_rejects_blank() {
        assert_eq!(NonEmptyText::new(""), Err(TypeError::Empty));
        assert_eq!(NonEmptyText::new(" \t "), Err(TypeError::Empty));
    }

    #[test]
    fn non_negative_accepts_zero_and_rejects_negative() {
        assert_eq!(NonNegative::new(0.0).expect("zero").get(), 0.0);
        assert_eq!(NonNegative::new(-0.5), Err(TypeError::Negative(-0.5)));
        assert_eq!(NonNegative::new(f64::NAN), Err(TypeError::NotFinite));
    }

    #[test]
    fn fraction_is_inclusive_at_both_ends() {
        assert!(Fraction::new(0.0).is_ok());
        assert!(Fraction::new(1.0).is_ok());
        let err = Fraction::new(1.01).expect_err("above range");
        assert!(matches!(err, TypeError::OutOfRange { max, .. } if max == 1.0));
        assert!(Fraction::new(-0.01).is_err());
    }
}
