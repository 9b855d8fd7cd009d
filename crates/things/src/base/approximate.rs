//! Approximate dates and times, for history that patients only partly remember.
//!
//! An approximate date-time is either structured (a year with optional month and day, plus an
//! optional time and time zone) or a free-text description such as "when I was a child":
//!
//! ```xml
//! <first-observed><structured><date><y>1998</y></date></structured></first-observed>
//! <first-observed><descriptive>early childhood</descriptive></first-observed>
//! ```

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use hr_xml::{XmlElement, XmlWriter};

use crate::base::date_time::{MAX_YEAR, MIN_YEAR};
use crate::base::{CodableValue, HealthServiceTime};
use crate::node::{
    optional_value, parse_optional, parse_required, required_value, validate_each,
    write_optional, write_optional_value, write_text, write_value, XmlNode,
};
use crate::{validation, ThingError, ThingResult};

/// A year, optionally narrowed to a month and a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApproximateDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

impl ApproximateDate {
    const NODE: &'static str = "ApproximateDate";

    pub fn new(year: i32) -> ThingResult<Self> {
        Ok(Self {
            year: validation::range("year", year, MIN_YEAR, MAX_YEAR)?,
            month: None,
            day: None,
        })
    }

    /// A fully specified date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> ThingResult<Self> {
        let mut date = Self::new(year)?;
        date.set_month(Some(month))?;
        date.set_day(Some(day))?;
        Ok(date)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn set_year(&mut self, year: i32) -> ThingResult<()> {
        self.year = validation::range("year", year, MIN_YEAR, MAX_YEAR)?;
        Ok(())
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    /// Clearing the month also clears the day.
    pub fn set_month(&mut self, month: Option<u32>) -> ThingResult<()> {
        self.month = month
            .map(|m| validation::range("month", m, 1, 12))
            .transpose()?;
        if self.month.is_none() {
            self.day = None;
        }
        Ok(())
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// A day can only be set once a month is present, and must exist in that month.
    pub fn set_day(&mut self, day: Option<u32>) -> ThingResult<()> {
        let Some(day) = day else {
            self.day = None;
            return Ok(());
        };
        let Some(month) = self.month else {
            return Err(ThingError::invalid_argument(
                "day",
                "a day requires the month to be set",
            ));
        };
        validation::range("day", day, 1, 31)?;
        if NaiveDate::from_ymd_opt(self.year, month, day).is_none() {
            return Err(ThingError::invalid_argument(
                "day",
                format!("{}-{month:02}-{day:02} is not a calendar date", self.year),
            ));
        }
        self.day = Some(day);
        Ok(())
    }
}

impl XmlNode for ApproximateDate {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            year: required_value(node, "y")?,
            month: optional_value(node, "m")?,
            day: optional_value(node, "d")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        if self.day.is_some() && self.month.is_none() {
            return Err(ThingError::serialization(
                Self::NODE,
                "day is set without a month",
            ));
        }
        Ok(())
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        write_value(writer, "y", self.year)?;
        write_optional_value(writer, "m", self.month)?;
        write_optional_value(writer, "d", self.day)?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for ApproximateDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(month), Some(day)) => write!(f, "{:04}-{month:02}-{day:02}", self.year),
            (Some(month), None) => write!(f, "{:04}-{month:02}", self.year),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

/// A point in time known either structurally or only by description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApproximateDateTime {
    Structured {
        date: ApproximateDate,
        time: Option<HealthServiceTime>,
        time_zone: Option<CodableValue>,
    },
    Descriptive(String),
}

impl ApproximateDateTime {
    const NODE: &'static str = "ApproximateDateTime";

    pub fn structured(date: ApproximateDate) -> Self {
        Self::Structured {
            date,
            time: None,
            time_zone: None,
        }
    }

    pub fn structured_with_time(date: ApproximateDate, time: HealthServiceTime) -> Self {
        Self::Structured {
            date,
            time: Some(time),
            time_zone: None,
        }
    }

    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] if `description` is blank.
    pub fn descriptive(description: &str) -> ThingResult<Self> {
        Ok(Self::Descriptive(validation::text("descriptive", description)?))
    }

    /// The current local date and time, structured.
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        let date = ApproximateDate {
            year: now.year(),
            month: Some(now.month()),
            day: Some(now.day()),
        };
        Self::structured_with_time(date, now.time().into())
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }

    pub fn approximate_date(&self) -> Option<&ApproximateDate> {
        match self {
            Self::Structured { date, .. } => Some(date),
            Self::Descriptive(_) => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Descriptive(text) => Some(text),
            Self::Structured { .. } => None,
        }
    }
}

impl Default for ApproximateDateTime {
    fn default() -> Self {
        Self::now()
    }
}

impl XmlNode for ApproximateDateTime {
    /// Reads `structured` when present, otherwise `descriptive`.
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        if let Some(structured) = node.child("structured") {
            return Ok(Self::Structured {
                date: parse_required(structured, "date")?,
                time: parse_optional(structured, "time")?,
                time_zone: parse_optional(structured, "tz")?,
            });
        }
        match node.child("descriptive") {
            Some(descriptive) => Ok(Self::Descriptive(descriptive.text().to_string())),
            None => Err(ThingError::MissingElement {
                parent: node.name().to_string(),
                element: "structured|descriptive".into(),
            }),
        }
    }

    fn validate(&self) -> ThingResult<()> {
        match self {
            Self::Structured {
                date, time_zone, ..
            } => {
                date.validate()?;
                validate_each(time_zone)
            }
            Self::Descriptive(text) if text.trim().is_empty() => Err(ThingError::serialization(
                Self::NODE,
                "descriptive text must not be empty",
            )),
            Self::Descriptive(_) => Ok(()),
        }
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        match self {
            Self::Structured {
                date,
                time,
                time_zone,
            } => {
                writer.start_element(name)?;
                writer.start_element("structured")?;
                date.write_xml("date", writer)?;
                write_optional(writer, "time", time.as_ref())?;
                write_optional(writer, "tz", time_zone.as_ref())?;
                writer.end_element()?;
                writer.end_element()?;
            }
            Self::Descriptive(text) => {
                writer.start_element(name)?;
                write_text(writer, "descriptive", text)?;
                writer.end_element()?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ApproximateDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured {
                date,
                time,
                time_zone,
            } => {
                write!(f, "{date}")?;
                if let Some(time) = time {
                    write!(f, " {time}")?;
                }
                if let Some(tz) = time_zone {
                    write!(f, " {tz}")?;
                }
                Ok(())
            }
            Self::Descriptive(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(value: &ApproximateDateTime) -> ThingResult<String> {
        let mut writer = XmlWriter::new();
        value.write_xml("first-observed", &mut writer)?;
        Ok(writer.into_string()?)
    }

    fn parse(xml: &str) -> ThingResult<ApproximateDateTime> {
        ApproximateDateTime::parse_xml(&XmlElement::parse(xml)?)
    }

    #[test]
    fn day_requires_month() {
        let mut date = ApproximateDate::new(1998).expect("year");
        let err = date.set_day(Some(3)).expect_err("no month");
        assert!(matches!(err, ThingError::InvalidArgument { field: "day", .. }));

        date.set_month(Some(2)).expect("month");
        assert!(date.set_day(Some(30)).is_err());
        date.set_day(Some(28)).expect("day");
        assert_eq!(date.to_string(), "1998-02-28");

        date.set_month(None).expect("clear");
        assert_eq!(date.day(), None);
        assert_eq!(date.to_string(), "1998");
    }

    #[test]
    fn structured_round_trips() {
        let value = ApproximateDateTime::structured_with_time(
            ApproximateDate::from_ymd(2001, 9, 11).expect("date"),
            HealthServiceTime::new(8, 46).expect("time"),
        );
        let xml = write(&value).expect("write");
        assert!(xml.contains("<structured><date><y>2001</y><m>9</m><d>11</d></date>"));
        assert_eq!(parse(&xml).expect("parse"), value);
        assert_eq!(value.to_string(), "2001-09-11 08:46");
    }

    #[test]
    fn descriptive_round_trips() {
        let value = ApproximateDateTime::descriptive("early childhood").expect("valid");
        let xml = write(&value).expect("write");
        assert_eq!(
            xml,
            "<first-observed><descriptive>early childhood</descriptive></first-observed>"
        );
        let parsed = parse(&xml).expect("parse");
        assert_eq!(parsed.description(), Some("early childhood"));
        assert!(!parsed.is_structured());
    }

    #[test]
    fn descriptive_rejects_blank_text() {
        assert!(ApproximateDateTime::descriptive("  ").is_err());
        let err = write(&ApproximateDateTime::Descriptive(String::new())).expect_err("empty");
        assert!(err.is_serialization());
    }

    #[test]
    fn parse_requires_one_representation() {
        let err = parse("<first-observed/>").expect_err("neither");
        assert!(matches!(err, ThingError::MissingElement { element, .. } if element.contains("structured")));
    }

    #[test]
    fn write_rejects_day_without_month() {
        let value = ApproximateDateTime::structured(ApproximateDate {
            year: 2000,
            month: None,
            day: Some(4),
        });
        let err = write(&value).expect_err("inconsistent");
        assert!(err.is_serialization());

        let mut writer = XmlWriter::new();
        value
            .write_xml("first-observed", &mut writer)
            .expect_err("inconsistent");
        assert_eq!(writer.depth(), 0);
    }

    #[test]
    fn now_is_structured() {
        let now = ApproximateDateTime::default();
        assert!(now.is_structured());
        assert!(now.approximate_date().and_then(ApproximateDate::day).is_some());
    }
}
