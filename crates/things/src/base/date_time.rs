//! Precise dates and times as exchanged with the health record service.
//!
//! ```xml
//! <when>
//!   <date><y>2024</y><m>3</m><d>9</d></date>
//!   <time><h>14</h><m>5</m><s>0</s></time>
//!   <tz><text>GMT</text></tz>
//! </when>
//! ```

use std::fmt;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use hr_xml::{XmlElement, XmlWriter};

use crate::base::CodableValue;
use crate::node::{
    optional_value, parse_optional, parse_required, required_value, validate_each,
    write_optional, write_optional_value, write_value, XmlNode,
};
use crate::{validation, ThingError, ThingResult};

pub(crate) const MIN_YEAR: i32 = 1000;
pub(crate) const MAX_YEAR: i32 = 9999;

/// A calendar date (year, month, day).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HealthServiceDate {
    year: i32,
    month: u32,
    day: u32,
}

impl HealthServiceDate {
    /// Create a date, checking that it exists in the calendar.
    ///
    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] if the year is outside 1000-9999 or the
    /// combination does not name a real day (for example 30 February).
    pub fn new(year: i32, month: u32, day: u32) -> ThingResult<Self> {
        validation::range("year", year, MIN_YEAR, MAX_YEAR)?;
        validation::range("month", month, 1, 12)?;
        validation::range("day", day, 1, 31)?;
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(ThingError::invalid_argument(
                "day",
                format!("{year:04}-{month:02}-{day:02} is not a calendar date"),
            ));
        }
        Ok(Self { year, month, day })
    }

    pub fn today() -> Self {
        Self::from(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Replace all three components at once; see [`HealthServiceDate::new`].
    pub fn set(&mut self, year: i32, month: u32, day: u32) -> ThingResult<()> {
        *self = Self::new(year, month, day)?;
        Ok(())
    }

    /// The date as a `chrono` value, or `None` if parsed data named an impossible day.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for HealthServiceDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl XmlNode for HealthServiceDate {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            year: required_value(node, "y")?,
            month: required_value(node, "m")?,
            day: required_value(node, "d")?,
        })
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        writer.start_element(name)?;
        write_value(writer, "y", self.year)?;
        write_value(writer, "m", self.month)?;
        write_value(writer, "d", self.day)?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for HealthServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A time of day with optional seconds and milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HealthServiceTime {
    hour: u32,
    minute: u32,
    second: Option<u32>,
    millisecond: Option<u32>,
}

impl HealthServiceTime {
    pub fn new(hour: u32, minute: u32) -> ThingResult<Self> {
        Ok(Self {
            hour: validation::range("hour", hour, 0, 23)?,
            minute: validation::range("minute", minute, 0, 59)?,
            second: None,
            millisecond: None,
        })
    }

    pub fn with_seconds(hour: u32, minute: u32, second: u32) -> ThingResult<Self> {
        let mut time = Self::new(hour, minute)?;
        time.set_second(Some(second))?;
        Ok(time)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn set_hour(&mut self, hour: u32) -> ThingResult<()> {
        self.hour = validation::range("hour", hour, 0, 23)?;
        Ok(())
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn set_minute(&mut self, minute: u32) -> ThingResult<()> {
        self.minute = validation::range("minute", minute, 0, 59)?;
        Ok(())
    }

    pub fn second(&self) -> Option<u32> {
        self.second
    }

    pub fn set_second(&mut self, second: Option<u32>) -> ThingResult<()> {
        self.second = second
            .map(|s| validation::range("second", s, 0, 59))
            .transpose()?;
        Ok(())
    }

    pub fn millisecond(&self) -> Option<u32> {
        self.millisecond
    }

    pub fn set_millisecond(&mut self, millisecond: Option<u32>) -> ThingResult<()> {
        self.millisecond = millisecond
            .map(|ms| validation::range("millisecond", ms, 0, 999))
            .transpose()?;
        Ok(())
    }
}

impl From<NaiveTime> for HealthServiceTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            second: Some(time.second()),
            // leap-second nanoseconds can exceed one second
            millisecond: Some((time.nanosecond() / 1_000_000).min(999)),
        }
    }
}

impl XmlNode for HealthServiceTime {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            hour: required_value(node, "h")?,
            minute: required_value(node, "m")?,
            second: optional_value(node, "s")?,
            millisecond: optional_value(node, "f")?,
        })
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        writer.start_element(name)?;
        write_value(writer, "h", self.hour)?;
        write_value(writer, "m", self.minute)?;
        write_optional_value(writer, "s", self.second)?;
        write_optional_value(writer, "f", self.millisecond)?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for HealthServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)?;
        if let Some(second) = self.second {
            write!(f, ":{second:02}")?;
            if let Some(ms) = self.millisecond {
                write!(f, ".{ms:03}")?;
            }
        }
        Ok(())
    }
}

/// A date with optional time of day and time zone.
///
/// The default value is the current local date and time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthServiceDateTime {
    date: HealthServiceDate,
    time: Option<HealthServiceTime>,
    time_zone: Option<CodableValue>,
}

impl HealthServiceDateTime {
    pub fn new(date: HealthServiceDate) -> Self {
        Self {
            date,
            time: None,
            time_zone: None,
        }
    }

    pub fn with_time(date: HealthServiceDate, time: HealthServiceTime) -> Self {
        Self {
            date,
            time: Some(time),
            time_zone: None,
        }
    }

    pub fn now() -> Self {
        Self::from(Local::now().naive_local())
    }

    pub fn date(&self) -> &HealthServiceDate {
        &self.date
    }

    pub fn set_date(&mut self, date: HealthServiceDate) {
        self.date = date;
    }

    pub fn time(&self) -> Option<&HealthServiceTime> {
        self.time.as_ref()
    }

    pub fn set_time(&mut self, time: Option<HealthServiceTime>) {
        self.time = time;
    }

    pub fn time_zone(&self) -> Option<&CodableValue> {
        self.time_zone.as_ref()
    }

    pub fn set_time_zone(&mut self, time_zone: Option<CodableValue>) {
        self.time_zone = time_zone;
    }

    /// The instant as a `chrono` value; a missing time of day reads as midnight.
    pub fn to_naive_date_time(&self) -> Option<NaiveDateTime> {
        let date = self.date.to_naive_date()?;
        let time = match &self.time {
            Some(t) => NaiveTime::from_hms_milli_opt(
                t.hour,
                t.minute,
                t.second.unwrap_or(0),
                t.millisecond.unwrap_or(0),
            )?,
            None => NaiveTime::from_hms_opt(0, 0, 0)?,
        };
        Some(date.and_time(time))
    }
}

impl Default for HealthServiceDateTime {
    fn default() -> Self {
        Self::now()
    }
}

impl From<NaiveDateTime> for HealthServiceDateTime {
    fn from(value: NaiveDateTime) -> Self {
        Self::with_time(value.date().into(), value.time().into())
    }
}

impl XmlNode for HealthServiceDateTime {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            date: parse_required(node, "date")?,
            time: parse_optional(node, "time")?,
            time_zone: parse_optional(node, "tz")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        validate_each(&self.time_zone)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        self.date.write_xml("date", writer)?;
        write_optional(writer, "time", self.time.as_ref())?;
        write_optional(writer, "tz", self.time_zone.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for HealthServiceDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date)?;
        if let Some(time) = &self.time {
            write!(f, " {time}")?;
        }
        if let Some(tz) = &self.time_zone {
            write!(f, " {tz}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write<T: XmlNode>(value: &T, name: &str) -> String {
        let mut writer = XmlWriter::new();
        value.write_xml(name, &mut writer).expect("write");
        writer.into_string().expect("finish")
    }

    #[test]
    fn date_rejects_impossible_days() {
        assert!(HealthServiceDate::new(2024, 2, 29).is_ok());
        let err = HealthServiceDate::new(2023, 2, 29).expect_err("not a leap year");
        assert!(matches!(err, ThingError::InvalidArgument { field: "day", .. }));
        assert!(HealthServiceDate::new(2024, 13, 1).is_err());
        assert!(HealthServiceDate::new(999, 1, 1).is_err());
    }

    #[test]
    fn time_ranges_are_checked_by_setters() {
        let mut time = HealthServiceTime::new(23, 59).expect("valid");
        assert!(time.set_hour(24).is_err());
        assert!(time.set_second(Some(60)).is_err());
        assert!(time.set_millisecond(Some(1000)).is_err());
        time.set_second(Some(5)).expect("second");
        time.set_millisecond(Some(7)).expect("millisecond");
        assert_eq!(time.to_string(), "23:59:05.007");
    }

    #[test]
    fn date_time_writes_expected_shape() {
        let when = HealthServiceDateTime::with_time(
            HealthServiceDate::new(2024, 3, 9).expect("date"),
            HealthServiceTime::new(14, 5).expect("time"),
        );
        assert_eq!(
            write(&when, "when"),
            "<when><date><y>2024</y><m>3</m><d>9</d></date><time><h>14</h><m>5</m></time></when>"
        );
        assert_eq!(when.to_string(), "2024-03-09 14:05");
    }

    #[test]
    fn date_time_round_trips_with_time_zone() {
        let mut when = HealthServiceDateTime::new(HealthServiceDate::new(2020, 1, 31).expect("date"));
        when.set_time(Some(HealthServiceTime::with_seconds(8, 0, 30).expect("time")));
        when.set_time_zone(Some(CodableValue::new("UTC").expect("tz")));

        let xml = write(&when, "when");
        let parsed =
            HealthServiceDateTime::parse_xml(&XmlElement::parse(&xml).expect("xml")).expect("parse");
        assert_eq!(parsed, when);
    }

    #[test]
    fn parse_requires_date() {
        let node = XmlElement::parse("<when><time><h>1</h><m>2</m></time></when>").expect("xml");
        let err = HealthServiceDateTime::parse_xml(&node).expect_err("missing date");
        assert!(matches!(err, ThingError::MissingElement { element, .. } if element == "date"));
    }

    #[test]
    fn parse_reports_non_numeric_components() {
        let node = XmlElement::parse("<date><y>20x4</y><m>1</m><d>1</d></date>").expect("xml");
        let err = HealthServiceDate::parse_xml(&node).expect_err("bad year");
        assert!(matches!(err, ThingError::InvalidValue { element, .. } if element == "y"));
    }

    #[test]
    fn converts_to_chrono() {
        let when = HealthServiceDateTime::new(HealthServiceDate::new(2021, 6, 1).expect("date"));
        let naive = when.to_naive_date_time().expect("valid");
        assert_eq!(naive.to_string(), "2021-06-01 00:00:00");

        let back = HealthServiceDateTime::from(naive);
        assert_eq!(back.date(), when.date());
        assert_eq!(back.time().map(HealthServiceTime::hour), Some(0));
    }

    #[test]
    fn default_is_now() {
        let when = HealthServiceDateTime::default();
        assert_eq!(when.date().year(), Local::now().year());
        assert!(when.time().is_some());
    }
}
