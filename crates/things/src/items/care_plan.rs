//! Care plans: the care team, the plan manager and the scheduled tasks.

use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{ApproximateDateTime, CodableValue, PersonItem};
use crate::node::{
    locate, optional_text, optional_value, parse_optional, parse_required, parse_wrapped, require,
    required_text, validate_each, write_optional, write_optional_text, write_optional_value,
    write_text, write_wrapped, ThingType, XmlNode,
};
use crate::{validation, ThingError, ThingResult};

/// How often a task repeats: an iCalendar rule, or a count per interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskRecurrence {
    /// An RFC 5545 recurrence rule, e.g. `FREQ=DAILY;INTERVAL=2`.
    Ical(String),
    /// `times_in_interval` repetitions per `interval` (e.g. 3 per "day").
    Interval {
        interval: CodableValue,
        times_in_interval: Option<u32>,
    },
}

/// The recurrence of a [`CarePlanTask`].
///
/// The two representations are exclusive; setting one replaces the other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarePlanTaskRecurrence {
    recurrence: Option<TaskRecurrence>,
}

impl CarePlanTaskRecurrence {
    const NODE: &'static str = "CarePlanTaskRecurrence";

    pub fn ical(rule: &str) -> ThingResult<Self> {
        let mut recurrence = Self::default();
        recurrence.set_ical_recurrence(rule)?;
        Ok(recurrence)
    }

    pub fn interval(interval: CodableValue, times_in_interval: u32) -> ThingResult<Self> {
        let mut recurrence = Self::default();
        recurrence.set_interval(interval);
        recurrence.set_times_in_interval(times_in_interval)?;
        Ok(recurrence)
    }

    pub fn recurrence(&self) -> Option<&TaskRecurrence> {
        self.recurrence.as_ref()
    }

    pub fn ical_recurrence(&self) -> Option<&str> {
        match &self.recurrence {
            Some(TaskRecurrence::Ical(rule)) => Some(rule),
            _ => None,
        }
    }

    /// Switch to an iCalendar rule, discarding any interval.
    ///
    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] if `rule` is blank.
    pub fn set_ical_recurrence(&mut self, rule: &str) -> ThingResult<()> {
        self.recurrence = Some(TaskRecurrence::Ical(validation::text(
            "ical-recurrence",
            rule,
        )?));
        Ok(())
    }

    pub fn interval_unit(&self) -> Option<&CodableValue> {
        match &self.recurrence {
            Some(TaskRecurrence::Interval { interval, .. }) => Some(interval),
            _ => None,
        }
    }

    /// Switch to interval mode, discarding any iCalendar rule. An existing count is kept.
    pub fn set_interval(&mut self, interval: CodableValue) {
        let times_in_interval = self.times_in_interval();
        self.recurrence = Some(TaskRecurrence::Interval {
            interval,
            times_in_interval,
        });
    }

    pub fn times_in_interval(&self) -> Option<u32> {
        match &self.recurrence {
            Some(TaskRecurrence::Interval {
                times_in_interval, ..
            }) => *times_in_interval,
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] if `times` is zero or no interval is set.
    pub fn set_times_in_interval(&mut self, times: u32) -> ThingResult<()> {
        let times = validation::range("times-in-interval", times, 1, u32::MAX)?;
        match &mut self.recurrence {
            Some(TaskRecurrence::Interval {
                times_in_interval, ..
            }) => {
                *times_in_interval = Some(times);
                Ok(())
            }
            _ => Err(ThingError::invalid_argument(
                "times-in-interval",
                "an interval must be set first",
            )),
        }
    }
}

impl XmlNode for CarePlanTaskRecurrence {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        if let Some(rule) = optional_text(node, "ical-recurrence") {
            return Ok(Self {
                recurrence: Some(TaskRecurrence::Ical(rule)),
            });
        }
        let interval = parse_optional(node, "interval")?.ok_or_else(|| {
            ThingError::MissingElement {
                parent: node.name().to_string(),
                element: "ical-recurrence|interval".into(),
            }
        })?;
        Ok(Self {
            recurrence: Some(TaskRecurrence::Interval {
                interval,
                times_in_interval: optional_value(node, "times-in-interval")?,
            }),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        let recurrence = require(&self.recurrence, Self::NODE, "ical-recurrence or interval")?;
        let TaskRecurrence::Interval {
            interval,
            times_in_interval,
        } = recurrence
        else {
            return Ok(());
        };
        if *require(times_in_interval, Self::NODE, "times-in-interval")? == 0 {
            return Err(ThingError::serialization(
                Self::NODE,
                "times-in-interval must be greater than zero",
            ));
        }
        interval.validate()
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        writer.start_element(name)?;
        match require(&self.recurrence, Self::NODE, "ical-recurrence or interval")? {
            TaskRecurrence::Ical(rule) => write_text(writer, "ical-recurrence", rule)?,
            TaskRecurrence::Interval {
                interval,
                times_in_interval,
            } => {
                interval.write_xml("interval", writer)?;
                write_optional_value(writer, "times-in-interval", *times_in_interval)?;
            }
        }
        writer.end_element()?;
        Ok(())
    }
}

/// The rule text, or "3 time(s) per day".
impl fmt::Display for CarePlanTaskRecurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.recurrence {
            Some(TaskRecurrence::Ical(rule)) => f.write_str(rule),
            Some(TaskRecurrence::Interval {
                interval,
                times_in_interval: Some(times),
            }) => write!(f, "{times} time(s) per {interval}"),
            Some(TaskRecurrence::Interval { interval, .. }) => write!(f, "every {interval}"),
            None => Ok(()),
        }
    }
}

/// One task in a care plan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarePlanTask {
    name: Option<CodableValue>,
    description: Option<String>,
    start_date: Option<ApproximateDateTime>,
    end_date: Option<ApproximateDateTime>,
    sequence_number: Option<i32>,
    recurrence: Option<CarePlanTaskRecurrence>,
    reference_id: Option<String>,
}

impl CarePlanTask {
    const NODE: &'static str = "CarePlanTask";

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

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<&str>) -> ThingResult<()> {
        self.description = validation::optional_text("description", description)?;
        Ok(())
    }

    pub fn start_date(&self) -> Option<&ApproximateDateTime> {
        self.start_date.as_ref()
    }

    pub fn set_start_date(&mut self, start_date: Option<ApproximateDateTime>) {
        self.start_date = start_date;
    }

    pub fn end_date(&self) -> Option<&ApproximateDateTime> {
        self.end_date.as_ref()
    }

    pub fn set_end_date(&mut self, end_date: Option<ApproximateDateTime>) {
        self.end_date = end_date;
    }

    /// Position of the task within the plan.
    pub fn sequence_number(&self) -> Option<i32> {
        self.sequence_number
    }

    pub fn set_sequence_number(&mut self, sequence_number: Option<i32>) {
        self.sequence_number = sequence_number;
    }

    pub fn recurrence(&self) -> Option<&CarePlanTaskRecurrence> {
        self.recurrence.as_ref()
    }

    pub fn set_recurrence(&mut self, recurrence: Option<CarePlanTaskRecurrence>) {
        self.recurrence = recurrence;
    }

    /// Identifier other records use to refer to this task.
    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    pub fn set_reference_id(&mut self, reference_id: Option<&str>) -> ThingResult<()> {
        self.reference_id = validation::optional_text("reference-id", reference_id)?;
        Ok(())
    }
}

impl XmlNode for CarePlanTask {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            name: Some(parse_required(node, "name")?),
            description: optional_text(node, "description"),
            start_date: parse_optional(node, "start-date")?,
            end_date: parse_optional(node, "end-date")?,
            sequence_number: optional_value(node, "sequence-number")?,
            recurrence: parse_optional(node, "recurrence")?,
            reference_id: optional_text(node, "reference-id"),
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.name, Self::NODE, "name")?.validate()?;
        validate_each(&self.start_date)?;
        validate_each(&self.end_date)?;
        validate_each(&self.recurrence)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let task_name = require(&self.name, Self::NODE, "name")?;

        writer.start_element(name)?;
        task_name.write_xml("name", writer)?;
        write_optional_text(writer, "description", self.description.as_deref())?;
        write_optional(writer, "start-date", self.start_date.as_ref())?;
        write_optional(writer, "end-date", self.end_date.as_ref())?;
        write_optional_value(writer, "sequence-number", self.sequence_number)?;
        write_optional(writer, "recurrence", self.recurrence.as_ref())?;
        write_optional_text(writer, "reference-id", self.reference_id.as_deref())?;
        writer.end_element()?;
        Ok(())
    }
}

impl fmt::Display for CarePlanTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_ref().map(ToString::to_string).unwrap_or_default();
        match &self.recurrence {
            Some(recurrence) => write!(f, "{name}, {recurrence}"),
            None => f.write_str(&name),
        }
    }
}

/// A care plan with its team and tasks.
///
/// Team members and tasks are written inside `care-team` and `tasks` wrappers, each omitted
/// when empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarePlan {
    name: Option<String>,
    start_date: Option<ApproximateDateTime>,
    end_date: Option<ApproximateDateTime>,
    status: Option<CodableValue>,
    care_team: Vec<PersonItem>,
    care_plan_manager: Option<PersonItem>,
    tasks: Vec<CarePlanTask>,
}

impl CarePlan {
    pub fn new(name: &str) -> ThingResult<Self> {
        Ok(Self {
            name: Some(validation::text("name", name)?),
            ..Self::default()
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: &str) -> ThingResult<()> {
        self.name = Some(validation::text("name", name)?);
        Ok(())
    }

    pub fn start_date(&self) -> Option<&ApproximateDateTime> {
        self.start_date.as_ref()
    }

    pub fn set_start_date(&mut self, start_date: Option<ApproximateDateTime>) {
        self.start_date = start_date;
    }

    pub fn end_date(&self) -> Option<&ApproximateDateTime> {
        self.end_date.as_ref()
    }

    pub fn set_end_date(&mut self, end_date: Option<ApproximateDateTime>) {
        self.end_date = end_date;
    }

    pub fn status(&self) -> Option<&CodableValue> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: Option<CodableValue>) {
        self.status = status;
    }

    pub fn care_team(&self) -> &[PersonItem] {
        &self.care_team
    }

    pub fn add_care_team_member(&mut self, person: PersonItem) {
        self.care_team.push(person);
    }

    pub fn clear_care_team(&mut self) {
        self.care_team.clear();
    }

    pub fn care_plan_manager(&self) -> Option<&PersonItem> {
        self.care_plan_manager.as_ref()
    }

    pub fn set_care_plan_manager(&mut self, manager: Option<PersonItem>) {
        self.care_plan_manager = manager;
    }

    pub fn tasks(&self) -> &[CarePlanTask] {
        &self.tasks
    }

    pub fn add_task(&mut self, task: CarePlanTask) {
        self.tasks.push(task);
    }

    pub fn clear_tasks(&mut self) {
        self.tasks.clear();
    }
}

impl XmlNode for CarePlan {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            name: Some(required_text(node, "name")?),
            start_date: parse_optional(node, "start-date")?,
            end_date: parse_optional(node, "end-date")?,
            status: parse_optional(node, "status")?,
            care_team: parse_wrapped(node, "care-team", "person")?,
            care_plan_manager: parse_optional(node, "careplan-manager")?,
            tasks: parse_wrapped(node, "tasks", "task")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.name, Self::TYPE_NAME, "name")?;
        validate_each(&self.start_date)?;
        validate_each(&self.end_date)?;
        validate_each(&self.status)?;
        validate_each(&self.care_team)?;
        validate_each(&self.care_plan_manager)?;
        validate_each(&self.tasks)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let plan_name = require(&self.name, Self::TYPE_NAME, "name")?;

        writer.start_element(name)?;
        write_text(writer, "name", plan_name)?;
        write_optional(writer, "start-date", self.start_date.as_ref())?;
        write_optional(writer, "end-date", self.end_date.as_ref())?;
        write_optional(writer, "status", self.status.as_ref())?;
        write_wrapped(writer, "care-team", "person", &self.care_team)?;
        write_optional(writer, "careplan-manager", self.care_plan_manager.as_ref())?;
        write_wrapped(writer, "tasks", "task", &self.tasks)?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for CarePlan {
    const ELEMENT: &'static str = "care-plan";
    const TYPE_NAME: &'static str = "Care Plan";
}

/// "Asthma action plan (active): 2 task(s)".
impl fmt::Display for CarePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or_default())?;
        if let Some(status) = &self.status {
            write!(f, " ({status})")?;
        }
        if !self.tasks.is_empty() {
            write!(f, ": {} task(s)", self.tasks.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{ApproximateDate, Name};

    fn day() -> CodableValue {
        CodableValue::new("day").expect("interval")
    }

    fn write(recurrence: &CarePlanTaskRecurrence) -> ThingResult<String> {
        let mut writer = XmlWriter::new();
        recurrence.write_xml("recurrence", &mut writer)?;
        Ok(writer.into_string()?)
    }

    #[test]
    fn switching_to_interval_clears_ical() {
        let mut recurrence = CarePlanTaskRecurrence::default();
        recurrence.set_ical_recurrence("FREQ=DAILY").expect("ical");
        assert_eq!(recurrence.ical_recurrence(), Some("FREQ=DAILY"));

        recurrence.set_interval(day());
        assert_eq!(recurrence.ical_recurrence(), None);
        assert_eq!(recurrence.interval_unit(), Some(&day()));

        recurrence.set_ical_recurrence("FREQ=WEEKLY").expect("ical");
        assert!(recurrence.interval_unit().is_none());
        assert_eq!(recurrence.times_in_interval(), None);
    }

    #[test]
    fn times_in_interval_requires_interval_and_positive_count() {
        let mut recurrence = CarePlanTaskRecurrence::ical("FREQ=DAILY").expect("ical");
        let err = recurrence.set_times_in_interval(2).expect_err("no interval");
        assert!(matches!(err, ThingError::InvalidArgument { field: "times-in-interval", .. }));

        recurrence.set_interval(day());
        assert!(recurrence.set_times_in_interval(0).is_err());
        recurrence.set_times_in_interval(3).expect("positive");
        assert_eq!(recurrence.times_in_interval(), Some(3));
        assert_eq!(recurrence.to_string(), "3 time(s) per day");
    }

    #[test]
    fn interval_without_count_is_not_writable() {
        let mut recurrence = CarePlanTaskRecurrence::default();
        recurrence.set_interval(day());
        let err = write(&recurrence).expect_err("no count");
        assert!(matches!(err, ThingError::Serialization { node: "CarePlanTaskRecurrence", .. }));

        assert!(write(&CarePlanTaskRecurrence::default())
            .expect_err("empty")
            .is_serialization());
    }

    #[test]
    fn recurrence_round_trips_both_forms() {
        for recurrence in [
            CarePlanTaskRecurrence::ical("FREQ=DAILY;INTERVAL=2").expect("ical"),
            CarePlanTaskRecurrence::interval(day(), 2).expect("interval"),
        ] {
            let xml = write(&recurrence).expect("write");
            let node = XmlElement::parse(&xml).expect("xml");
            assert_eq!(CarePlanTaskRecurrence::parse_xml(&node).expect("parse"), recurrence);
        }
    }

    #[test]
    fn recurrence_parse_requires_one_form() {
        let node = XmlElement::parse("<recurrence/>").expect("xml");
        let err = CarePlanTaskRecurrence::parse_xml(&node).expect_err("empty");
        assert!(matches!(err, ThingError::MissingElement { element, .. } if element == "ical-recurrence|interval"));
    }

    fn plan() -> CarePlan {
        let mut plan = CarePlan::new("Asthma action plan").expect("plan");
        plan.set_start_date(Some(ApproximateDateTime::structured(
            ApproximateDate::from_ymd(2024, 4, 1).expect("date"),
        )));
        plan.set_status(Some(CodableValue::new("active").expect("status")));
        plan.add_care_team_member(PersonItem::new(Name::new("Dr. Rivera").expect("name")));
        plan.set_care_plan_manager(Some(PersonItem::new(Name::new("Sam Lee").expect("name"))));

        let mut inhaler = CarePlanTask::new(CodableValue::new("Use preventer inhaler").expect("task"));
        inhaler.set_sequence_number(Some(1));
        inhaler.set_recurrence(Some(CarePlanTaskRecurrence::interval(day(), 2).expect("rec")));
        inhaler.set_reference_id(Some("task-1")).expect("ref");
        plan.add_task(inhaler);

        let mut review = CarePlanTask::new(CodableValue::new("Review with GP").expect("task"));
        review.set_description(Some("Bring peak flow diary")).expect("description");
        plan.add_task(review);
        plan
    }

    #[test]
    fn care_plan_round_trips_with_wrappers() {
        let plan = plan();
        let xml = plan.to_xml().expect("write");
        let root = XmlElement::parse(&xml).expect("xml");
        assert_eq!(root.child("care-team").expect("team").children_named("person").count(), 1);
        assert_eq!(root.child("tasks").expect("tasks").children_named("task").count(), 2);

        assert_eq!(CarePlan::from_xml(&xml).expect("parse"), plan);
        assert_eq!(plan.to_string(), "Asthma action plan (active): 2 task(s)");
        assert_eq!(plan.tasks()[0].to_string(), "Use preventer inhaler, 2 time(s) per day");
    }

    #[test]
    fn care_plan_name_is_validated_and_required() {
        assert!(CarePlan::new("").is_err());
        let err = CarePlan::default().to_xml().expect_err("no name");
        assert!(matches!(err, ThingError::Serialization { node: "Care Plan", .. }));
    }

    #[test]
    fn task_without_name_fails_plan_write() {
        let mut plan = plan();
        plan.add_task(CarePlanTask::default());
        assert!(plan.to_xml().expect_err("task name").is_serialization());

        let mut writer = XmlWriter::new();
        let err = plan.write_xml("care-plan", &mut writer).expect_err("task name");
        assert!(matches!(err, ThingError::Serialization { node: "CarePlanTask", .. }));
        assert_eq!(writer.depth(), 0);
        assert_eq!(writer.into_string().expect("finish"), "");
    }

    #[test]
    fn zero_count_in_task_fails_before_output() {
        let xml = "<care-plan><name>Plan</name><tasks><task><name><text>Walk</text></name>\
                   <recurrence><interval><text>day</text></interval>\
                   <times-in-interval>0</times-in-interval></recurrence></task></tasks></care-plan>";
        let plan = CarePlan::from_xml(xml).expect("parse");

        let mut writer = XmlWriter::new();
        let err = plan.write_xml("care-plan", &mut writer).expect_err("zero count");
        assert!(matches!(err, ThingError::Serialization { node: "CarePlanTaskRecurrence", .. }));
        assert_eq!(writer.depth(), 0);
    }
}
