//! The parse/write contract shared by every record node, plus the child-lookup helpers the
//! implementations are written with.
//!
//! Lookups are by fixed child name. A missing optional child leaves the field unset; a
//! missing mandatory child fails with [`ThingError::MissingElement`] naming the parent and the
//! expected element.

use std::fmt;
use std::str::FromStr;

use hr_xml::{XmlElement, XmlWriter};

use crate::{ThingError, ThingResult};

/// A value that can be read from, and written to, one XML element.
pub trait XmlNode: Sized {
    /// Build the value from `node`.
    ///
    /// Field values are taken as given; setter validation is not applied so that data already
    /// accepted by the service can always be loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ThingError`] if a mandatory child is missing or a scalar cannot be converted.
    fn parse_xml(node: &XmlElement) -> ThingResult<Self>;

    /// Check that the value and every node nested in it can be written.
    ///
    /// # Errors
    ///
    /// Returns [`ThingError::Serialization`] naming the first node with an unset mandatory
    /// field or an out-of-range value.
    fn validate(&self) -> ThingResult<()> {
        Ok(())
    }

    /// Write the value as an element called `name`.
    ///
    /// Implementations call [`XmlNode::validate`] before opening their element, so a failed
    /// write leaves `writer` exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ThingError::Serialization`] if a mandatory field is unset or alternative
    /// representations are inconsistent. Nothing is written in that case.
    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()>;
}

/// A top-level health record item bound to a fixed root element.
pub trait ThingType: XmlNode + fmt::Display {
    /// Root element name.
    const ELEMENT: &'static str;

    /// Human readable type name.
    const TYPE_NAME: &'static str;

    /// Parse a document whose root is, or directly contains, [`ThingType::ELEMENT`].
    fn from_xml(xml: &str) -> ThingResult<Self> {
        let root = XmlElement::parse(xml)?;
        Self::parse_xml(&root)
    }

    /// Write the item as a compact XML fragment.
    fn to_xml(&self) -> ThingResult<String> {
        self.to_xml_with_indent(0)
    }

    /// Write the item, indenting nested elements by `indent` spaces.
    fn to_xml_with_indent(&self, indent: usize) -> ThingResult<String> {
        let mut writer = XmlWriter::with_indent(indent);
        self.write_xml(Self::ELEMENT, &mut writer)?;
        Ok(writer.into_string()?)
    }
}

/// Resolve the element a thing type should read: `node` itself when its name matches,
/// otherwise its direct child of that name.
pub fn locate<'a>(node: &'a XmlElement, name: &str) -> ThingResult<&'a XmlElement> {
    if node.name() == name {
        return Ok(node);
    }
    node.child(name).ok_or_else(|| ThingError::UnexpectedNode {
        expected: name.to_string(),
        found: node.name().to_string(),
    })
}

pub(crate) fn required_child<'a>(node: &'a XmlElement, name: &str) -> ThingResult<&'a XmlElement> {
    node.child(name).ok_or_else(|| ThingError::MissingElement {
        parent: node.name().to_string(),
        element: name.to_string(),
    })
}

pub(crate) fn parse_required<T: XmlNode>(node: &XmlElement, name: &str) -> ThingResult<T> {
    T::parse_xml(required_child(node, name)?)
}

pub(crate) fn parse_optional<T: XmlNode>(node: &XmlElement, name: &str) -> ThingResult<Option<T>> {
    node.child(name).map(T::parse_xml).transpose()
}

pub(crate) fn parse_all<T: XmlNode>(node: &XmlElement, name: &str) -> ThingResult<Vec<T>> {
    node.children_named(name).map(T::parse_xml).collect()
}

/// Parse the repeated `item` children of an optional `wrapper` element.
pub(crate) fn parse_wrapped<T: XmlNode>(
    node: &XmlElement,
    wrapper: &str,
    item: &str,
) -> ThingResult<Vec<T>> {
    match node.child(wrapper) {
        Some(list) => parse_all(list, item),
        None => Ok(Vec::new()),
    }
}

pub(crate) fn required_text(node: &XmlElement, name: &str) -> ThingResult<String> {
    Ok(required_child(node, name)?.text().to_string())
}

pub(crate) fn optional_text(node: &XmlElement, name: &str) -> Option<String> {
    node.child(name).map(|child| child.text().to_string())
}

/// Spellings `f64::from_str` accepts that are not finite numbers.
fn is_non_finite(raw: &str) -> bool {
    let unsigned = raw.trim_start_matches(&['+', '-'][..]);
    ["inf", "infinity", "nan"]
        .iter()
        .any(|word| unsigned.eq_ignore_ascii_case(word))
}

pub(crate) fn parse_value<T>(element: &XmlElement) -> ThingResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = element.text().trim();
    if is_non_finite(raw) {
        return Err(ThingError::InvalidValue {
            element: element.name().to_string(),
            value: raw.to_string(),
            reason: "value must be a finite number".into(),
        });
    }
    raw.parse::<T>().map_err(|err| ThingError::InvalidValue {
        element: element.name().to_string(),
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

pub(crate) fn required_value<T>(node: &XmlElement, name: &str) -> ThingResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    parse_value(required_child(node, name)?)
}

pub(crate) fn optional_value<T>(node: &XmlElement, name: &str) -> ThingResult<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    node.child(name).map(parse_value).transpose()
}

/// Parse an `xs:boolean` child (`true`, `false`, `1` or `0`).
pub(crate) fn optional_bool(node: &XmlElement, name: &str) -> ThingResult<Option<bool>> {
    let Some(child) = node.child(name) else {
        return Ok(None);
    };
    match child.text().trim() {
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        other => Err(ThingError::InvalidValue {
            element: name.to_string(),
            value: other.to_string(),
            reason: "expected true, false, 1 or 0".into(),
        }),
    }
}

/// Borrow a mandatory field for writing, failing with a serialisation error when unset.
pub(crate) fn require<'a, T>(
    value: &'a Option<T>,
    node: &'static str,
    field: &str,
) -> ThingResult<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| ThingError::serialization(node, format!("{field} must be set")))
}

/// Validate every node in `values`; accepts options, slices and vectors alike.
pub(crate) fn validate_each<'a, T, I>(values: I) -> ThingResult<()>
where
    T: XmlNode + 'a,
    I: IntoIterator<Item = &'a T>,
{
    values.into_iter().try_for_each(XmlNode::validate)
}

pub(crate) fn write_optional<T: XmlNode>(
    writer: &mut XmlWriter,
    name: &str,
    value: Option<&T>,
) -> ThingResult<()> {
    match value {
        Some(value) => value.write_xml(name, writer),
        None => Ok(()),
    }
}

pub(crate) fn write_all<T: XmlNode>(
    writer: &mut XmlWriter,
    name: &str,
    values: &[T],
) -> ThingResult<()> {
    values
        .iter()
        .try_for_each(|value| value.write_xml(name, writer))
}

/// Write `values` as `item` elements under `wrapper`. Nothing is written for an empty slice.
pub(crate) fn write_wrapped<T: XmlNode>(
    writer: &mut XmlWriter,
    wrapper: &str,
    item: &str,
    values: &[T],
) -> ThingResult<()> {
    if values.is_empty() {
        return Ok(());
    }
    validate_each(values)?;
    writer.start_element(wrapper)?;
    write_all(writer, item, values)?;
    writer.end_element()?;
    Ok(())
}

pub(crate) fn write_text(writer: &mut XmlWriter, name: &str, text: &str) -> ThingResult<()> {
    Ok(writer.element_with_text(name, text)?)
}

pub(crate) fn write_optional_text(
    writer: &mut XmlWriter,
    name: &str,
    text: Option<&str>,
) -> ThingResult<()> {
    match text {
        Some(text) => write_text(writer, name, text),
        None => Ok(()),
    }
}

pub(crate) fn write_value<T: fmt::Display>(
    writer: &mut XmlWriter,
    name: &str,
    value: T,
) -> ThingResult<()> {
    write_text(writer, name, &value.to_string())
}

pub(crate) fn write_optional_value<T: fmt::Display>(
    writer: &mut XmlWriter,
    name: &str,
    value: Option<T>,
) -> ThingResult<()> {
    match value {
        Some(value) => write_value(writer, name, value),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlElement {
        XmlElement::parse(
            "<root><n>42</n><f> 1.5 </f><b>1</b><bad>x</bad><s>one</s><s>two</s></root>",
        )
        .expect("parse xml")
    }

    #[test]
    fn locate_accepts_matching_or_containing_node() {
        let root = sample();
        assert_eq!(locate(&root, "root").expect("self").name(), "root");
        assert_eq!(locate(&root, "n").expect("child").name(), "n");
        let err = locate(&root, "height").expect_err("absent");
        assert!(matches!(
            err,
            ThingError::UnexpectedNode { expected, found } if expected == "height" && found == "root"
        ));
    }

    #[test]
    fn required_child_names_parent_and_element() {
        let err = required_child(&sample(), "when").expect_err("absent");
        assert!(matches!(
            err,
            ThingError::MissingElement { parent, element } if parent == "root" && element == "when"
        ));
    }

    #[test]
    fn scalar_values_are_converted() {
        let root = sample();
        assert_eq!(required_value::<i32>(&root, "n").expect("int"), 42);
        assert_eq!(optional_value::<f64>(&root, "f").expect("float"), Some(1.5));
        assert_eq!(optional_value::<f64>(&root, "absent").expect("none"), None);
        assert_eq!(optional_bool(&root, "b").expect("bool"), Some(true));
        assert_eq!(optional_text(&root, "s").as_deref(), Some("one"));
    }

    #[test]
    fn conversion_failures_are_invalid_values() {
        let root = sample();
        let err = required_value::<i32>(&root, "bad").expect_err("not a number");
        assert!(matches!(err, ThingError::InvalidValue { element, value, .. } if element == "bad" && value == "x"));
        assert!(optional_bool(&root, "bad").is_err());
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let root = XmlElement::parse("<root><a>inf</a><b>-Infinity</b><c>NaN</c><d>1e3</d></root>")
            .expect("parse xml");
        for name in ["a", "b", "c"] {
            let err = required_value::<f64>(&root, name).expect_err("non-finite");
            assert!(matches!(err, ThingError::InvalidValue { ref element, .. } if element == name));
        }
        assert_eq!(required_value::<f64>(&root, "d").expect("finite"), 1000.0);
    }

    #[test]
    fn wrapped_lists_are_optional() {
        let root = XmlElement::parse(
            "<root><tasks><task><text>a</text></task><task><text>b</text></task></tasks></root>",
        )
        .expect("parse xml");
        let tasks: Vec<crate::CodableValue> = parse_wrapped(&root, "tasks", "task").expect("tasks");
        assert_eq!(tasks.len(), 2);
        let none: Vec<crate::CodableValue> = parse_wrapped(&root, "care-team", "person").expect("none");
        assert!(none.is_empty());

        let mut writer = XmlWriter::new();
        write_wrapped::<crate::CodableValue>(&mut writer, "care-team", "person", &[]).expect("empty");
        assert_eq!(writer.into_string().expect("finish"), "");
    }

    #[test]
    fn invalid_wrapped_item_writes_nothing() {
        let items = vec![
            crate::CodableValue::new("ok").expect("text"),
            crate::CodableValue::default(),
        ];
        let mut writer = XmlWriter::new();
        let err = write_wrapped(&mut writer, "items", "item", &items).expect_err("unset text");
        assert!(err.is_serialization());
        assert_eq!(writer.depth(), 0);
        assert_eq!(writer.into_string().expect("finish"), "");
    }

    #[test]
    fn require_reports_serialization_error() {
        let unset: Option<String> = None;
        let err = require(&unset, "Allergy", "name").expect_err("unset");
        assert!(err.is_serialization());
        assert!(err.to_string().contains("name must be set"));
    }
}
