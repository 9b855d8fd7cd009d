use std::fmt;

use hr_xml::{XmlElement, XmlWriter};

use crate::base::{CodableValue, FoodEnergyValue};
use crate::node::{
    locate, optional_text, optional_value, parse_optional, parse_required, parse_wrapped, require,
    validate_each, write_optional, write_optional_text, write_optional_value, write_wrapped,
    ThingType, XmlNode,
};
use crate::{validation, ThingError, ThingResult};

/// One food within a meal, with the amount eaten.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DietaryItem {
    food_item: Option<CodableValue>,
    serving_size: Option<CodableValue>,
    servings_consumed: Option<f64>,
    energy: Option<FoodEnergyValue>,
}

impl DietaryItem {
    const NODE: &'static str = "DietaryItem";

    pub fn new(food_item: CodableValue) -> Self {
        Self {
            food_item: Some(food_item),
            ..Self::default()
        }
    }

    pub fn food_item(&self) -> Option<&CodableValue> {
        self.food_item.as_ref()
    }

    pub fn set_food_item(&mut self, food_item: CodableValue) {
        self.food_item = Some(food_item);
    }

    pub fn serving_size(&self) -> Option<&CodableValue> {
        self.serving_size.as_ref()
    }

    pub fn set_serving_size(&mut self, serving_size: Option<CodableValue>) {
        self.serving_size = serving_size;
    }

    pub fn servings_consumed(&self) -> Option<f64> {
        self.servings_consumed
    }

    /// # Errors
    ///
    /// Returns [`ThingError::InvalidArgument`] for a negative count.
    pub fn set_servings_consumed(&mut self, servings: Option<f64>) -> ThingResult<()> {
        self.servings_consumed = servings
            .map(|value| validation::non_negative("servings-consumed", value))
            .transpose()?;
        Ok(())
    }

    pub fn energy(&self) -> Option<&FoodEnergyValue> {
        self.energy.as_ref()
    }

    pub fn set_energy(&mut self, energy: Option<FoodEnergyValue>) {
        self.energy = energy;
    }
}

impl XmlNode for DietaryItem {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        Ok(Self {
            food_item: Some(parse_required(node, "food-item")?),
            serving_size: parse_optional(node, "serving-size")?,
            servings_consumed: optional_value(node, "servings-consumed")?,
            energy: parse_optional(node, "energy")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.food_item, Self::NODE, "food-item")?.validate()?;
        if let Some(servings) = self.servings_consumed {
            if servings < 0.0 {
                return Err(ThingError::serialization(
                    Self::NODE,
                    format!("servings-consumed must not be negative, got {servings}"),
                ));
            }
        }
        validate_each(&self.serving_size)?;
        validate_each(&self.energy)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let food_item = require(&self.food_item, Self::NODE, "food-item")?;

        writer.start_element(name)?;
        food_item.write_xml("food-item", writer)?;
        write_optional(writer, "serving-size", self.serving_size.as_ref())?;
        write_optional_value(writer, "servings-consumed", self.servings_consumed)?;
        write_optional(writer, "energy", self.energy.as_ref())?;
        writer.end_element()?;
        Ok(())
    }
}

/// "2 x Toast (slice)" when the amount is known, otherwise the food name.
impl fmt::Display for DietaryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let food = self.food_item.as_ref().map(ToString::to_string).unwrap_or_default();
        match (self.servings_consumed, &self.serving_size) {
            (Some(count), Some(size)) => write!(f, "{count} x {food} ({size})"),
            (Some(count), None) => write!(f, "{count} x {food}"),
            (None, _) => f.write_str(&food),
        }
    }
}

/// A reusable meal made up of dietary items.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MealDefinition {
    name: Option<CodableValue>,
    meal_type: Option<CodableValue>,
    description: Option<String>,
    dietary_items: Vec<DietaryItem>,
}

impl MealDefinition {
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

    /// Breakfast, lunch, dinner, snack and so on.
    pub fn meal_type(&self) -> Option<&CodableValue> {
        self.meal_type.as_ref()
    }

    pub fn set_meal_type(&mut self, meal_type: Option<CodableValue>) {
        self.meal_type = meal_type;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<&str>) -> ThingResult<()> {
        self.description = validation::optional_text("description", description)?;
        Ok(())
    }

    pub fn dietary_items(&self) -> &[DietaryItem] {
        &self.dietary_items
    }

    pub fn add_dietary_item(&mut self, item: DietaryItem) {
        self.dietary_items.push(item);
    }

    pub fn clear_dietary_items(&mut self) {
        self.dietary_items.clear();
    }

    /// Total energy of the items that record one, or `None` if none do.
    pub fn total_energy(&self) -> Option<f64> {
        self.dietary_items
            .iter()
            .filter_map(|item| item.energy().map(FoodEnergyValue::value))
            .fold(None, |total, value| Some(total.unwrap_or(0.0) + value))
    }
}

impl XmlNode for MealDefinition {
    fn parse_xml(node: &XmlElement) -> ThingResult<Self> {
        let node = locate(node, Self::ELEMENT)?;
        Ok(Self {
            name: Some(parse_required(node, "name")?),
            meal_type: parse_optional(node, "meal-type")?,
            description: optional_text(node, "description"),
            dietary_items: parse_wrapped(node, "dietary-items", "dietary-item")?,
        })
    }

    fn validate(&self) -> ThingResult<()> {
        require(&self.name, Self::TYPE_NAME, "name")?.validate()?;
        validate_each(&self.meal_type)?;
        validate_each(&self.dietary_items)
    }

    fn write_xml(&self, name: &str, writer: &mut XmlWriter) -> ThingResult<()> {
        self.validate()?;
        let meal_name = require(&self.name, Self::TYPE_NAME, "name")?;

        writer.start_element(name)?;
        meal_name.write_xml("name", writer)?;
        write_optional(writer, "meal-type", self.meal_type.as_ref())?;
        write_optional_text(writer, "description", self.description.as_deref())?;
        write_wrapped(writer, "dietary-items", "dietary-item", &self.dietary_items)?;
        writer.end_element()?;
        Ok(())
    }
}

impl ThingType for MealDefinition {
    const ELEMENT: &'static str = "meal-definition";
    const TYPE_NAME: &'static str = "Meal Definition";
}

/// "Breakfast (Morning): 2 item(s)".
impl fmt::Display for MealDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_ref().map(ToString::to_string).unwrap_or_default();
        f.write_str(&name)?;
        if let Some(meal_type) = &self.meal_type {
            write!(f, " ({meal_type})")?;
        }
        if !self.dietary_items.is_empty() {
            write!(f, ": {} item(s)", self.dietary_items.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast() -> DietaryItem {
        let mut item = DietaryItem::new(CodableValue::new("Toast").expect("food"));
        item.set_serving_size(Some(CodableValue::new("slice").expect("size")));
        item.set_servings_consumed(Some(2.0)).expect("servings");
        item.set_energy(Some(FoodEnergyValue::new(160.0).expect("energy")));
        item
    }

    #[test]
    fn dietary_item_rejects_negative_servings() {
        let mut item = toast();
        let err = item.set_servings_consumed(Some(-1.0)).expect_err("negative");
        assert!(matches!(err, ThingError::InvalidArgument { field: "servings-consumed", .. }));
        assert_eq!(item.servings_consumed(), Some(2.0));
        assert_eq!(item.to_string(), "2 x Toast (slice)");
    }

    #[test]
    fn meal_wraps_items_and_round_trips() {
        let mut meal = MealDefinition::new(CodableValue::new("Breakfast").expect("name"));
        meal.set_meal_type(Some(CodableValue::new("Morning").expect("type")));
        meal.set_description(Some("Weekday breakfast")).expect("description");
        meal.add_dietary_item(toast());
        meal.add_dietary_item(DietaryItem::new(CodableValue::new("Coffee").expect("food")));

        let xml = meal.to_xml().expect("write");
        let root = XmlElement::parse(&xml).expect("xml");
        let wrapper = root.child("dietary-items").expect("wrapper");
        assert_eq!(wrapper.children_named("dietary-item").count(), 2);

        let parsed = MealDefinition::from_xml(&xml).expect("parse");
        assert_eq!(parsed, meal);
        assert_eq!(meal.to_string(), "Breakfast (Morning): 2 item(s)");
        assert_eq!(meal.total_energy(), Some(160.0));
    }

    #[test]
    fn empty_meal_omits_wrapper() {
        let meal = MealDefinition::new(CodableValue::new("Snack").expect("name"));
        let xml = meal.to_xml().expect("write");
        assert!(!xml.contains("dietary-items"));
        assert_eq!(meal.total_energy(), None);
    }

    #[test]
    fn dietary_item_requires_food() {
        let mut meal = MealDefinition::new(CodableValue::new("Lunch").expect("name"));
        meal.add_dietary_item(DietaryItem::default());
        let err = meal.to_xml().expect_err("no food item");
        assert!(matches!(err, ThingError::Serialization { node: "DietaryItem", .. }));

        let mut writer = XmlWriter::new();
        meal.write_xml("meal-definition", &mut writer).expect_err("no food item");
        assert_eq!(writer.depth(), 0);
        assert_eq!(writer.into_string().expect("finish"), "");
    }

    #[test]
    fn meal_requires_name() {
        let mut meal = MealDefinition::default();
        meal.add_dietary_item(toast());
        let err = meal.to_xml().expect_err("no name");
        assert!(
            matches!(err, ThingError::Serialization { node: "Meal Definition", ref reason } if reason.contains("name"))
        );
    }
}
