//! Weekly plan data model
//!
//! The plan is stored as a nested string map so that envelopes written by
//! older builds (missing days, missing meals, extra keys) still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Day of the week, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monday" | "mon" => Some(Day::Monday),
            "tuesday" | "tue" => Some(Day::Tuesday),
            "wednesday" | "wed" => Some(Day::Wednesday),
            "thursday" | "thu" => Some(Day::Thursday),
            "friday" | "fri" => Some(Day::Friday),
            "saturday" | "sat" => Some(Day::Saturday),
            "sunday" | "sun" => Some(Day::Sunday),
            _ => None,
        }
    }
}

/// Meal slot within a day, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealSlot::Breakfast),
            "lunch" => Some(MealSlot::Lunch),
            "dinner" => Some(MealSlot::Dinner),
            _ => None,
        }
    }
}

/// Number of cells in a full week grid
pub const TOTAL_CELLS: usize = Day::ALL.len() * MealSlot::ALL.len();

/// Meals for one day, keyed by meal label
pub type DayMeals = BTreeMap<String, String>;

/// The week's meal plan, serialized as `{ day: { meal: text } }`
///
/// Reading is lenient below the top level: a day that is not an object
/// reads as a day with no meals, and a cell that is not a string (`null`,
/// numbers, nested values) reads as "". Only a non-object envelope fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Plan {
    days: BTreeMap<String, DayMeals>,
}

impl<'de> Deserialize<'de> for Plan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let days = raw
            .into_iter()
            .map(|(day, meals)| (day, lenient_meals(meals)))
            .collect();
        Ok(Self { days })
    }
}

fn lenient_meals(value: Value) -> DayMeals {
    match value {
        Value::Object(meals) => meals
            .into_iter()
            .map(|(meal, text)| match text {
                Value::String(text) => (meal, text),
                _ => (meal, String::new()),
            })
            .collect(),
        _ => DayMeals::new(),
    }
}

impl Plan {
    /// Plan with no day keys at all (the "not yet initialized" shape)
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan with every (day, meal) cell present and empty
    pub fn blank() -> Self {
        let days = Day::ALL
            .iter()
            .map(|day| {
                let meals = MealSlot::ALL
                    .iter()
                    .map(|meal| (meal.as_str().to_string(), String::new()))
                    .collect();
                (day.as_str().to_string(), meals)
            })
            .collect();
        Self { days }
    }

    /// True when no day keys are present
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Cell text, or "" when the day or meal is missing
    pub fn cell(&self, day: Day, meal: MealSlot) -> &str {
        self.days
            .get(day.as_str())
            .and_then(|meals| meals.get(meal.as_str()))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whether the cell has an entry at all (possibly empty)
    pub fn has_cell(&self, day: Day, meal: MealSlot) -> bool {
        self.days
            .get(day.as_str())
            .is_some_and(|meals| meals.contains_key(meal.as_str()))
    }

    /// Copy of this plan with one cell replaced; every other entry is kept
    pub fn with_cell(&self, day: Day, meal: MealSlot, text: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.days
            .entry(day.as_str().to_string())
            .or_default()
            .insert(meal.as_str().to_string(), text.into());
        next
    }

    /// Whether the cell holds non-whitespace text
    pub fn is_planned(&self, day: Day, meal: MealSlot) -> bool {
        !self.cell(day, meal).trim().is_empty()
    }

    /// Count planned and empty cells across the week
    pub fn stats(&self) -> PlanStats {
        let planned = Day::ALL
            .iter()
            .flat_map(|day| MealSlot::ALL.iter().map(move |meal| (*day, *meal)))
            .filter(|(day, meal)| self.is_planned(*day, *meal))
            .count();
        PlanStats {
            planned,
            empty: TOTAL_CELLS - planned,
        }
    }
}

/// Summary counters shown above the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanStats {
    pub planned: usize,
    pub empty: usize,
}
