use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Decoded model output. Expected to hold an `itinerary` array but never validated up front.
pub type ItineraryResponse = Map<String, Value>;

pub const ITINERARY_KEY: &str = "itinerary";
pub const ACTIVITIES_KEY: &str = "activities";

pub const DEFAULT_DAY_LABEL: &str = "Unknown Day";
pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_TIMING: &str = "No Timing";
pub const DEFAULT_LOCATION: &str = "No Location";
pub const DEFAULT_DESCRIPTION: &str = "No Description";
pub const DEFAULT_COST: &str = "Not Provided";

/// One activity with every missing field replaced by its default text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub title: String,
    pub timing: String,
    pub location: String,
    pub description: String,
    /// Raw cost as the model sent it, parsed later
    pub cost: CostField,
}

/// The `cost` value of an activity before parsing.
///
/// Numbers are kept apart from text so they never pass through the
/// digit-stripping path, and structured values (arrays, objects, booleans)
/// are kept as their JSON text so they can be reported instead of read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CostField {
    Text(String),
    Number(f64),
    Unsupported(String),
}

impl CostField {
    pub fn text(text: impl Into<String>) -> Self {
        CostField::Text(text.into())
    }

    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => CostField::text(DEFAULT_COST),
            Some(Value::String(text)) => CostField::Text(text.clone()),
            Some(Value::Number(number)) => match number.as_f64() {
                Some(amount) => CostField::Number(amount),
                None => CostField::Unsupported(number.to_string()),
            },
            Some(other) => CostField::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for CostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostField::Text(text) | CostField::Unsupported(text) => f.write_str(text),
            // f64 Display never switches to exponent notation
            CostField::Number(amount) => write!(f, "{}", amount),
        }
    }
}

impl Activity {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            title: text_field(object, "title", DEFAULT_TITLE),
            timing: text_field(object, "timing", DEFAULT_TIMING),
            location: text_field(object, "location", DEFAULT_LOCATION),
            description: text_field(object, "description", DEFAULT_DESCRIPTION),
            cost: CostField::from_value(object.get("cost")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub label: String,
    pub activities: Vec<Activity>,
}

/// Ordered view over the `itinerary` array of a decoded response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Itinerary {
    pub days: Vec<DayPlan>,
    /// Entries that were not JSON objects and could not be read
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl Itinerary {
    /// Read the day plans out of a response.
    ///
    /// Returns `None` when there is no usable `itinerary` array. Malformed
    /// entries inside it are skipped and listed in `skipped`.
    pub fn from_response(response: &ItineraryResponse) -> Option<Self> {
        let days = response.get(ITINERARY_KEY)?.as_array()?;
        let mut itinerary = Itinerary::default();

        for (day_idx, day) in days.iter().enumerate() {
            let Some(day) = day.as_object() else {
                itinerary
                    .skipped
                    .push(format!("itinerary[{}] is not an object: {}", day_idx, day));
                continue;
            };

            let label = text_field(day, "day", DEFAULT_DAY_LABEL);
            let mut activities = Vec::new();
            let entries = day
                .get(ACTIVITIES_KEY)
                .and_then(|value| value.as_array())
                .map(|values| values.as_slice())
                .unwrap_or_default();

            for (activity_idx, entry) in entries.iter().enumerate() {
                match entry.as_object() {
                    Some(object) => activities.push(Activity::from_object(object)),
                    None => itinerary.skipped.push(format!(
                        "itinerary[{}].activities[{}] is not an object: {}",
                        day_idx, activity_idx, entry
                    )),
                }
            }

            itinerary.days.push(DayPlan { label, activities });
        }

        Some(itinerary)
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.days.iter().flat_map(|day| day.activities.iter())
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }
}

/// Read a field as display text. Missing or null fields fall back to `default`;
/// other non-string values keep their JSON spelling.
fn text_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
