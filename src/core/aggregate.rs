//! Cost totals and display text for a decoded itinerary.

use serde::Serialize;
use tracing::warn;

use super::cost::{parse_cost_field, ParsedCost};
use crate::{
    error::PlannerError,
    types::{Activity, Itinerary, ItineraryResponse},
};

pub const ITINERARY_HEADING: &str = "Your Personalized Itinerary";
pub const VARIABLE_COST_WARNING: &str =
    "Some activities have variable costs, which are not included in the total cost estimate.";
pub const UNKNOWN_COST_WARNING: &str =
    "Some activities have unknown costs, which are not included in the total cost estimate.";

/// An activity paired with its parsed cost. The raw cost text is untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostedActivity {
    #[serde(flatten)]
    pub activity: Activity,
    pub parsed_cost: ParsedCost,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostedDay {
    pub label: String,
    pub activities: Vec<CostedActivity>,
}

/// Everything the front end needs to show an itinerary and its cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItinerarySummary {
    pub days: Vec<CostedDay>,
    /// Sum of numeric costs only
    pub total_cost: f64,
    pub has_variable_costs: bool,
    pub has_unknown_costs: bool,
    /// False when the response had no usable `itinerary` array
    pub data_available: bool,
    /// Per-activity problems (invalid cost formats, skipped entries)
    pub warnings: Vec<String>,
}

impl ItinerarySummary {
    fn no_data() -> Self {
        Self {
            days: Vec::new(),
            total_cost: 0.0,
            has_variable_costs: false,
            has_unknown_costs: false,
            data_available: false,
            warnings: Vec::new(),
        }
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }

    /// Render the itinerary as the plain-text page shown to the user.
    pub fn render(&self, currency: &str) -> String {
        let mut lines = vec![ITINERARY_HEADING.to_string(), String::new()];

        if !self.data_available {
            lines.push(PlannerError::NoItineraryData.to_string());
            return lines.join("\n");
        }

        for day in &self.days {
            lines.push(format!("## {}", day.label));
            for costed in &day.activities {
                let activity = &costed.activity;
                lines.push(format!("**{}**", activity.title));
                lines.push(format!("_{}_ at {}", activity.timing, activity.location));
                lines.push(activity.description.clone());
                lines.push(match costed.parsed_cost {
                    ParsedCost::Amount(value) => format!("Cost: {:.2} {}", value, currency),
                    other => format!("Cost: {}", other),
                });
                lines.push("---".to_string());
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "Estimated Total Cost: {:.2} {}",
            self.total_cost, currency
        ));

        if self.has_variable_costs {
            lines.push(format!("Warning: {}", VARIABLE_COST_WARNING));
        }
        if self.has_unknown_costs {
            lines.push(format!("Warning: {}", UNKNOWN_COST_WARNING));
        }

        lines.join("\n")
    }
}

/// Aggregate straight from a decoded response.
pub fn aggregate_itinerary(response: &ItineraryResponse) -> ItinerarySummary {
    summarize_itinerary(Itinerary::from_response(response).as_ref())
}

/// Walk the itinerary in response order, parsing each cost and keeping a running total.
///
/// Sentinel costs only raise their flag. An unparseable cost counts as unknown
/// and leaves a warning naming the original text. `None` means the response
/// had no usable itinerary array.
pub fn summarize_itinerary(itinerary: Option<&Itinerary>) -> ItinerarySummary {
    let Some(itinerary) = itinerary else {
        warn!(
            target: "trip_planner::aggregate",
            "response has no usable itinerary array"
        );
        return ItinerarySummary::no_data();
    };

    let mut summary = ItinerarySummary {
        data_available: true,
        warnings: itinerary.skipped.clone(),
        ..ItinerarySummary::no_data()
    };

    for day in &itinerary.days {
        let mut activities = Vec::with_capacity(day.activities.len());

        for activity in &day.activities {
            let parsed_cost = match parse_cost_field(&activity.cost) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(
                        target: "trip_planner::aggregate",
                        activity = %activity.title,
                        cost = %activity.cost,
                        "invalid cost format"
                    );
                    summary.warnings.push(err.to_string());
                    ParsedCost::Unknown
                }
            };

            match parsed_cost {
                ParsedCost::Amount(value) => summary.total_cost += value,
                ParsedCost::Variable => summary.has_variable_costs = true,
                ParsedCost::Unknown => summary.has_unknown_costs = true,
            }

            activities.push(CostedActivity {
                activity: activity.clone(),
                parsed_cost,
            });
        }

        summary.days.push(CostedDay {
            label: day.label.clone(),
            activities,
        });
    }

    summary
}
